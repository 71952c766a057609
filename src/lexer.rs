//--> Imports <--

use logos::{
	Lexer,
	Logos,
};

use crate::{
	instructions::Inst,
	token::{
		Token,
		TokenKind,
	},
};

//--> Structs <--

/// A cursor over assembly source that hands out one token at a time.
///
/// Each pass builds its own scanner over the same source, so there is no rewinding. After an error or the end of
/// input has been returned, every further `scan` returns end of input.
pub struct Scanner<'source> {
	source: &'source str,
	inner: Lexer<'source, TokenKind>,
	line: usize,
	// Offset up to which newlines have been counted into `line`.
	counted: usize,
	finished: bool,
}

//--> Functions <--

impl<'source> Scanner<'source> {
	pub fn new(source: &'source str) -> Scanner<'source> {
		Scanner { source, inner: TokenKind::lexer(source), line: 1, counted: 0, finished: false }
	}

	/// Returns the next token and moves past it.
	pub fn scan(&mut self) -> Token {
		if self.finished { return self.end_of_input() }

		let kind = match self.inner.next() {
			Some(kind) => kind,
			None => {
				self.finished = true;
				return self.end_of_input();
			}
		};

		let span = self.inner.span();
		self.count_lines(span.start);
		let slice = self.inner.slice();

		match kind {
			TokenKind::Error => {
				self.finished = true;
				Token::new(TokenKind::Error, error_message(slice), self.line, span)
			},
			TokenKind::Instruction if Inst::from_mnemonic(slice).is_none() => Token::new(TokenKind::Identifier, slice, self.line, span),
			_ => Token::new(kind, kind.literal(slice), self.line, span)
		}
	}

	/// Discards up to `count` tokens, stopping early at an error or the end of input.
	pub fn advance(&mut self, count: usize) {
		for _ in 0..count {
			if !self.scan().is_correct() { break; }
		}
	}

	fn count_lines(&mut self, upto: usize) {
		self.line += self.source[self.counted..upto].matches('\n').count();
		self.counted = upto;
	}

	fn end_of_input(&mut self) -> Token {
		let end = self.source.len();
		self.count_lines(end);
		Token::new(TokenKind::EndOfInput, "", self.line, end..end)
	}
}

fn error_message(slice: &str) -> String {
	match slice.chars().next() {
		Some('"') => String::from("unterminated string"),
		Some('\'') => String::from("malformed character literal (expected one character between single quotes)"),
		Some('$') => String::from("memory address must be exactly 4 characters"),
		Some('0') => String::from("numbers starting with '0' must be hexadecimal ('0x')"),
		Some(c) => format!("unknown token '{}'", c),
		None => String::from("unknown token")
	}
}
