//--> Imports <--

use std::{
	fmt,
	ops::Range,
};

use logos::Logos;

//--> Structs <--

/// A lexical unit together with where it came from.
///
/// `literal` holds the token text without its syntactic delimiters: a tag loses its `:`, a register its `r`, a
/// memory address its `$`, a hex number its `0x`, and strings and characters their quotes. For error tokens it holds
/// the error message instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	pub literal: String,
	pub line: usize,
	pub span: Range<usize>,
}

//--> Enums <--

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Logos)]
pub enum TokenKind {
	#[regex(r":[^\s]+")]
	Tag,

	#[regex(r"[rR][0-9][0-9]?")]
	Register,

	#[regex(r"'([^'\\\n]|\\[^\n]|\\x[0-9a-fA-F][0-9a-fA-F])'")]
	Char,

	#[regex(r"\$[^\s;]*", |l| l.slice().len() == 5)]
	Memory,

	#[regex(r"\.[a-zA-Z_]*")]
	Section,

	#[regex(r"[1-9][0-9]*(\.[0-9]*)?")]
	Number,

	#[regex(r"0[xX][0-9a-fA-F]*")]
	Hex,

	#[regex(r#""([^"\\\n]|\\[^\n])*""#)]
	String,

	// Words are split into mnemonics and label references by the scanner, which can see the instruction table.
	// `r1` on its own is a register; longer words such as `r1x` or `loop1` are words.
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
	Instruction,

	Identifier,

	EndOfInput,

	#[error]
	#[regex(r"[ \t\r\n\f]+", logos::skip)]
	#[regex(r";[^\n]*", logos::skip)]
	Error,
}

//--> Functions <--

impl Token {
	pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, span: Range<usize>) -> Token {
		Token { kind, literal: literal.into(), line, span }
	}

	/// Error and end-of-input tokens end every consuming loop.
	pub fn is_correct(&self) -> bool {
		!matches!(self.kind, TokenKind::Error | TokenKind::EndOfInput)
	}

	pub fn is(&self, kind: TokenKind) -> bool { self.kind == kind }

	pub fn is_section(&self, name: &str) -> bool {
		self.kind == TokenKind::Section && self.literal == name
	}
}

impl TokenKind {
	/// Strips the syntactic delimiters off a matched slice.
	pub(crate) fn literal(self, slice: &str) -> &str {
		match self {
			TokenKind::Tag | TokenKind::Register | TokenKind::Memory => &slice[1..],
			TokenKind::Hex => &slice[2..],
			TokenKind::String | TokenKind::Char => &slice[1..slice.len() - 1],
			_ => slice,
		}
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.kind {
			TokenKind::Tag => write!(f, "a tag ':{}'", self.literal),
			TokenKind::Register => write!(f, "a register 'r{}'", self.literal),
			TokenKind::Char => write!(f, "a character '{}'", self.literal),
			TokenKind::Memory => write!(f, "a memory address '${}'", self.literal),
			TokenKind::Section => write!(f, "a section '{}'", self.literal),
			TokenKind::Number => write!(f, "a number '{}'", self.literal),
			TokenKind::Hex => write!(f, "a hex number '0x{}'", self.literal),
			TokenKind::String => write!(f, "a string \"{}\"", self.literal),
			TokenKind::Instruction => write!(f, "an instruction '{}'", self.literal),
			TokenKind::Identifier => write!(f, "an identifier '{}'", self.literal),
			TokenKind::EndOfInput => write!(f, "the end of input"),
			TokenKind::Error => write!(f, "an error ({})", self.literal),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kinds(source: &str) -> Vec<TokenKind> { TokenKind::lexer(source).collect() }

	#[test]
	fn registers_and_words_with_digits() {
		assert_eq!(kinds("r1 R12 ret"), vec![TokenKind::Register, TokenKind::Register, TokenKind::Instruction]);
		assert_eq!(kinds("r123 loop1 R2d2"), vec![TokenKind::Instruction, TokenKind::Instruction, TokenKind::Instruction]);
	}

	#[test]
	fn memory_needs_exactly_four_characters() {
		assert_eq!(kinds("$0200"), vec![TokenKind::Memory]);
		assert_eq!(kinds("$020"), vec![TokenKind::Error]);
		assert_eq!(kinds("$02000"), vec![TokenKind::Error]);
	}

	#[test]
	fn leading_zero_means_hex() {
		assert_eq!(kinds("0x1f 12 3.5"), vec![TokenKind::Hex, TokenKind::Number, TokenKind::Number]);
		assert_eq!(kinds("0"), vec![TokenKind::Error]);
	}

	#[test]
	fn comments_and_whitespace_are_skipped() {
		assert_eq!(kinds("  .code ; a comment\n\t:start\n"), vec![TokenKind::Section, TokenKind::Tag]);
	}

	#[test]
	fn literal_strips_delimiters() {
		assert_eq!(TokenKind::Tag.literal(":loop"), "loop");
		assert_eq!(TokenKind::Register.literal("R7"), "7");
		assert_eq!(TokenKind::Memory.literal("$beef"), "beef");
		assert_eq!(TokenKind::Hex.literal("0x2A"), "2A");
		assert_eq!(TokenKind::String.literal("\"hi\""), "hi");
		assert_eq!(TokenKind::Char.literal("'a'"), "a");
		assert_eq!(TokenKind::Section.literal(".data"), ".data");
	}
}
