//--> Imports <--

use crate::{
	error::{
		Error,
		ErrorKind,
		Result,
	},
	image::{
		CODE_SECTION,
		DATA_SECTION,
		DATA_TERMINATOR,
		END_OF_STRING,
		NUMBER_DATA,
		SECTION_MARKER,
		STRING_DATA,
	},
	instructions::Inst,
	lexer::Scanner,
	tags::LabelTable,
	text,
	token::{
		Token,
		TokenKind,
	},
};

//--> Structs <--

/// Second pass: turns the token stream into a load image, using the labels found by the first pass.
pub struct Encoder<'source, 'labels> {
	scanner: Scanner<'source>,
	labels: &'labels LabelTable,
	out: Vec<u8>,
}

//--> Functions <--

impl<'source, 'labels> Encoder<'source, 'labels> {
	pub fn new(source: &'source str, labels: &'labels LabelTable) -> Encoder<'source, 'labels> {
		Encoder { scanner: Scanner::new(source), labels, out: Vec::new() }
	}

	pub fn encode(mut self) -> Result<Vec<u8>> {
		let token = self.scanner.scan();

		if !token.is(TokenKind::Section) {
			return Err(Error::unexpected("a section at the top of the file", &token));
		}

		match token.literal.as_str() {
			".data" => self.data_section()?,
			".code" => self.code_section()?,
			_ => return Err(Error::at(ErrorKind::UnknownSection(token.literal.clone()), &token)),
		}

		Ok(self.out)
	}

	fn data_section(&mut self) -> Result<()> {
		self.emit(&SECTION_MARKER);
		self.emit(&[DATA_SECTION]);

		let mut token = self.scanner.scan();

		while token.is_correct() && !token.is(TokenKind::Section) {
			if !token.is(TokenKind::Memory) {
				return Err(Error::unexpected("a memory address inside the data section", &token));
			}
			let address = memory_address(&token)?;
			self.emit(&address.to_be_bytes());

			let value = self.scanner.scan();
			match value.kind {
				TokenKind::String | TokenKind::Char => {
					let bytes = match value.kind {
						TokenKind::String => text::make_ascii_string(&value.literal),
						_ => text::make_ascii_character(&value.literal).map(|b| vec![b]),
					}
					// A zero byte would end the string early once the image is read back.
					.filter(|bytes| !bytes.contains(&END_OF_STRING))
					.ok_or_else(|| Error::at(ErrorKind::MalformedText(value.literal.clone()), &value))?;

					self.emit(&[STRING_DATA]);
					self.emit(&bytes);
					self.emit(&[END_OF_STRING]);
				},
				TokenKind::Number | TokenKind::Hex => {
					let b = number_byte(&value)?;
					self.emit(&[NUMBER_DATA, b]);
				},
				_ => return Err(Error::unexpected("a number or string after a data address", &value)),
			}

			token = self.scanner.scan();
		}

		if !token.is_section(".code") {
			return Err(Error::unexpected("the .code section after the .data section", &token));
		}

		self.emit(&DATA_TERMINATOR);
		self.code_section()
	}

	fn code_section(&mut self) -> Result<()> {
		self.emit(&SECTION_MARKER);
		self.emit(&[CODE_SECTION]);

		let start = self.scanner.scan();
		if !start.is(TokenKind::Memory) {
			return Err(Error::unexpected("the code start address after .code", &start));
		}
		self.emit(&memory_address(&start)?.to_be_bytes());

		loop {
			let token = self.scanner.scan();

			match token.kind {
				TokenKind::EndOfInput => return Ok(()),
				TokenKind::Tag => {},
				TokenKind::Instruction => self.instruction(&token)?,
				TokenKind::Identifier => return Err(Error::at(ErrorKind::UndefinedInstruction(token.literal.clone()), &token)),
				_ => return Err(Error::unexpected("an instruction", &token)),
			}
		}
	}

	fn instruction(&mut self, token: &Token) -> Result<()> {
		let inst = Inst::from_mnemonic(&token.literal)
			.ok_or_else(|| Error::at(ErrorKind::UndefinedInstruction(token.literal.clone()), token))?;

		self.out.push(inst.opcode());
		inst.encode_operands(&mut self.scanner, self.labels, &mut self.out)
	}

	fn emit(&mut self, bytes: &[u8]) { self.out.extend_from_slice(bytes); }
}

/// A register operand: `rN` with N under 256.
pub(crate) fn register_byte(token: &Token) -> Result<u8> {
	if !token.is(TokenKind::Register) {
		return Err(Error::unexpected("a register", token));
	}

	match token.literal.parse::<u32>() {
		Ok(n) if n < 256 => Ok(n as u8),
		_ => Err(Error::at(ErrorKind::RegisterOutOfRange(token.literal.clone()), token)),
	}
}

/// A one-byte number operand, written in decimal or as `0x` hex.
pub(crate) fn number_byte(token: &Token) -> Result<u8> {
	match token.kind {
		TokenKind::Hex => {
			if token.literal.is_empty() || token.literal.len() > 2 || !token.literal.chars().all(|c| c.is_ascii_hexdigit()) {
				return Err(Error::at(ErrorKind::MalformedHex(token.literal.clone()), token));
			}

			u8::from_str_radix(&token.literal, 16).map_err(|_| Error::at(ErrorKind::MalformedHex(token.literal.clone()), token))
		},
		TokenKind::Number => token.literal.parse::<u8>()
			.map_err(|_| Error::at(ErrorKind::NumberOutOfRange(token.literal.clone()), token)),
		_ => Err(Error::unexpected("a number", token)),
	}
}

/// A `$AAAA` literal: exactly four hex digits, big-endian.
pub(crate) fn memory_address(token: &Token) -> Result<u16> {
	if !token.is(TokenKind::Memory) {
		return Err(Error::unexpected("a memory address", token));
	}

	if token.literal.len() != 4 || !token.literal.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(Error::at(ErrorKind::MalformedHex(token.literal.clone()), token));
	}

	u16::from_str_radix(&token.literal, 16).map_err(|_| Error::at(ErrorKind::MalformedHex(token.literal.clone()), token))
}

/// A jump target: a memory literal, or a reference to a label.
///
/// References are normally identifiers, but `:name` and mnemonic-shaped names are accepted too.
pub(crate) fn jump_address(token: &Token, labels: &LabelTable) -> Result<u16> {
	match token.kind {
		TokenKind::Memory => memory_address(token),
		TokenKind::Identifier | TokenKind::Tag | TokenKind::Instruction => labels.resolve(token),
		_ => Err(Error::unexpected("a memory address or label", token)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tags;
	use pretty_assertions::assert_eq;

	fn assemble(source: &str) -> Result<Vec<u8>> {
		let labels = tags::resolve(source)?;
		Encoder::new(source, &labels).encode()
	}

	fn token(kind: TokenKind, literal: &str) -> Token { Token::new(kind, literal, 1, 0..literal.len()) }

	#[test]
	fn single_halt() {
		assert_eq!(assemble(".code $0200\nhlt\n").unwrap(), vec![0xff, 0xfe, 0xfe, 0xff, 0x01, 0x02, 0x00, 0x41]);
	}

	#[test]
	fn forward_jump_uses_resolved_label() {
		assert_eq!(
			assemble(".code $0000\njmp :end\n:end\nhlt\n").unwrap(),
			vec![0xff, 0xfe, 0xfe, 0xff, 0x01, 0x00, 0x00, 0x20, 0x00, 0x03, 0x41]
		);

		assert_eq!(
			assemble(".code $0010\n:top\nsil\njne top\n").unwrap(),
			vec![0xff, 0xfe, 0xfe, 0xff, 0x01, 0x00, 0x10, 0x04, 0x22, 0x00, 0x10]
		);
	}

	#[test]
	fn labels_may_contain_digits() {
		assert_eq!(
			assemble(".code $0000\n:loop1\nsil\njmp loop1\njmp :loop1\n").unwrap(),
			vec![0xff, 0xfe, 0xfe, 0xff, 0x01, 0x00, 0x00, 0x04, 0x20, 0x00, 0x00, 0x20, 0x00, 0x00]
		);
	}

	#[test]
	fn every_operand_shape() {
		let source = ".code $0100\n\
			add r1\naddi 10\nmovi 0x0a R2\nmov r3 r4\nldr $abcd r5\nstr r6 $1234\n\
			inr $0100 r7\ninw r8 $0101\njfg 2 $0102\n";

		assert_eq!(assemble(source).unwrap(), vec![
			0xff, 0xfe, 0xfe, 0xff, 0x01, 0x01, 0x00,
			0x00, 0x01,
			0x01, 0x0a,
			0x33, 0x0a, 0x02,
			0x32, 0x03, 0x04,
			0x30, 0xab, 0xcd, 0x05,
			0x31, 0x06, 0x12, 0x34,
			0x36, 0x01, 0x00, 0x07,
			0x37, 0x08, 0x01, 0x01,
			0x25, 0x02, 0x01, 0x02,
		]);
	}

	#[test]
	fn data_section_entries() {
		let source = ".data\n$1000 \"hi\"\n$1003 \"\"\n$1004 'A'\n$1005 42\n$1006 0xff\n.code $0200\nhlt\n";

		assert_eq!(assemble(source).unwrap(), vec![
			0xff, 0xfe, 0xfe, 0xff, 0x00,
			0x10, 0x00, 0x01, b'h', b'i', 0x00,
			0x10, 0x03, 0x01, 0x00,
			0x10, 0x04, 0x01, b'A', 0x00,
			0x10, 0x05, 0x02, 42,
			0x10, 0x06, 0x02, 0xff,
			0x00, 0x00, 0x00,
			0xff, 0xfe, 0xfe, 0xff, 0x01, 0x02, 0x00,
			0x41,
		]);
	}

	#[test]
	fn string_escapes_are_resolved() {
		let image = assemble(".data\n$0010 \"a\\n\\\"\"\n.code $0000\n").unwrap();
		assert_eq!(&image[5..12], &[0x00, 0x10, 0x01, b'a', 0x0a, b'"', 0x00]);
	}

	#[test]
	fn zero_bytes_in_text_data_are_rejected() {
		for source in [
			".data\n$1000 \"a\\0b\"\n$2000 7\n.code $0200\nhlt\n",
			".data\n$1000 \"a\\x00\"\n.code $0200\n",
			".data\n$1000 '\\0'\n.code $0200\n",
		] {
			let err = assemble(source).unwrap_err();
			assert!(matches!(err.kind, ErrorKind::MalformedText(_)));
			assert_eq!(err.line, Some(2));
		}
	}

	#[test]
	fn data_section_must_end_with_code() {
		let err = assemble(".data\n$1000 1\n").unwrap_err();
		assert!(matches!(err.kind, ErrorKind::UnexpectedToken { .. }));

		let err = assemble(".data\n$1000 1\n.data\n").unwrap_err();
		assert!(matches!(err.kind, ErrorKind::UnexpectedToken { .. }));
	}

	#[test]
	fn file_must_start_with_a_known_section() {
		assert!(matches!(assemble("hlt").unwrap_err().kind, ErrorKind::UnexpectedToken { .. }));
		assert!(matches!(assemble(".text $0000").unwrap_err().kind, ErrorKind::UnknownSection(_)));
	}

	#[test]
	fn undefined_label_is_fatal() {
		let err = assemble(".code $0000\njmp nowhere\n").unwrap_err();
		assert!(matches!(err.kind, ErrorKind::UndefinedLabel(ref name) if name == "nowhere"));
	}

	#[test]
	fn stray_tokens_in_code_are_fatal() {
		assert!(matches!(assemble(".code $0000\nr1\n").unwrap_err().kind, ErrorKind::UnexpectedToken { .. }));
		assert!(matches!(assemble(".code $0000\nhlt\n\"oops\n").unwrap_err().kind, ErrorKind::Lexical(_)));
	}

	#[test]
	fn register_limits() {
		assert_eq!(register_byte(&token(TokenKind::Register, "255")).unwrap(), 255);
		assert!(matches!(register_byte(&token(TokenKind::Register, "256")).unwrap_err().kind, ErrorKind::RegisterOutOfRange(_)));
		assert!(matches!(register_byte(&token(TokenKind::Register, "x1")).unwrap_err().kind, ErrorKind::RegisterOutOfRange(_)));
		assert!(matches!(register_byte(&token(TokenKind::Number, "1")).unwrap_err().kind, ErrorKind::UnexpectedToken { .. }));
	}

	#[test]
	fn number_limits() {
		assert_eq!(number_byte(&token(TokenKind::Number, "255")).unwrap(), 255);
		assert_eq!(number_byte(&token(TokenKind::Hex, "A")).unwrap(), 10);
		assert!(number_byte(&token(TokenKind::Number, "256")).is_err());
		assert!(number_byte(&token(TokenKind::Number, "1.5")).is_err());
		assert!(number_byte(&token(TokenKind::Hex, "")).is_err());
		assert!(number_byte(&token(TokenKind::Hex, "100")).is_err());
	}

	#[test]
	fn memory_needs_four_hex_digits() {
		assert_eq!(memory_address(&token(TokenKind::Memory, "0aF3")).unwrap(), 0x0af3);
		assert!(matches!(memory_address(&token(TokenKind::Memory, "020")).unwrap_err().kind, ErrorKind::MalformedHex(_)));
		assert!(matches!(memory_address(&token(TokenKind::Memory, "02000")).unwrap_err().kind, ErrorKind::MalformedHex(_)));
		assert!(matches!(memory_address(&token(TokenKind::Memory, "zz00")).unwrap_err().kind, ErrorKind::MalformedHex(_)));
	}
}
