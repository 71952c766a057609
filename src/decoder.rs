//--> Imports <--

use crate::{
	error::{
		Error,
		ErrorKind,
		Result,
	},
	image::{
		ByteReader,
		CODE_SECTION,
		DATA_SECTION,
		END_OF_DATA,
		NUMBER_DATA,
		STRING_DATA,
	},
	instructions::Inst,
	text,
};

//--> Constants <--

// Column at which the address comment of a code line starts.
const COMMENT_COLUMN: usize = 20;

//--> Structs <--

struct Disassembler<'i> {
	reader: ByteReader<'i>,
	lines: Vec<String>,
}

//--> Functions <--

/// Turns a load image back into assembly text.
///
/// Every data entry is printed with its address, `$0000` included, so the text assembles back into the same image.
/// Each instruction line carries a `;$AAAA` comment with the address just past the instruction.
pub fn disassemble(image: &[u8]) -> Result<String> {
	let mut dasm = Disassembler { reader: ByteReader::new(image), lines: Vec::new() };

	match dasm.reader.read_section_header()? {
		DATA_SECTION => dasm.data_section()?,
		CODE_SECTION => dasm.code_section()?,
		kind => return Err(ErrorKind::UnknownSectionKind(kind).into()),
	}

	let mut text = dasm.lines.join("\n");
	text.push('\n');
	Ok(text)
}

impl<'i> Disassembler<'i> {
	fn data_section(&mut self) -> Result<()> {
		self.lines.push(String::from(".data"));

		loop {
			let address = self.reader.read_address("a data address")?;

			match self.reader.read_byte("a data type")? {
				END_OF_DATA => break,
				STRING_DATA => {
					let string = self.reader.read_string()?;
					self.lines.push(format!("{} \"{}\"", address_text(address), text::escape_ascii(&string)));
				},
				NUMBER_DATA => {
					let b = self.reader.read_byte("a data number")?;
					self.lines.push(format!("{} {}", address_text(address), number_text(b)));
				},
				other => return Err(ErrorKind::UnknownDataType(other).into()),
			}
		}

		self.lines.push(String::new());

		match self.reader.read_section_header()? {
			CODE_SECTION => self.code_section(),
			kind => Err(ErrorKind::ExpectedCodeSection(kind).into()),
		}
	}

	fn code_section(&mut self) -> Result<()> {
		let start = self.reader.read_address("the code start address")?;
		self.lines.push(format!(".code {}", address_text(start)));

		let mut cursor = start as u32;

		while !self.reader.is_at_end() {
			let opcode = self.reader.read_byte("an opcode")?;
			let inst = Inst::from_opcode(opcode).ok_or_else(|| Error::from(ErrorKind::UndefinedOpcode(opcode)))?;

			let text = inst.decode(&mut self.reader)?;
			cursor += inst.byte_count() as u32;
			self.lines.push(format!("{:<width$};${:04x}", text, cursor, width = COMMENT_COLUMN));
		}

		Ok(())
	}
}

pub(crate) fn register_text(b: u8) -> String { format!("R{}", b) }

/// Numbers are printed in decimal, except zero: a bare `0` does not lex, so it is written as hex.
pub(crate) fn number_text(b: u8) -> String {
	match b {
		0 => String::from("0x00"),
		_ => b.to_string()
	}
}

pub(crate) fn address_text(address: u16) -> String { format!("${:04x}", address) }
