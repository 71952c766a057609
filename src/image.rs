//! Layout of the binary load image shared by the encoder, the decoder and the loader.
//!
//! ```text
//! FF FE FE FF 00                      data section marker
//! AAAA 01 <ascii bytes> 00            string entry
//! AAAA 02 NN                          number entry
//! 00 00 00                            end of data
//! FF FE FE FF 01 AAAA                 code section marker and start address
//! OP OPERANDS...                      instructions until the end of the image
//! ```

//--> Imports <--

use crate::error::{
	ErrorKind,
	Result,
};

//--> Constants <--

pub const SECTION_MARKER: [u8; 4] = [0xff, 0xfe, 0xfe, 0xff];

pub const DATA_SECTION: u8 = 0x00;
pub const CODE_SECTION: u8 = 0x01;

pub const END_OF_DATA: u8 = 0x00;
pub const STRING_DATA: u8 = 0x01;
pub const NUMBER_DATA: u8 = 0x02;

pub const END_OF_STRING: u8 = 0x00;

/// An address of zero followed by the end-of-data type byte.
pub const DATA_TERMINATOR: [u8; 3] = [0x00, 0x00, END_OF_DATA];

//--> Structs <--

/// A bounds-checked cursor over a load image.
pub struct ByteReader<'i> {
	bytes: &'i [u8],
	pos: usize,
}

//--> Functions <--

impl<'i> ByteReader<'i> {
	pub fn new(bytes: &'i [u8]) -> ByteReader<'i> { ByteReader { bytes, pos: 0 } }

	pub fn is_at_end(&self) -> bool { self.pos >= self.bytes.len() }

	/// Reads one byte; `what` names the field for the end-of-image error.
	pub fn read_byte(&mut self, what: &'static str) -> Result<u8> {
		let b = *self.bytes.get(self.pos).ok_or(ErrorKind::UnexpectedEnd(what))?;
		self.pos += 1;
		Ok(b)
	}

	/// Reads a big-endian 16-bit address.
	pub fn read_address(&mut self, what: &'static str) -> Result<u16> {
		let high = self.read_byte(what)?;
		let low = self.read_byte(what)?;
		Ok(u16::from_be_bytes([high, low]))
	}

	/// Reads bytes up to (and consuming, but not returning) the string terminator.
	pub fn read_string(&mut self) -> Result<Vec<u8>> {
		let mut string = Vec::new();

		loop {
			match self.read_byte("a string")? {
				END_OF_STRING => return Ok(string),
				b => string.push(b),
			}
		}
	}

	/// Reads a section marker followed by the section kind byte.
	pub fn read_section_header(&mut self) -> Result<u8> {
		let start = self.pos;

		for expected in SECTION_MARKER {
			if self.read_byte("a section marker")? != expected {
				return Err(ErrorKind::BadSectionMarker(start).into());
			}
		}

		self.read_byte("a section kind")
	}
}
