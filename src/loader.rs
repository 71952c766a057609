//--> Imports <--

use crate::{
	error::{
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
	tags::MEMORY_LIMIT,
};

//--> Constants <--

pub const MEMORY_SIZE: usize = MEMORY_LIMIT as usize;

const DUMP_ROW: usize = 16;

//--> Structs <--

/// The full address space of the CPU with a load image placed into it.
#[derive(Debug)]
pub struct Memory {
	cells: Vec<u8>,
	code_start: u16,
	code_len: usize,
}

//--> Functions <--

/// Places a load image into a zeroed memory map.
pub fn load(image: &[u8]) -> Result<Memory> {
	let mut memory = Memory { cells: vec![0; MEMORY_SIZE], code_start: 0, code_len: 0 };
	let mut reader = ByteReader::new(image);

	match reader.read_section_header()? {
		DATA_SECTION => {
			load_data(&mut memory, &mut reader)?;

			match reader.read_section_header()? {
				CODE_SECTION => {},
				kind => return Err(ErrorKind::ExpectedCodeSection(kind).into()),
			}
		},
		CODE_SECTION => {},
		kind => return Err(ErrorKind::UnknownSectionKind(kind).into()),
	}

	memory.code_start = reader.read_address("the code start address")?;
	let mut address = memory.code_start as u32;

	while !reader.is_at_end() {
		let b = reader.read_byte("code")?;
		memory.write(address, b)?;
		address += 1;
	}

	memory.code_len = (address - memory.code_start as u32) as usize;
	tracing::debug!("loaded {} code bytes at ${:04x}", memory.code_len, memory.code_start);

	Ok(memory)
}

fn load_data(memory: &mut Memory, reader: &mut ByteReader) -> Result<()> {
	loop {
		let address = reader.read_address("a data address")? as u32;

		match reader.read_byte("a data type")? {
			END_OF_DATA => return Ok(()),
			STRING_DATA => {
				for (i, b) in reader.read_string()?.into_iter().enumerate() {
					memory.write(address + i as u32, b)?;
				}
			},
			NUMBER_DATA => {
				let b = reader.read_byte("a data number")?;
				memory.write(address, b)?;
			},
			other => return Err(ErrorKind::UnknownDataType(other).into()),
		}
	}
}

impl Memory {
	pub fn read_byte(&self, address: u16) -> u8 { self.cells[address as usize] }

	pub fn code_start(&self) -> u16 { self.code_start }

	pub fn code_len(&self) -> usize { self.code_len }

	fn write(&mut self, address: u32, b: u8) -> Result<()> {
		let cell = self.cells.get_mut(address as usize).ok_or(ErrorKind::MemoryLimitExceeded(address))?;
		*cell = b;
		Ok(())
	}

	/// Renders memory as rows of 16 bytes, optionally skipping rows that are all zero.
	pub fn dump(&self, nonzero_only: bool) -> String {
		let mut out = String::new();

		for (row, chunk) in self.cells.chunks(DUMP_ROW).enumerate() {
			if nonzero_only && chunk.iter().all(|&b| b == 0) { continue; }

			out.push_str(&format!("${:04x}:", row * DUMP_ROW));
			for b in chunk {
				out.push_str(&format!(" {:02x}", b));
			}
			out.push('\n');
		}

		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn places_data_and_code() {
		let image = [
			0xff, 0xfe, 0xfe, 0xff, 0x00,
			0x00, 0x20, 0x01, b'h', b'i', 0x00,
			0x00, 0x30, 0x02, 0x2a,
			0x00, 0x00, 0x00,
			0xff, 0xfe, 0xfe, 0xff, 0x01, 0x00, 0x10, 0x00, 0x01, 0x41,
		];
		let memory = load(&image).unwrap();

		assert_eq!(memory.read_byte(0x0020), b'h');
		assert_eq!(memory.read_byte(0x0021), b'i');
		assert_eq!(memory.read_byte(0x0022), 0x00);
		assert_eq!(memory.read_byte(0x0030), 0x2a);
		assert_eq!((memory.code_start(), memory.code_len()), (0x0010, 3));
		assert_eq!(memory.read_byte(0x0012), 0x41);

		assert_eq!(memory.dump(true), "\
$0010: 00 01 41 00 00 00 00 00 00 00 00 00 00 00 00 00
$0020: 68 69 00 00 00 00 00 00 00 00 00 00 00 00 00 00
$0030: 2a 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
");
	}

	#[test]
	fn full_dump_covers_all_memory() {
		let memory = load(&[0xff, 0xfe, 0xfe, 0xff, 0x01, 0x00, 0x00]).unwrap();
		assert_eq!(memory.dump(false).lines().count(), MEMORY_SIZE / DUMP_ROW);
		assert_eq!(memory.dump(true), "");
	}

	#[test]
	fn code_past_the_end_of_memory_is_fatal() {
		let err = load(&[0xff, 0xfe, 0xfe, 0xff, 0x01, 0xff, 0xff, 0x41, 0x41]).unwrap_err();
		assert!(matches!(err.kind, ErrorKind::MemoryLimitExceeded(0x10000)));
	}
}
