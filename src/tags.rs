//--> Imports <--

use std::{
	collections::HashMap,
	fmt,
};

use crate::{
	encoder,
	error::{
		Error,
		ErrorKind,
		Result,
	},
	instructions::Inst,
	lexer::Scanner,
	token::{
		Token,
		TokenKind,
	},
};

//--> Constants <--

/// Size of the 16-bit address space. Code may end exactly at this boundary but not past it.
pub const MEMORY_LIMIT: u32 = 65536;

//--> Structs <--

/// Label name to absolute address, filled by the first pass and only read afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
	labels: HashMap<String, u16>,
}

struct TagReader<'source> {
	scanner: Scanner<'source>,
	code_start: u32,
	offset: u32,
	labels: LabelTable,
}

//--> Functions <--

/// First pass: computes the address of every label in the code section without emitting anything.
pub fn resolve(source: &str) -> Result<LabelTable> {
	let mut reader = TagReader { scanner: Scanner::new(source), code_start: 0, offset: 0, labels: LabelTable::new() };
	reader.read_tags()?;
	Ok(reader.labels)
}

impl<'source> TagReader<'source> {
	fn read_tags(&mut self) -> Result<()> {
		// The data section holds no tags, so skip straight to the code section.
		loop {
			let token = self.scanner.scan();
			if !token.is_correct() { return Ok(()) }
			if token.is_section(".code") { break; }
		}

		let start = self.scanner.scan();
		if !start.is(TokenKind::Memory) {
			return Err(Error::unexpected("the code start address after .code", &start));
		}
		self.code_start = encoder::memory_address(&start)? as u32;
		tracing::debug!("code starts at ${:04x}", self.code_start);

		let mut token = self.scanner.scan();

		while token.is_correct() {
			self.process(&token)?;
			self.check_memory_limit(&token)?;
			token = self.scanner.scan();
		}

		Ok(())
	}

	fn process(&mut self, token: &Token) -> Result<()> {
		match token.kind {
			TokenKind::Tag => {
				let address = self.code_start + self.offset;

				if address >= MEMORY_LIMIT {
					return Err(Error::at(ErrorKind::MemoryLimitExceeded(address), token));
				}

				self.labels.define(token, address as u16)
			},
			TokenKind::Instruction | TokenKind::Identifier => {
				let inst = Inst::from_mnemonic(&token.literal)
					.ok_or_else(|| Error::at(ErrorKind::UndefinedInstruction(token.literal.clone()), token))?;

				// Operands only matter for their size here, which the byte count already covers.
				self.offset += inst.byte_count() as u32;
				self.scanner.advance(inst.token_count() - 1);
				Ok(())
			},
			// Anything else is reported by the second pass.
			_ => Ok(())
		}
	}

	fn check_memory_limit(&self, token: &Token) -> Result<()> {
		let position = self.code_start + self.offset;

		if position > MEMORY_LIMIT {
			Err(Error::at(ErrorKind::MemoryLimitExceeded(position), token))
		} else { Ok(()) }
	}
}

impl LabelTable {
	pub fn new() -> LabelTable { LabelTable::default() }

	pub fn get(&self, name: &str) -> Option<u16> { self.labels.get(name).copied() }

	pub fn len(&self) -> usize { self.labels.len() }

	pub fn is_empty(&self) -> bool { self.labels.is_empty() }

	/// Labels sorted by address, then name.
	pub fn sorted(&self) -> Vec<(&str, u16)> {
		let mut labels = self.labels.iter().map(|(n, a)| (n.as_str(), *a)).collect::<Vec<_>>();
		labels.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
		labels
	}

	fn define(&mut self, token: &Token, address: u16) -> Result<()> {
		if self.labels.insert(token.literal.clone(), address).is_some() {
			return Err(Error::at(ErrorKind::DuplicateLabel(token.literal.clone()), token));
		}

		tracing::trace!("label '{}' = ${:04x}", token.literal, address);
		Ok(())
	}

	/// Resolves a label reference token to its address.
	pub fn resolve(&self, token: &Token) -> Result<u16> {
		self.get(&token.literal).ok_or_else(|| Error::at(ErrorKind::UndefinedLabel(token.literal.clone()), token))
	}
}

impl fmt::Display for LabelTable {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (name, address) in self.sorted() {
			writeln!(f, "{:04x} {}", address, name)?;
		}

		Ok(())
	}
}
