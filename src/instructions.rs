//--> Imports <--

use crate::{
	decoder,
	encoder,
	error::Result,
	image::ByteReader,
	lexer::Scanner,
	tags::LabelTable,
	token::Token,
};

//--> Macros <--

// Every fact about an instruction is written once here; lookups in both directions are generated from it.
macro_rules! instruction_set {
	($($(#[$doc:meta])* $variant:ident = $opcode:literal, $mnemonic:literal, $pattern:ident;)+) => {
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
		pub enum Inst {
			$($(#[$doc])* $variant,)+
		}

		impl Inst {
			pub const ALL: &'static [Inst] = &[$(Inst::$variant,)+];

			pub fn mnemonic(self) -> &'static str {
				match self { $(Inst::$variant => $mnemonic,)+ }
			}

			pub fn opcode(self) -> u8 {
				match self { $(Inst::$variant => $opcode,)+ }
			}

			pub fn pattern(self) -> Pattern {
				match self { $(Inst::$variant => Pattern::$pattern,)+ }
			}

			pub fn from_opcode(opcode: u8) -> Option<Inst> {
				match opcode {
					$($opcode => Some(Inst::$variant),)+
					_ => None
				}
			}

			/// Case-insensitive lookup by mnemonic.
			pub fn from_mnemonic(word: &str) -> Option<Inst> {
				match word.to_ascii_lowercase().as_str() {
					$($mnemonic => Some(Inst::$variant),)+
					_ => None
				}
			}
		}
	};
}

//--> Enums <--

/// The kind of a single operand, which fixes both how many bytes it takes and how it is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
	/// `rN`, one byte.
	Register,
	/// A decimal or `0x` hex literal, one byte.
	Number,
	/// A `$AAAA` literal, two bytes.
	Memory,
	/// A `$AAAA` literal or a label reference, two bytes.
	Jump,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
	None,
	Register,
	Number,
	Jump,
	RegisterRegister,
	RegisterMemory,
	MemoryRegister,
	JumpRegister,
	RegisterJump,
	NumberJump,
	JumpJump,
	NumberRegister,
}

instruction_set! {
	// arithmetic and logic
	/// acc + Rx -> acc
	Add = 0x00, "add", Register;
	/// acc + INT -> acc
	AddInt = 0x01, "addi", Number;
	/// acc - Rx -> acc
	Sub = 0x02, "sub", Register;
	/// acc - INT -> acc
	SubInt = 0x03, "subi", Number;
	/// acc << 1 -> acc
	ShiftLeft = 0x04, "sil", None;
	/// acc >> 1 -> acc
	ShiftRight = 0x05, "sir", None;
	And = 0x06, "and", Register;
	Or = 0x07, "or", Register;
	Not = 0x08, "not", None;
	ExclOr = 0x09, "xor", Register;

	// jumps
	Jump = 0x20, "jmp", Jump;
	/// Jump if acc == 0.
	JumpEqual = 0x21, "jeq", Jump;
	/// Jump if acc != 0.
	JumpNotEqual = 0x22, "jne", Jump;
	/// Jump if acc > 0.
	JumpGreater = 0x23, "jgt", Jump;
	/// Jump if acc < 0.
	JumpLower = 0x24, "jlt", Jump;
	/// Jump if flag INT is set.
	JumpFlag = 0x25, "jfg", NumberJump;

	// moves
	/// $mem -> Rx
	LoadRegister = 0x30, "ldr", MemoryRegister;
	/// Rx -> $mem
	StoreRegister = 0x31, "str", RegisterMemory;
	/// Rx -> Ry
	Move = 0x32, "mov", RegisterRegister;
	/// INT -> Rx
	MoveInt = 0x33, "movi", NumberRegister;
	/// acc -> Rx
	AccToRegister = 0x34, "tar", Register;
	/// Rx -> acc
	RegisterToAcc = 0x35, "tra", Register;
	/// Reads the byte pointed to by the address stored at $mem into Rx.
	IndirectRead = 0x36, "inr", JumpRegister;
	/// Writes Rx to the byte pointed to by the address stored at $mem.
	IndirectWrite = 0x37, "inw", RegisterJump;
	/// Loads the disk from $mem.
	Disk = 0x38, "dsk", Jump;

	// calls
	Interrupt = 0x40, "int", Number;
	Halt = 0x41, "hlt", None;
	/// Calls the subroutine starting at $mem.
	Call = 0x42, "cll", Jump;
	/// Returns to the calling subroutine.
	Return = 0x43, "crn", None;
	ProtectedMode = 0x44, "pmd", None;
	EnableInterrupts = 0x45, "ein", None;
	DisableInterrupts = 0x46, "din", None;

	// stack
	PushAcc = 0x50, "psa", None;
	PopAcc = 0x51, "poa", None;
	PushRegister = 0x52, "psr", None;
	PopRegister = 0x53, "por", None;
}

//--> Functions <--

impl Inst {
	/// Source tokens taken by the instruction, mnemonic included.
	pub fn token_count(self) -> usize { self.pattern().token_count() }

	/// Bytes emitted for the instruction, opcode included.
	pub fn byte_count(self) -> u16 { self.pattern().byte_count() }

	/// Scans and encodes the operand tokens that follow the mnemonic.
	pub fn encode_operands(self, scanner: &mut Scanner, labels: &LabelTable, out: &mut Vec<u8>) -> Result<()> {
		for operand in self.pattern().operands() {
			operand.encode(&scanner.scan(), labels, out)?;
		}

		Ok(())
	}

	/// Reads the operand bytes that follow the opcode and renders the whole instruction as source text.
	pub fn decode(self, reader: &mut ByteReader) -> Result<String> {
		let mut text = String::from(self.mnemonic());

		for operand in self.pattern().operands() {
			text.push(' ');
			text.push_str(&operand.decode(reader)?);
		}

		Ok(text)
	}
}

impl Pattern {
	pub fn operands(self) -> &'static [Operand] {
		use Operand::*;

		match self {
			Pattern::None => &[],
			Pattern::Register => &[Register],
			Pattern::Number => &[Number],
			Pattern::Jump => &[Jump],
			Pattern::RegisterRegister => &[Register, Register],
			Pattern::RegisterMemory => &[Register, Memory],
			Pattern::MemoryRegister => &[Memory, Register],
			Pattern::JumpRegister => &[Jump, Register],
			Pattern::RegisterJump => &[Register, Jump],
			Pattern::NumberJump => &[Number, Jump],
			Pattern::JumpJump => &[Jump, Jump],
			Pattern::NumberRegister => &[Number, Register],
		}
	}

	pub fn token_count(self) -> usize { 1 + self.operands().len() }

	pub fn byte_count(self) -> u16 { 1 + self.operands().iter().map(|o| o.width()).sum::<u16>() }
}

impl Operand {
	pub fn width(self) -> u16 {
		match self {
			Operand::Register | Operand::Number => 1,
			Operand::Memory | Operand::Jump => 2,
		}
	}

	pub fn encode(self, token: &Token, labels: &LabelTable, out: &mut Vec<u8>) -> Result<()> {
		match self {
			Operand::Register => out.push(encoder::register_byte(token)?),
			Operand::Number => out.push(encoder::number_byte(token)?),
			Operand::Memory => out.extend(encoder::memory_address(token)?.to_be_bytes()),
			Operand::Jump => out.extend(encoder::jump_address(token, labels)?.to_be_bytes()),
		}

		Ok(())
	}

	pub fn decode(self, reader: &mut ByteReader) -> Result<String> {
		match self {
			Operand::Register => Ok(decoder::register_text(reader.read_byte("a register operand")?)),
			Operand::Number => Ok(decoder::number_text(reader.read_byte("a number operand")?)),
			Operand::Memory => Ok(decoder::address_text(reader.read_address("a memory operand")?)),
			Operand::Jump => Ok(decoder::address_text(reader.read_address("a jump operand")?)),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn opcodes_and_mnemonics_are_unique() {
		let opcodes: HashSet<u8> = Inst::ALL.iter().map(|i| i.opcode()).collect();
		let mnemonics: HashSet<&str> = Inst::ALL.iter().map(|i| i.mnemonic()).collect();

		assert_eq!(opcodes.len(), Inst::ALL.len());
		assert_eq!(mnemonics.len(), Inst::ALL.len());
	}

	#[test]
	fn lookups_agree_in_both_directions() {
		for &inst in Inst::ALL {
			assert_eq!(Inst::from_opcode(inst.opcode()), Some(inst));
			assert_eq!(Inst::from_mnemonic(inst.mnemonic()), Some(inst));
			assert_eq!(Inst::from_mnemonic(&inst.mnemonic().to_uppercase()), Some(inst));
		}

		assert_eq!(Inst::from_opcode(0xff), None);
		assert_eq!(Inst::from_mnemonic("nop"), None);
	}

	#[test]
	fn sizes_follow_the_pattern() {
		assert_eq!((Inst::Halt.token_count(), Inst::Halt.byte_count()), (1, 1));
		assert_eq!((Inst::Add.token_count(), Inst::Add.byte_count()), (2, 2));
		assert_eq!((Inst::Jump.token_count(), Inst::Jump.byte_count()), (2, 3));
		assert_eq!((Inst::JumpFlag.token_count(), Inst::JumpFlag.byte_count()), (3, 4));
		assert_eq!((Inst::LoadRegister.token_count(), Inst::LoadRegister.byte_count()), (3, 4));
		assert_eq!((Inst::Move.token_count(), Inst::Move.byte_count()), (3, 3));
		assert_eq!((Inst::IndirectRead.token_count(), Inst::IndirectRead.byte_count()), (3, 4));
		assert_eq!((Pattern::JumpJump.token_count(), Pattern::JumpJump.byte_count()), (3, 5));
	}

	#[test]
	fn operands_decode_what_they_encode() {
		let labels = LabelTable::new();
		let tokens = [
			(Operand::Register, Token::new(crate::token::TokenKind::Register, "12", 1, 0..3), "R12"),
			(Operand::Number, Token::new(crate::token::TokenKind::Hex, "ff", 1, 0..4), "255"),
			(Operand::Memory, Token::new(crate::token::TokenKind::Memory, "BEEF", 1, 0..5), "$beef"),
			(Operand::Jump, Token::new(crate::token::TokenKind::Memory, "0010", 1, 0..5), "$0010"),
		];

		for (operand, token, text) in tokens {
			let mut out = Vec::new();
			operand.encode(&token, &labels, &mut out).unwrap();
			assert_eq!(out.len(), operand.width() as usize);

			let mut reader = ByteReader::new(&out);
			assert_eq!(operand.decode(&mut reader).unwrap(), text);
			assert!(reader.is_at_end());
		}
	}
}
