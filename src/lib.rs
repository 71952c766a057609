//! Two-pass cross-assembler and disassembler for the TIS toy CPU.
//!
//! Source text is assembled into a raw load image (see [`image`] for the layout), and load images can be turned back
//! into annotated assembly text or placed into a 64 KiB memory map.

//--> Imports <--

// Handles turning load images back into assembly text.
pub mod decoder;

// Handles the second pass, which writes the load image.
pub mod encoder;

pub mod error;

// Describes the load image layout and reads images safely.
pub mod image;

// The instruction set: mnemonics, opcodes and operand patterns.
pub mod instructions;

// Handles splitting source text into tokens.
pub mod lexer;

// Handles placing load images into memory.
pub mod loader;

// Handles the first pass, which works out where every label lives.
pub mod tags;

// Handles strings and characters going into and out of assembly.
pub mod text;

pub mod token;

pub use error::{
	Error,
	ErrorKind,
	Result,
};

pub use decoder::disassemble;

pub use loader::{
	load,
	Memory,
};

pub use tags::LabelTable;

//--> Functions <--

/// Assembles source text into a load image.
///
/// The first pass resolves every label; nothing is encoded unless it succeeds.
pub fn assemble(source: &str) -> Result<Vec<u8>> {
	assemble_with_labels(source).map(|(image, _)| image)
}

/// Like [`assemble`], but also hands back the label table of the first pass.
pub fn assemble_with_labels(source: &str) -> Result<(Vec<u8>, LabelTable)> {
	tracing::trace!("starting pass 1");
	let labels = tags::resolve(source)?;
	tracing::debug!("resolved {} labels", labels.len());

	tracing::trace!("starting pass 2");
	let image = encoder::Encoder::new(source, &labels).encode()?;
	tracing::debug!("encoded {} bytes", image.len());

	Ok((image, labels))
}
