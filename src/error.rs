//--> Imports <--

use std::{
	fmt,
	io,
	ops::Range,
	path::{
		Path,
		PathBuf,
	},
};

use thiserror::Error as ThisError;

use crate::token::{
	Token,
	TokenKind,
};

//--> Type Aliases <--

pub type Result<T> = std::result::Result<T, Error>;

//--> Structs <--

/// A fatal assembler or disassembler failure, optionally pinned to a source location.
#[derive(Debug)]
pub struct Error {
	pub kind: ErrorKind,
	pub file: Option<PathBuf>,
	pub line: Option<usize>,
	pub span: Option<Range<usize>>,
}

//--> Enums <--

#[derive(Debug, ThisError)]
pub enum ErrorKind {
	// lexical
	#[error("{0}")]
	Lexical(String),

	// syntactic
	#[error("expected {expected}, found {found}")]
	UnexpectedToken { expected: &'static str, found: String },
	#[error("unknown section '{0}'")]
	UnknownSection(String),
	#[error("undefined instruction '{0}'")]
	UndefinedInstruction(String),
	#[error("undefined opcode {0:#04x}")]
	UndefinedOpcode(u8),
	#[error("undefined label '{0}'")]
	UndefinedLabel(String),
	#[error("label '{0}' is defined more than once")]
	DuplicateLabel(String),
	#[error("register number '{0}' must be an integer under 256")]
	RegisterOutOfRange(String),
	#[error("number '{0}' must be an integer between 0 and 255")]
	NumberOutOfRange(String),
	#[error("malformed hexadecimal literal '{0}'")]
	MalformedHex(String),
	#[error("malformed string or character literal '{0}' (only ASCII and known escapes are allowed)")]
	MalformedText(String),

	// resources
	#[error("memory limit exceeded: address ${0:04x} is past the end of memory")]
	MemoryLimitExceeded(u32),
	#[error(transparent)]
	Io(#[from] io::Error),

	// binary images
	#[error("expected section marker FF FE FE FF at offset {0}")]
	BadSectionMarker(usize),
	#[error("unknown section kind {0:#04x}")]
	UnknownSectionKind(u8),
	#[error("expected the code section after the data section, found section kind {0:#04x}")]
	ExpectedCodeSection(u8),
	#[error("unknown data type {0:#04x}")]
	UnknownDataType(u8),
	#[error("unexpected end of image while reading {0}")]
	UnexpectedEnd(&'static str),
}

//--> Functions <--

impl Error {
	pub fn new(kind: ErrorKind, line: Option<usize>, span: Option<Range<usize>>) -> Error {
		Error { kind, file: None, line, span }
	}

	/// Attaches the path of the file being worked on.
	pub fn with_file(mut self, path: &Path) -> Error {
		self.file = Some(path.to_path_buf());
		self
	}

	/// Builds an error located at the given token.
	pub fn at(kind: ErrorKind, token: &Token) -> Error {
		Error::new(kind, Some(token.line), Some(token.span.clone()))
	}

	/// Reports a token that showed up where something else was required.
	///
	/// Lexical error tokens carry their own message, which is more useful than "expected X, found an error".
	pub fn unexpected(expected: &'static str, token: &Token) -> Error {
		match token.kind {
			TokenKind::Error => Error::at(ErrorKind::Lexical(token.literal.clone()), token),
			_ => Error::at(ErrorKind::UnexpectedToken { expected, found: token.to_string() }, token),
		}
	}

	pub fn is_io(&self) -> bool { matches!(self.kind, ErrorKind::Io(_)) }
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error { Error::new(kind, None, None) }
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Error { Error::from(ErrorKind::Io(err)) }
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> { std::error::Error::source(&self.kind) }
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if let Some(path) = &self.file { write!(f, "{}: ", path.display())?; }

		match self.line {
			Some(l) => match &self.span {
				Some(s) => write!(f, "{}: {}..{}: {}", l, s.start, s.end, self.kind),
				None => write!(f, "{}: {}", l, self.kind)
			},
			None => write!(f, "{}", self.kind)
		}
	}
}
