use std::fmt;

/// A recoverable lexical error; scanning continues past it.
#[derive(thiserror::Error, Debug)]
#[error("[line {line}] Error: {kind}")]
pub struct ScanError {
	pub line: usize,
	pub kind: ScanErrorKind,
}

impl ScanError {
	pub fn new(line: usize, kind: ScanErrorKind) -> Self { Self { line, kind } }
}

#[derive(Debug)]
pub enum ScanErrorKind {
	UnexpectedCharacter(char),
	UnterminatedString,
}

impl fmt::Display for ScanErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ScanErrorKind::UnexpectedCharacter(c) => write!(f, "Unexpected character '{c}'."),
			ScanErrorKind::UnterminatedString => write!(f, "Unterminated string."),
		}
	}
}
