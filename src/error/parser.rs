use crate::{error::Location, scanner::Token};

/// A recoverable parse error. The parser reports it, synchronizes to the
/// next statement boundary, and keeps parsing, so one parse can surface
/// several of these.
#[derive(thiserror::Error, Debug)]
#[error("[line {line}] Error{location}: {message}")]
pub struct ParseError {
	pub line:     usize,
	pub location: Location,
	pub message:  String,
}

impl ParseError {
	pub fn new(token: &Token, message: impl Into<String>) -> Self {
		Self { line: token.line, location: Location::of(token), message: message.into() }
	}
}
