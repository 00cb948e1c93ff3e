use std::fmt;

use crate::{error::Location, scanner::Token};

/// A recoverable static-analysis error; resolution continues past it.
#[derive(thiserror::Error, Debug)]
#[error("[line {line}] Error{location}: {kind}")]
pub struct ResolveError {
	pub line:     usize,
	pub location: Location,
	pub kind:     ResolveErrorKind,
}

impl ResolveError {
	pub fn new(token: &Token, kind: ResolveErrorKind) -> Self {
		Self { line: token.line, location: Location::of(token), kind }
	}
}

#[derive(Debug)]
pub enum ResolveErrorKind {
	/// A variable initializer reads the variable it is declaring.
	SelfReferencingInitializer,
}

impl fmt::Display for ResolveErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResolveErrorKind::SelfReferencingInitializer => {
				write!(f, "Can't read local variable in its own initializer.")
			}
		}
	}
}
