pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;

use std::fmt;

use crate::scanner::{Token, TokenKind};

/// Where a compile-time diagnostic points within the source, rendered as
/// the `<location>` part of `[line N] Error<location>: message`.
#[derive(Debug, Clone)]
pub enum Location {
	/// No token is associated with the diagnostic.
	None,
	/// The diagnostic points at the end of input.
	End,
	/// The diagnostic points at a located token's lexeme.
	At(String),
}

impl Location {
	pub fn of(token: &Token) -> Self {
		if token.kind == TokenKind::Eof {
			Location::End
		} else {
			Location::At(token.lexeme.clone())
		}
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Location::None => Ok(()),
			Location::End => write!(f, " at end"),
			Location::At(lexeme) => write!(f, " at '{lexeme}'"),
		}
	}
}

/// Top-level outcome of a run, as exposed to the process driver.
#[derive(thiserror::Error, Debug)]
pub enum LoxError {
	/// Host-side failure (file IO and the like), never a language error.
	#[error("{0:#}")]
	Internal(#[from] anyhow::Error),
	/// One or more lexical or parse errors, already reported to stderr.
	#[error("{0} syntax error(s)")]
	SyntaxErrors(usize),
	/// One or more resolution errors, already reported to stderr.
	#[error("{0} resolution error(s)")]
	ResolveErrors(usize),
	/// The first (and only) runtime error of the run.
	#[error(transparent)]
	Runtime(#[from] interpreter::RuntimeError),
}

impl LoxError {
	/// Process exit code for this outcome: 65 for any error caught before
	/// execution, 70 for a runtime error.
	pub fn exit_code(&self) -> i32 {
		match self {
			LoxError::Internal(_) => 1,
			LoxError::SyntaxErrors(_) | LoxError::ResolveErrors(_) => 65,
			LoxError::Runtime(_) => 70,
		}
	}
}
