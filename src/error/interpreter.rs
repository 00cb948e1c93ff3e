use crate::scanner::Token;

/// A fatal runtime error: reported once with the offending token's line,
/// after which the interpreter stops executing further statements.
#[derive(thiserror::Error, Debug)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeError {
	pub line:    usize,
	pub lexeme:  String,
	pub message: String,
}

impl RuntimeError {
	pub fn new(token: &Token, message: impl Into<String>) -> Self {
		Self { line: token.line, lexeme: token.lexeme.clone(), message: message.into() }
	}
}
