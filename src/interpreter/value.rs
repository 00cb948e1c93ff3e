use std::fmt;

use crate::interpreter::callable::LoxFunction;

/// A runtime value. The variant set is closed: every value a program can
/// produce is one of these.
#[derive(Debug, Clone)]
pub enum Value {
	Nil,
	Bool(bool),
	Number(f64),
	Str(String),
	Callable(LoxFunction),
}

impl Value {
	/// Only nil and false are falsy; everything else, including 0 and the
	/// empty string, is truthy.
	pub fn is_truthy(&self) -> bool { !matches!(self, Value::Nil | Value::Bool(false)) }

	/// Structural equality within one variant; values of different
	/// variants are never equal, so `0 == false` is false.
	pub fn equals(&self, other: &Value) -> bool {
		match (self, other) {
			(Value::Nil, Value::Nil) => true,
			(Value::Bool(l), Value::Bool(r)) => l == r,
			(Value::Number(l), Value::Number(r)) => l == r,
			(Value::Str(l), Value::Str(r)) => l == r,
			(Value::Callable(l), Value::Callable(r)) => l.same(r),
			_ => false,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Nil => write!(f, "nil"),
			Value::Bool(b) => write!(f, "{b}"),
			// f64's Display already drops a trailing `.0`.
			Value::Number(n) => write!(f, "{n}"),
			Value::Str(s) => write!(f, "{s}"),
			Value::Callable(function) => write!(f, "<fn {}>", function.name()),
		}
	}
}
