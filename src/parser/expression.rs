//! Expression AST nodes.
//!
//! An expression is a tree: each node exclusively owns its children, and a
//! node is never shared or revisited once built. Variable-reference sites
//! (`Variable` and `Assign`) additionally carry an [`ExprId`], the stable
//! node identity the resolver keys its distance table on.

use std::fmt;

use crate::scanner::Token;

/// Stable identity of one variable-reference site, assigned by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub usize);

#[derive(Debug)]
pub enum Expr {
	Literal(Literal),
	Grouping(Box<Expr>),
	Unary { operator: Token, right: Box<Expr> },
	Binary { left: Box<Expr>, operator: Token, right: Box<Expr> },
	Logical { left: Box<Expr>, operator: Token, right: Box<Expr> },
	Variable { id: ExprId, name: Token },
	Assign { id: ExprId, name: Token, value: Box<Expr> },
	Call { callee: Box<Expr>, paren: Token, arguments: Vec<Expr> },
}

impl Expr {
	pub fn binary(left: Expr, operator: Token, right: Expr) -> Expr {
		Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
	}

	pub fn logical(left: Expr, operator: Token, right: Expr) -> Expr {
		Expr::Logical { left: Box::new(left), operator, right: Box::new(right) }
	}

	pub fn unary(operator: Token, right: Expr) -> Expr { Expr::Unary { operator, right: Box::new(right) } }

	pub fn grouping(inner: Expr) -> Expr { Expr::Grouping(Box::new(inner)) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
	Number(f64),
	Str(String),
	Bool(bool),
	Nil,
}

// The parenthesized tree form, used by the parser tests to pin down
// precedence and associativity.
impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Expr::Literal(literal) => write!(f, "{literal}"),
			Expr::Grouping(inner) => write!(f, "(group {inner})"),
			Expr::Unary { operator, right } => write!(f, "({} {right})", operator.lexeme),
			Expr::Binary { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			Expr::Logical { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			Expr::Variable { name, .. } => write!(f, "{}", name.lexeme),
			Expr::Assign { name, value, .. } => write!(f, "(= {} {value})", name.lexeme),
			Expr::Call { callee, arguments, .. } => {
				write!(f, "(call {callee}")?;
				for argument in arguments {
					write!(f, " {argument}")?;
				}
				write!(f, ")")
			}
		}
	}
}

impl fmt::Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Literal::Number(n) => write!(f, "{n}"),
			Literal::Str(s) => write!(f, "\"{s}\""),
			Literal::Bool(b) => write!(f, "{b}"),
			Literal::Nil => write!(f, "nil"),
		}
	}
}
