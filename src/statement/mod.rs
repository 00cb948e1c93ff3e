//! Statement AST nodes.
//!
//! Statements and expressions never mix positions in the grammar: operator
//! operands are always expressions, a loop body is always a statement. A
//! program is an ordered sequence of statements.

use std::rc::Rc;

use crate::{parser::expression::Expr, scanner::Token};

#[derive(Debug)]
pub enum Stmt {
	/// An expression evaluated for its side effects.
	Expression(Expr),
	/// `print expr;` writes the value's display form plus a newline.
	Print(Expr),
	/// `var name = initializer;`; the initializer defaults to nil.
	Var { name: Token, initializer: Option<Expr> },
	/// `{ ... }` runs its statements in a fresh child scope.
	Block(Vec<Stmt>),
	If { condition: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>> },
	While { condition: Expr, body: Box<Stmt> },
	/// A function declaration. Shared via `Rc` so a runtime callable can
	/// hold the declaration without cloning its body.
	Function(Rc<FunctionDecl>),
	Return { keyword: Token, value: Option<Expr> },
}

/// A named function: parameter list plus body, as written in the source.
#[derive(Debug)]
pub struct FunctionDecl {
	pub name:   Token,
	pub params: Vec<Token>,
	pub body:   Vec<Stmt>,
}
