//! Tree-walking evaluation of a resolved program.
//!
//! Each expression kind has exactly one evaluation rule and each statement
//! kind exactly one execution rule, dispatched by a single exhaustive
//! match per family. Execution is fail-fast: the first runtime error
//! aborts the rest of the run. Evaluation order is strictly left to right,
//! and a callee is evaluated before any of its arguments.
//!
//! Statement execution yields a [`Flow`], which is how `return` unwinds:
//! blocks and loops pass `Flow::Return` through untouched, and only the
//! function invocation that created the current call scope absorbs it.

pub mod callable;
pub mod value;

use std::{
	io::{self, Write},
	rc::Rc,
};

use callable::LoxFunction;
use value::Value;

use crate::{
	environment::{EnvId, Environments},
	error::interpreter::RuntimeError,
	parser::expression::{Expr, ExprId, Literal},
	resolver::Resolutions,
	scanner::{Token, TokenKind},
	statement::Stmt,
};

/// Outcome of executing one statement: control either continues or is
/// unwinding a `return` toward its call boundary.
#[derive(Debug)]
pub enum Flow {
	Normal,
	Return(Value),
}

/// The evaluator. Generic over its output sink so tests can capture what
/// `print` writes; the default writes to stdout.
pub struct Interpreter<W = io::Stdout> {
	environments: Environments,
	globals:      EnvId,
	environment:  EnvId,
	locals:       Resolutions,
	out:          W,
}

impl Interpreter<io::Stdout> {
	pub fn new() -> Self { Self::with_output(io::stdout()) }
}

impl Default for Interpreter<io::Stdout> {
	fn default() -> Self { Self::new() }
}

impl<W: Write> Interpreter<W> {
	pub fn with_output(out: W) -> Self {
		let mut environments = Environments::new();
		let globals = environments.push(None);
		Self { environments, globals, environment: globals, locals: Resolutions::default(), out }
	}

	pub fn into_output(self) -> W { self.out }

	/// Executes a program against the given resolution table. Stops at the
	/// first runtime error; a top-level `return` simply ends the program.
	pub fn interpret(&mut self, statements: &[Stmt], locals: Resolutions) -> Result<(), RuntimeError> {
		self.locals.extend(locals);
		for statement in statements {
			if let Flow::Return(_) = self.execute(statement)? {
				break;
			}
		}
		Ok(())
	}

	fn execute(&mut self, statement: &Stmt) -> Result<Flow, RuntimeError> {
		match statement {
			Stmt::Expression(expr) => {
				self.evaluate(expr)?;
			}
			Stmt::Print(expr) => {
				let value = self.evaluate(expr)?;
				let _ = writeln!(self.out, "{value}");
			}
			Stmt::Var { name, initializer } => {
				let value = match initializer {
					Some(expr) => self.evaluate(expr)?,
					None => Value::Nil,
				};
				self.environments.define(self.environment, &name.lexeme, value);
			}
			Stmt::Block(statements) => {
				let scope = self.environments.push(Some(self.environment));
				return self.execute_block(statements, scope);
			}
			Stmt::If { condition, then_branch, else_branch } => {
				if self.evaluate(condition)?.is_truthy() {
					return self.execute(then_branch);
				}
				if let Some(else_branch) = else_branch {
					return self.execute(else_branch);
				}
			}
			Stmt::While { condition, body } => {
				while self.evaluate(condition)?.is_truthy() {
					if let Flow::Return(value) = self.execute(body)? {
						return Ok(Flow::Return(value));
					}
				}
			}
			Stmt::Function(declaration) => {
				let function = LoxFunction::new(Rc::clone(declaration), self.environment);
				self
					.environments
					.define(self.environment, &declaration.name.lexeme, Value::Callable(function));
			}
			Stmt::Return { value, .. } => {
				let value = match value {
					Some(expr) => self.evaluate(expr)?,
					None => Value::Nil,
				};
				return Ok(Flow::Return(value));
			}
		}
		Ok(Flow::Normal)
	}

	/// Runs statements inside `scope`, restoring the caller's environment
	/// on every exit path so the child scope never leaks into the caller's
	/// lookups.
	fn execute_block(&mut self, statements: &[Stmt], scope: EnvId) -> Result<Flow, RuntimeError> {
		let previous = self.environment;
		self.environment = scope;
		let mut flow = Ok(Flow::Normal);
		for statement in statements {
			flow = self.execute(statement);
			if !matches!(flow, Ok(Flow::Normal)) {
				break;
			}
		}
		self.environment = previous;
		flow
	}

	fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
		match expr {
			Expr::Literal(literal) => Ok(match literal {
				Literal::Number(n) => Value::Number(*n),
				Literal::Str(s) => Value::Str(s.clone()),
				Literal::Bool(b) => Value::Bool(*b),
				Literal::Nil => Value::Nil,
			}),
			Expr::Grouping(inner) => self.evaluate(inner),
			Expr::Unary { operator, right } => {
				let right = self.evaluate(right)?;
				match (&operator.kind, right) {
					(TokenKind::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
					(TokenKind::Minus, _) => Err(RuntimeError::new(operator, "Operand must be a number.")),
					(_, right) => Ok(Value::Bool(!right.is_truthy())),
				}
			}
			Expr::Binary { left, operator, right } => {
				let left = self.evaluate(left)?;
				let right = self.evaluate(right)?;
				binary(operator, left, right)
			}
			Expr::Logical { left, operator, right } => {
				let left = self.evaluate(left)?;
				// The produced value is whichever operand decided the
				// result, not necessarily a boolean.
				let decided = match operator.kind {
					TokenKind::Or => left.is_truthy(),
					_ => !left.is_truthy(),
				};
				if decided {
					Ok(left)
				} else {
					self.evaluate(right)
				}
			}
			Expr::Variable { id, name } => self.look_up(name, *id),
			Expr::Assign { id, name, value } => {
				let value = self.evaluate(value)?;
				match self.locals.depth(*id) {
					Some(distance) => {
						self.environments.assign_at(self.environment, distance, name, value.clone())
					}
					None => self.environments.assign(self.globals, name, value.clone())?,
				}
				Ok(value)
			}
			Expr::Call { callee, paren, arguments } => {
				let callee = self.evaluate(callee)?;
				let mut args = Vec::with_capacity(arguments.len());
				for argument in arguments {
					args.push(self.evaluate(argument)?);
				}
				self.call(callee, args, paren)
			}
		}
	}

	/// Resolved references jump straight to their recorded scope; anything
	/// else is a global looked up by name.
	fn look_up(&self, name: &Token, id: ExprId) -> Result<Value, RuntimeError> {
		match self.locals.depth(id) {
			Some(distance) => Ok(self.environments.get_at(self.environment, distance, name)),
			None => self.environments.get(self.globals, name),
		}
	}

	/// Invokes a callable: arity is checked before any parameter binds,
	/// and the call scope chains to the function's captured environment,
	/// never the caller's.
	fn call(&mut self, callee: Value, arguments: Vec<Value>, paren: &Token) -> Result<Value, RuntimeError> {
		let Value::Callable(function) = callee else {
			return Err(RuntimeError::new(paren, "Can only call functions and classes."));
		};
		if arguments.len() != function.arity() {
			let message = format!("Expected {} arguments but got {}.", function.arity(), arguments.len());
			return Err(RuntimeError::new(paren, message));
		}
		let scope = self.environments.push(Some(function.closure));
		for (param, argument) in function.declaration.params.iter().zip(arguments) {
			self.environments.define(scope, &param.lexeme, argument);
		}
		match self.execute_block(&function.declaration.body, scope)? {
			Flow::Return(value) => Ok(value),
			Flow::Normal => Ok(Value::Nil),
		}
	}
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
	use TokenKind::*;
	let value = match (&operator.kind, left, right) {
		(Plus, Value::Number(l), Value::Number(r)) => Value::Number(l + r),
		(Plus, Value::Str(l), Value::Str(r)) => Value::Str(l + &r),
		(Plus, _, _) => {
			return Err(RuntimeError::new(operator, "Operands must be two numbers or two strings."));
		}
		(Minus, Value::Number(l), Value::Number(r)) => Value::Number(l - r),
		(Star, Value::Number(l), Value::Number(r)) => Value::Number(l * r),
		// IEEE division: dividing by zero yields an infinity.
		(Slash, Value::Number(l), Value::Number(r)) => Value::Number(l / r),
		(Greater, Value::Number(l), Value::Number(r)) => Value::Bool(l > r),
		(GreaterEqual, Value::Number(l), Value::Number(r)) => Value::Bool(l >= r),
		(Less, Value::Number(l), Value::Number(r)) => Value::Bool(l < r),
		(LessEqual, Value::Number(l), Value::Number(r)) => Value::Bool(l <= r),
		(EqualEqual, l, r) => Value::Bool(l.equals(&r)),
		(BangEqual, l, r) => Value::Bool(!l.equals(&r)),
		(_, _, _) => return Err(RuntimeError::new(operator, "Operands must be numbers.")),
	};
	Ok(value)
}
