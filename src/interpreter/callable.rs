use std::rc::Rc;

use crate::{environment::EnvId, statement::FunctionDecl};

/// A user-defined function value: its declaration plus the environment in
/// effect where it was declared. Capturing the defining environment, not
/// the caller's, is what makes scoping lexical rather than dynamic.
#[derive(Debug, Clone)]
pub struct LoxFunction {
	pub declaration: Rc<FunctionDecl>,
	pub closure:     EnvId,
}

impl LoxFunction {
	pub fn new(declaration: Rc<FunctionDecl>, closure: EnvId) -> Self { Self { declaration, closure } }

	/// The exact number of arguments an invocation must pass.
	pub fn arity(&self) -> usize { self.declaration.params.len() }

	pub fn name(&self) -> &str { &self.declaration.name.lexeme }

	/// Identity comparison: the same declaration captured in the same
	/// environment.
	pub fn same(&self, other: &LoxFunction) -> bool {
		Rc::ptr_eq(&self.declaration, &other.declaration) && self.closure == other.closure
	}
}
