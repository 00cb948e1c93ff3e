//! Lexical environments, kept in one arena of scope records.
//!
//! A scope record maps names to values and points at an optional parent,
//! forming chains rooted at the global scope. Records are addressed by a
//! copyable [`EnvId`], which is what a closure stores to pin the scope it
//! was defined in, with no shared-pointer juggling; a scope stays
//! addressable for as long as the arena (that is, the run) lives.

use std::collections::HashMap;

use crate::{error::interpreter::RuntimeError, interpreter::value::Value, scanner::Token};

/// Stable address of one scope record in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvId(usize);

#[derive(Debug)]
struct Scope {
	values: HashMap<String, Value>,
	parent: Option<EnvId>,
}

/// The arena. All ids handed out remain valid until it is dropped.
#[derive(Debug, Default)]
pub struct Environments {
	scopes: Vec<Scope>,
}

impl Environments {
	pub fn new() -> Self { Self::default() }

	/// Creates a new scope chained to `parent` and returns its address.
	pub fn push(&mut self, parent: Option<EnvId>) -> EnvId {
		self.scopes.push(Scope { values: HashMap::new(), parent });
		EnvId(self.scopes.len() - 1)
	}

	/// Introduces or overwrites a binding in `env` itself. Redeclaration
	/// is legal; variables are always mutable.
	pub fn define(&mut self, env: EnvId, name: &str, value: Value) {
		self.scopes[env.0].values.insert(name.to_owned(), value);
	}

	/// Walks outward through the parent chain for `name`.
	pub fn get(&self, env: EnvId, name: &Token) -> Result<Value, RuntimeError> {
		let mut current = Some(env);
		while let Some(id) = current {
			let scope = &self.scopes[id.0];
			if let Some(value) = scope.values.get(&name.lexeme) {
				return Ok(value.clone());
			}
			current = scope.parent;
		}
		Err(undefined(name))
	}

	/// Walks outward through the parent chain and assigns where `name` is
	/// already bound.
	pub fn assign(&mut self, env: EnvId, name: &Token, value: Value) -> Result<(), RuntimeError> {
		let mut current = Some(env);
		while let Some(id) = current {
			let scope = &mut self.scopes[id.0];
			if let Some(slot) = scope.values.get_mut(&name.lexeme) {
				*slot = value;
				return Ok(());
			}
			current = scope.parent;
		}
		Err(undefined(name))
	}

	/// Reads `name` exactly `distance` parents outward, with no search.
	/// Valid only for distances the resolver computed; the target scope is
	/// trusted to hold the name.
	pub fn get_at(&self, env: EnvId, distance: usize, name: &Token) -> Value {
		let target = self.ancestor(env, distance);
		let scope = &self.scopes[target.0];
		debug_assert!(
			scope.values.contains_key(&name.lexeme),
			"resolved distance {distance} points at a scope missing '{}'",
			name.lexeme
		);
		scope.values.get(&name.lexeme).cloned().unwrap_or(Value::Nil)
	}

	/// Writes `name` exactly `distance` parents outward, with no search.
	pub fn assign_at(&mut self, env: EnvId, distance: usize, name: &Token, value: Value) {
		let target = self.ancestor(env, distance);
		let scope = &mut self.scopes[target.0];
		debug_assert!(
			scope.values.contains_key(&name.lexeme),
			"resolved distance {distance} points at a scope missing '{}'",
			name.lexeme
		);
		scope.values.insert(name.lexeme.clone(), value);
	}

	fn ancestor(&self, env: EnvId, distance: usize) -> EnvId {
		let mut id = env;
		for _ in 0..distance {
			match self.scopes[id.0].parent {
				Some(parent) => id = parent,
				None => {
					debug_assert!(false, "resolved distance {distance} overruns the environment chain");
					break;
				}
			}
		}
		id
	}
}

fn undefined(name: &Token) -> RuntimeError {
	RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme))
}
