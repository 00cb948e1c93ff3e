//! Static scope resolution over the finished statement tree.
//!
//! One pass that mirrors, scope-for-scope, the environment chain the
//! interpreter builds at run time: a scope is pushed on entering a block
//! or function body and popped on leaving it, and every variable-reference
//! site gets the number of scope hops between it and the declaration it
//! binds to. A reference no scope claims is left out of the table, which
//! means "look it up by name in the globals at run time". If this pass and
//! the interpreter ever disagree about which constructs introduce a scope,
//! variable resolution silently breaks, so any change here must be made in
//! both places.

use std::collections::HashMap;

use crate::{
	error::resolver::{ResolveError, ResolveErrorKind},
	parser::expression::{Expr, ExprId},
	scanner::Token,
	statement::{FunctionDecl, Stmt},
};

/// Hop distances per reference site, built once before interpretation and
/// only read afterwards. Absence of an entry means the reference is
/// resolved by name in the global environment.
#[derive(Debug, Default)]
pub struct Resolutions {
	depths: HashMap<ExprId, usize>,
}

impl Resolutions {
	pub fn depth(&self, id: ExprId) -> Option<usize> { self.depths.get(&id).copied() }

	pub fn len(&self) -> usize { self.depths.len() }

	pub fn is_empty(&self) -> bool { self.depths.is_empty() }

	/// Merges another table in; a REPL session accumulates one table
	/// across lines so earlier functions stay resolvable.
	pub fn extend(&mut self, other: Resolutions) { self.depths.extend(other.depths); }

	fn insert(&mut self, id: ExprId, depth: usize) { self.depths.insert(id, depth); }
}

/// Each scope maps a declared name to whether its initializer has finished
/// resolving; `false` catches a variable read inside its own initializer.
pub struct Resolver {
	scopes:      Vec<HashMap<String, bool>>,
	resolutions: Resolutions,
	errors:      Vec<ResolveError>,
}

impl Resolver {
	/// Resolves a whole program, accumulating every error found.
	pub fn resolve(statements: &[Stmt]) -> (Resolutions, Vec<ResolveError>) {
		let mut resolver = Self { scopes: Vec::new(), resolutions: Resolutions::default(), errors: Vec::new() };
		resolver.resolve_statements(statements);
		(resolver.resolutions, resolver.errors)
	}

	fn resolve_statements(&mut self, statements: &[Stmt]) {
		for statement in statements {
			self.resolve_statement(statement);
		}
	}

	fn resolve_statement(&mut self, statement: &Stmt) {
		match statement {
			Stmt::Block(statements) => {
				self.begin_scope();
				self.resolve_statements(statements);
				self.end_scope();
			}
			Stmt::Var { name, initializer } => {
				self.declare(name);
				if let Some(initializer) = initializer {
					self.resolve_expression(initializer);
				}
				self.define(name);
			}
			Stmt::Function(declaration) => {
				// The name is defined before the body resolves, so the
				// function can call itself.
				self.declare(&declaration.name);
				self.define(&declaration.name);
				self.resolve_function(declaration);
			}
			Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expression(expr),
			Stmt::If { condition, then_branch, else_branch } => {
				self.resolve_expression(condition);
				self.resolve_statement(then_branch);
				if let Some(else_branch) = else_branch {
					self.resolve_statement(else_branch);
				}
			}
			Stmt::While { condition, body } => {
				self.resolve_expression(condition);
				self.resolve_statement(body);
			}
			Stmt::Return { value, .. } => {
				if let Some(value) = value {
					self.resolve_expression(value);
				}
			}
		}
	}

	/// One scope holds both parameters and body locals, matching the one
	/// environment a call creates at run time.
	fn resolve_function(&mut self, declaration: &FunctionDecl) {
		self.begin_scope();
		for param in &declaration.params {
			self.declare(param);
			self.define(param);
		}
		self.resolve_statements(&declaration.body);
		self.end_scope();
	}

	fn resolve_expression(&mut self, expr: &Expr) {
		match expr {
			Expr::Literal(_) => {}
			Expr::Grouping(inner) => self.resolve_expression(inner),
			Expr::Unary { right, .. } => self.resolve_expression(right),
			Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
				self.resolve_expression(left);
				self.resolve_expression(right);
			}
			Expr::Call { callee, arguments, .. } => {
				self.resolve_expression(callee);
				for argument in arguments {
					self.resolve_expression(argument);
				}
			}
			Expr::Variable { id, name } => {
				if self.scopes.last().is_some_and(|scope| scope.get(&name.lexeme) == Some(&false)) {
					self
						.errors
						.push(ResolveError::new(name, ResolveErrorKind::SelfReferencingInitializer));
				}
				self.resolve_local(*id, name);
			}
			Expr::Assign { id, name, value } => {
				self.resolve_expression(value);
				self.resolve_local(*id, name);
			}
		}
	}

	/// Searches the scope stack innermost-out and records the hop count of
	/// the first match; no match means the reference is global.
	fn resolve_local(&mut self, id: ExprId, name: &Token) {
		for (hops, scope) in self.scopes.iter().rev().enumerate() {
			if scope.contains_key(&name.lexeme) {
				self.resolutions.insert(id, hops);
				return;
			}
		}
	}

	fn declare(&mut self, name: &Token) {
		if let Some(scope) = self.scopes.last_mut() {
			scope.insert(name.lexeme.clone(), false);
		}
	}

	fn define(&mut self, name: &Token) {
		if let Some(scope) = self.scopes.last_mut() {
			scope.insert(name.lexeme.clone(), true);
		}
	}

	fn begin_scope(&mut self) { self.scopes.push(HashMap::new()); }

	fn end_scope(&mut self) { self.scopes.pop(); }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{parser::Parser, scanner::Scanner};

	fn analyze(source: &str) -> (Vec<Stmt>, Resolutions, Vec<ResolveError>) {
		let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
		assert!(scan_errors.is_empty());
		let (statements, parse_errors) = Parser::new(tokens).parse();
		assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");
		let (resolutions, errors) = Resolver::resolve(&statements);
		(statements, resolutions, errors)
	}

	/// Collects every reference site in source order as (name, id).
	fn reference_sites(statements: &[Stmt]) -> Vec<(String, ExprId)> {
		fn walk_statement(statement: &Stmt, out: &mut Vec<(String, ExprId)>) {
			match statement {
				Stmt::Expression(e) | Stmt::Print(e) => walk_expression(e, out),
				Stmt::Var { initializer, .. } => {
					if let Some(e) = initializer {
						walk_expression(e, out);
					}
				}
				Stmt::Block(statements) => statements.iter().for_each(|s| walk_statement(s, out)),
				Stmt::If { condition, then_branch, else_branch } => {
					walk_expression(condition, out);
					walk_statement(then_branch, out);
					if let Some(else_branch) = else_branch {
						walk_statement(else_branch, out);
					}
				}
				Stmt::While { condition, body } => {
					walk_expression(condition, out);
					walk_statement(body, out);
				}
				Stmt::Function(decl) => decl.body.iter().for_each(|s| walk_statement(s, out)),
				Stmt::Return { value, .. } => {
					if let Some(e) = value {
						walk_expression(e, out);
					}
				}
			}
		}
		fn walk_expression(expr: &Expr, out: &mut Vec<(String, ExprId)>) {
			match expr {
				Expr::Literal(_) => {}
				Expr::Grouping(inner) => walk_expression(inner, out),
				Expr::Unary { right, .. } => walk_expression(right, out),
				Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
					walk_expression(left, out);
					walk_expression(right, out);
				}
				Expr::Call { callee, arguments, .. } => {
					walk_expression(callee, out);
					arguments.iter().for_each(|a| walk_expression(a, out));
				}
				Expr::Variable { id, name } => out.push((name.lexeme.clone(), *id)),
				Expr::Assign { id, name, value } => {
					walk_expression(value, out);
					out.push((name.lexeme.clone(), *id));
				}
			}
		}
		let mut out = Vec::new();
		statements.iter().for_each(|s| walk_statement(s, &mut out));
		out
	}

	#[test]
	fn global_references_stay_out_of_the_table() {
		let (statements, resolutions, errors) = analyze("var a = 1; print a;");
		assert!(errors.is_empty());
		assert!(resolutions.is_empty());
		let sites = reference_sites(&statements);
		assert_eq!(sites.len(), 1);
		assert_eq!(resolutions.depth(sites[0].1), None);
	}

	#[test]
	fn hop_counts_match_block_nesting() {
		let (statements, resolutions, errors) = analyze("{ var a = 1; { print a; a = 2; } print a; }");
		assert!(errors.is_empty());
		let sites = reference_sites(&statements);
		let depths: Vec<_> = sites.iter().map(|(_, id)| resolutions.depth(*id)).collect();
		// Inner read and write hop once; the sibling read hops zero times.
		assert_eq!(depths, vec![Some(1), Some(1), Some(0)]);
	}

	#[test]
	fn shadowing_rebinds_the_inner_reference() {
		let (statements, resolutions, errors) = analyze("{ var a = 1; { var a = 2; print a; } }");
		assert!(errors.is_empty());
		let sites = reference_sites(&statements);
		assert_eq!(sites.last().map(|(name, _)| name.as_str()), Some("a"));
		assert_eq!(resolutions.depth(sites.last().unwrap().1), Some(0));
	}

	#[test]
	fn parameters_resolve_inside_the_function_scope() {
		let (statements, resolutions, errors) = analyze("fun f(x) { print x; { print x; } }");
		assert!(errors.is_empty());
		let sites = reference_sites(&statements);
		let depths: Vec<_> = sites.iter().map(|(_, id)| resolutions.depth(*id)).collect();
		assert_eq!(depths, vec![Some(0), Some(1)]);
	}

	#[test]
	fn closure_reference_hops_to_the_defining_function() {
		let source = "fun outer() { var x = 1; fun inner() { return x; } }";
		let (statements, resolutions, errors) = analyze(source);
		assert!(errors.is_empty());
		let sites = reference_sites(&statements);
		assert_eq!(sites.len(), 1);
		assert_eq!(resolutions.depth(sites[0].1), Some(1));
	}

	#[test]
	fn self_referencing_initializer_is_an_error() {
		let (_, _, errors) = analyze("{ var a = a; }");
		assert_eq!(errors.len(), 1);
		assert_eq!(
			errors[0].to_string(),
			"[line 1] Error at 'a': Can't read local variable in its own initializer."
		);
	}

	#[test]
	fn resolution_continues_past_an_error() {
		let (statements, resolutions, errors) = analyze("{ var a = a; var b = 1; print b; }");
		assert_eq!(errors.len(), 1);
		let sites = reference_sites(&statements);
		let b_site = sites.iter().find(|(name, _)| name == "b").unwrap();
		assert_eq!(resolutions.depth(b_site.1), Some(0));
	}

	#[test]
	fn global_self_reference_is_not_an_error() {
		// At the top level there is no enclosing scope to be caught in.
		let (_, _, errors) = analyze("var a = a;");
		assert!(errors.is_empty());
	}
}
