//! Recursive-descent parsing: tokens in, a statement sequence out.
//!
//! Statement grammar:
//!
//! ```BNF
//! program     → declaration* EOF ;
//! declaration → funDecl | varDecl | statement ;
//! funDecl     → "fun" IDENTIFIER "(" parameters? ")" block ;
//! varDecl     → "var" IDENTIFIER ( "=" expression )? ";" ;
//! statement   → exprStmt | forStmt | ifStmt | printStmt
//!             | returnStmt | whileStmt | block ;
//! ```
//!
//! Expression grammar, precedence low to high:
//!
//! ```BNF
//! expression → assignment ;
//! assignment → IDENTIFIER "=" assignment | logic_or ;
//! logic_or   → logic_and ( "or" logic_and )* ;
//! logic_and  → equality ( "and" equality )* ;
//! equality   → comparison ( ( "!=" | "==" ) comparison )* ;
//! comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
//! term       → factor ( ( "-" | "+" ) factor )* ;
//! factor     → unary ( ( "/" | "*" ) unary )* ;
//! unary      → ( "!" | "-" ) unary | call ;
//! call       → primary ( "(" arguments? ")" )* ;
//! primary    → NUMBER | STRING | "true" | "false" | "nil"
//!            | IDENTIFIER | "(" expression ")" ;
//! ```
//!
//! A `for` loop is desugared here into an equivalent `while`, so no
//! dedicated node for it exists downstream. Parse errors never cross this
//! module's boundary as panics or early exits: each one is recorded, the
//! parser discards tokens to a likely statement boundary, and parsing
//! resumes, so a single pass reports every independent error.

pub mod expression;

use std::{mem, rc::Rc};

use expression::{Expr, ExprId, Literal};

use crate::{
	error::parser::ParseError,
	scanner::{Token, TokenKind},
	statement::{FunctionDecl, Stmt},
};

/// The most arguments or parameters one function can have.
const MAX_ARITY: usize = 255;

pub struct Parser {
	tokens:  Vec<Token>,
	current: usize,
	next_id: usize,
	errors:  Vec<ParseError>,
}

impl Parser {
	pub fn new(tokens: Vec<Token>) -> Self { Self::with_first_id(tokens, 0) }

	/// A parser that numbers reference sites starting at `first_id`, so a
	/// REPL session can keep ids unique across successive lines.
	pub fn with_first_id(tokens: Vec<Token>, first_id: usize) -> Self {
		debug_assert!(matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof));
		Self { tokens, current: 0, next_id: first_id, errors: Vec::new() }
	}

	/// The first reference-site id not used by this parser.
	pub fn next_id(&self) -> usize { self.next_id }

	/// Parses a whole program, accumulating every parse error found.
	pub fn parse(&mut self) -> (Vec<Stmt>, Vec<ParseError>) {
		let mut statements = Vec::new();
		while !self.is_at_end() {
			if let Some(statement) = self.declaration() {
				statements.push(statement);
			}
		}
		(statements, mem::take(&mut self.errors))
	}

	/// Parses one declaration; on a malformed one, records the error and
	/// synchronizes so the next declaration parses cleanly.
	fn declaration(&mut self) -> Option<Stmt> {
		let result = if self.advance_if(&TokenKind::Fun) {
			self.function()
		} else if self.advance_if(&TokenKind::Var) {
			self.var_declaration()
		} else {
			self.statement()
		};
		match result {
			Ok(statement) => Some(statement),
			Err(error) => {
				self.errors.push(error);
				self.synchronize();
				None
			}
		}
	}

	fn function(&mut self) -> Result<Stmt, ParseError> {
		let name = self.consume(TokenKind::Identifier, "Expect function name.")?;
		self.consume(TokenKind::LeftParen, "Expect '(' after function name.")?;
		let mut params = Vec::new();
		if !self.check(&TokenKind::RightParen) {
			loop {
				if params.len() >= MAX_ARITY {
					let error = ParseError::new(self.peek(), "Can't have more than 255 parameters.");
					self.errors.push(error);
				}
				params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?);
				if !self.advance_if(&TokenKind::Comma) {
					break;
				}
			}
		}
		self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;
		self.consume(TokenKind::LeftBrace, "Expect '{' before function body.")?;
		let body = self.block()?;
		Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
	}

	fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
		let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;
		let initializer = if self.advance_if(&TokenKind::Equal) { Some(self.expression()?) } else { None };
		self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
		Ok(Stmt::Var { name, initializer })
	}

	fn statement(&mut self) -> Result<Stmt, ParseError> {
		if self.advance_if(&TokenKind::For) {
			return self.for_statement();
		}
		if self.advance_if(&TokenKind::If) {
			return self.if_statement();
		}
		if self.advance_if(&TokenKind::Print) {
			return self.print_statement();
		}
		if self.advance_if(&TokenKind::Return) {
			return self.return_statement();
		}
		if self.advance_if(&TokenKind::While) {
			return self.while_statement();
		}
		if self.advance_if(&TokenKind::LeftBrace) {
			return Ok(Stmt::Block(self.block()?));
		}
		self.expression_statement()
	}

	/// Desugars `for (init; cond; incr) body` into a while loop: the
	/// increment is appended inside the loop body, a missing condition
	/// becomes `true`, and an initializer wraps the whole thing in a block.
	fn for_statement(&mut self) -> Result<Stmt, ParseError> {
		self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

		let initializer = if self.advance_if(&TokenKind::Semicolon) {
			None
		} else if self.advance_if(&TokenKind::Var) {
			Some(self.var_declaration()?)
		} else {
			Some(self.expression_statement()?)
		};

		let condition = if self.check(&TokenKind::Semicolon) { None } else { Some(self.expression()?) };
		self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

		let increment = if self.check(&TokenKind::RightParen) { None } else { Some(self.expression()?) };
		self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

		let mut body = self.statement()?;
		if let Some(increment) = increment {
			body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
		}
		let condition = condition.unwrap_or(Expr::Literal(Literal::Bool(true)));
		body = Stmt::While { condition, body: Box::new(body) };
		if let Some(initializer) = initializer {
			body = Stmt::Block(vec![initializer, body]);
		}
		Ok(body)
	}

	fn if_statement(&mut self) -> Result<Stmt, ParseError> {
		self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
		let condition = self.expression()?;
		self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;
		let then_branch = Box::new(self.statement()?);
		let else_branch =
			if self.advance_if(&TokenKind::Else) { Some(Box::new(self.statement()?)) } else { None };
		Ok(Stmt::If { condition, then_branch, else_branch })
	}

	fn while_statement(&mut self) -> Result<Stmt, ParseError> {
		self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
		let condition = self.expression()?;
		self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
		let body = Box::new(self.statement()?);
		Ok(Stmt::While { condition, body })
	}

	fn print_statement(&mut self) -> Result<Stmt, ParseError> {
		let value = self.expression()?;
		self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
		Ok(Stmt::Print(value))
	}

	fn return_statement(&mut self) -> Result<Stmt, ParseError> {
		let keyword = self.previous().clone();
		let value = if self.check(&TokenKind::Semicolon) { None } else { Some(self.expression()?) };
		self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
		Ok(Stmt::Return { keyword, value })
	}

	fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
		let expr = self.expression()?;
		self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
		Ok(Stmt::Expression(expr))
	}

	/// The interior of a brace-delimited block; also reused as a function
	/// body by [`Parser::function`].
	fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
		let mut statements = Vec::new();
		while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
			if let Some(statement) = self.declaration() {
				statements.push(statement);
			}
		}
		self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
		Ok(statements)
	}

	fn expression(&mut self) -> Result<Expr, ParseError> { self.assignment() }

	fn assignment(&mut self) -> Result<Expr, ParseError> {
		let expr = self.or()?;
		if self.advance_if(&TokenKind::Equal) {
			let equals = self.previous().clone();
			let value = self.assignment()?;
			match expr {
				Expr::Variable { id, name } => return Ok(Expr::Assign { id, name, value: Box::new(value) }),
				other => {
					// Reported but not fatal; the left-hand side stands.
					self.errors.push(ParseError::new(&equals, "Invalid assignment target."));
					return Ok(other);
				}
			}
		}
		Ok(expr)
	}

	fn or(&mut self) -> Result<Expr, ParseError> {
		let mut expr = self.and()?;
		while matches!(self.peek().kind, TokenKind::Or) {
			let operator = self.advance().clone();
			expr = Expr::logical(expr, operator, self.and()?);
		}
		Ok(expr)
	}

	fn and(&mut self) -> Result<Expr, ParseError> {
		let mut expr = self.equality()?;
		while matches!(self.peek().kind, TokenKind::And) {
			let operator = self.advance().clone();
			expr = Expr::logical(expr, operator, self.equality()?);
		}
		Ok(expr)
	}

	fn equality(&mut self) -> Result<Expr, ParseError> {
		let mut expr = self.comparison()?;
		while matches!(self.peek().kind, TokenKind::BangEqual | TokenKind::EqualEqual) {
			let operator = self.advance().clone();
			expr = Expr::binary(expr, operator, self.comparison()?);
		}
		Ok(expr)
	}

	fn comparison(&mut self) -> Result<Expr, ParseError> {
		let mut expr = self.term()?;
		while matches!(
			self.peek().kind,
			TokenKind::Greater | TokenKind::GreaterEqual | TokenKind::Less | TokenKind::LessEqual
		) {
			let operator = self.advance().clone();
			expr = Expr::binary(expr, operator, self.term()?);
		}
		Ok(expr)
	}

	fn term(&mut self) -> Result<Expr, ParseError> {
		let mut expr = self.factor()?;
		while matches!(self.peek().kind, TokenKind::Minus | TokenKind::Plus) {
			let operator = self.advance().clone();
			expr = Expr::binary(expr, operator, self.factor()?);
		}
		Ok(expr)
	}

	fn factor(&mut self) -> Result<Expr, ParseError> {
		let mut expr = self.unary()?;
		while matches!(self.peek().kind, TokenKind::Slash | TokenKind::Star) {
			let operator = self.advance().clone();
			expr = Expr::binary(expr, operator, self.unary()?);
		}
		Ok(expr)
	}

	fn unary(&mut self) -> Result<Expr, ParseError> {
		if matches!(self.peek().kind, TokenKind::Bang | TokenKind::Minus) {
			let operator = self.advance().clone();
			return Ok(Expr::unary(operator, self.unary()?));
		}
		self.call()
	}

	fn call(&mut self) -> Result<Expr, ParseError> {
		let mut expr = self.primary()?;
		while self.advance_if(&TokenKind::LeftParen) {
			expr = self.finish_call(expr)?;
		}
		Ok(expr)
	}

	fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
		let mut arguments = Vec::new();
		if !self.check(&TokenKind::RightParen) {
			loop {
				if arguments.len() >= MAX_ARITY {
					let error = ParseError::new(self.peek(), "Can't have more than 255 arguments.");
					self.errors.push(error);
				}
				arguments.push(self.expression()?);
				if !self.advance_if(&TokenKind::Comma) {
					break;
				}
			}
		}
		let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;
		Ok(Expr::Call { callee: Box::new(callee), paren, arguments })
	}

	fn primary(&mut self) -> Result<Expr, ParseError> {
		let token = self.peek().clone();
		let expr = match token.kind {
			TokenKind::False => {
				self.advance();
				Expr::Literal(Literal::Bool(false))
			}
			TokenKind::True => {
				self.advance();
				Expr::Literal(Literal::Bool(true))
			}
			TokenKind::Nil => {
				self.advance();
				Expr::Literal(Literal::Nil)
			}
			TokenKind::Number(value) => {
				self.advance();
				Expr::Literal(Literal::Number(value))
			}
			TokenKind::Str(value) => {
				self.advance();
				Expr::Literal(Literal::Str(value))
			}
			TokenKind::Identifier => {
				self.advance();
				Expr::Variable { id: self.next_expr_id(), name: token }
			}
			TokenKind::LeftParen => {
				self.advance();
				let inner = self.expression()?;
				self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
				Expr::grouping(inner)
			}
			_ => return Err(ParseError::new(&token, "Expect expression.")),
		};
		Ok(expr)
	}

	fn next_expr_id(&mut self) -> ExprId {
		let id = ExprId(self.next_id);
		self.next_id += 1;
		id
	}

	fn peek(&self) -> &Token { &self.tokens[self.current] }

	/// The token most recently consumed; only meaningful after an advance.
	fn previous(&self) -> &Token { &self.tokens[self.current - 1] }

	fn is_at_end(&self) -> bool { self.peek().kind == TokenKind::Eof }

	/// Never moves past the trailing Eof token.
	fn advance(&mut self) -> &Token {
		if !self.is_at_end() {
			self.current += 1;
		}
		self.previous()
	}

	/// Kind comparison by variant, ignoring literal payloads.
	fn check(&self, kind: &TokenKind) -> bool {
		mem::discriminant(&self.peek().kind) == mem::discriminant(kind)
	}

	fn advance_if(&mut self, kind: &TokenKind) -> bool {
		if self.check(kind) {
			self.advance();
			return true;
		}
		false
	}

	fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParseError> {
		if self.check(&kind) {
			return Ok(self.advance().clone());
		}
		Err(ParseError::new(self.peek(), message))
	}

	/// Discards tokens until a likely statement boundary: just past a `;`,
	/// or at a token that can begin a declaration or statement.
	fn synchronize(&mut self) {
		self.advance();
		while !self.is_at_end() {
			if self.previous().kind == TokenKind::Semicolon {
				return;
			}
			match self.peek().kind {
				TokenKind::Class
				| TokenKind::Fun
				| TokenKind::Var
				| TokenKind::For
				| TokenKind::If
				| TokenKind::While
				| TokenKind::Print
				| TokenKind::Return => return,
				_ => {}
			}
			self.advance();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::Scanner;

	fn parse(source: &str) -> (Vec<Stmt>, Vec<ParseError>) {
		let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
		assert!(scan_errors.is_empty(), "unexpected scan errors: {scan_errors:?}");
		Parser::new(tokens).parse()
	}

	/// Parses a single expression statement and renders its tree form.
	fn tree(source: &str) -> String {
		let (statements, errors) = parse(source);
		assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
		assert_eq!(statements.len(), 1);
		match &statements[0] {
			Stmt::Expression(expr) | Stmt::Print(expr) => expr.to_string(),
			other => panic!("expected an expression statement, got {other:?}"),
		}
	}

	#[test]
	fn addition_parses_to_a_binary_node() {
		let (statements, errors) = parse("5 + 7;");
		assert!(errors.is_empty());
		assert_eq!(statements.len(), 1);
		match &statements[0] {
			Stmt::Expression(Expr::Binary { left, operator, right }) => {
				assert!(matches!(**left, Expr::Literal(Literal::Number(n)) if n == 5.0));
				assert_eq!(operator.kind, TokenKind::Plus);
				assert!(matches!(**right, Expr::Literal(Literal::Number(n)) if n == 7.0));
			}
			other => panic!("expected a binary expression statement, got {other:?}"),
		}
	}

	#[test]
	fn subtraction_is_left_associative() {
		assert_eq!(tree("4 - 3 - 1;"), "(- (- 4 3) 1)");
	}

	#[test]
	fn multiplication_binds_tighter_than_addition() {
		assert_eq!(tree("1 + 2 * 3;"), "(+ 1 (* 2 3))");
		assert_eq!(tree("(1 + 2) * 3;"), "(* (group (+ 1 2)) 3)");
	}

	#[test]
	fn comparison_and_equality_precedence() {
		assert_eq!(tree("1 + 2 == 3 < 4;"), "(== (+ 1 2) (< 3 4))");
	}

	#[test]
	fn unary_nests_rightward() {
		assert_eq!(tree("!!true;"), "(! (! true))");
		assert_eq!(tree("-1 + 2;"), "(+ (- 1) 2)");
	}

	#[test]
	fn logical_operators_layer_or_over_and() {
		assert_eq!(tree("1 or 2 and 3;"), "(or 1 (and 2 3))");
	}

	#[test]
	fn assignment_is_right_associative() {
		assert_eq!(tree("a = b = 1;"), "(= a (= b 1))");
	}

	#[test]
	fn invalid_assignment_target_is_reported_not_fatal() {
		let (statements, errors) = parse("1 = 2;");
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].to_string(), "[line 1] Error at '=': Invalid assignment target.");
		assert_eq!(statements.len(), 1);
	}

	#[test]
	fn chained_calls() {
		assert_eq!(tree("f()();"), "(call (call f))");
		assert_eq!(tree("f(1, 2)(g());"), "(call (call f 1 2) (call g))");
	}

	#[test]
	fn two_malformed_statements_each_report() {
		let (statements, errors) = parse("1 +; 2 +;");
		assert_eq!(errors.len(), 2);
		assert!(errors.iter().all(|e| e.to_string().contains("Expect expression.")));
		assert!(statements.is_empty());
	}

	#[test]
	fn error_at_end_of_input() {
		let (_, errors) = parse("(1 + 2");
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].to_string(), "[line 1] Error at end: Expect ')' after expression.");
	}

	#[test]
	fn recovery_inside_a_block_keeps_the_block() {
		let (statements, errors) = parse("{ 1 +; print 2; }");
		assert_eq!(errors.len(), 1);
		assert_eq!(statements.len(), 1);
		match &statements[0] {
			Stmt::Block(inner) => assert_eq!(inner.len(), 1),
			other => panic!("expected a block, got {other:?}"),
		}
	}

	#[test]
	fn var_declaration_with_and_without_initializer() {
		let (statements, errors) = parse("var x; var y = 2;");
		assert!(errors.is_empty());
		assert!(matches!(&statements[0], Stmt::Var { name, initializer: None } if name.lexeme == "x"));
		assert!(matches!(&statements[1], Stmt::Var { name, initializer: Some(_) } if name.lexeme == "y"));
	}

	#[test]
	fn function_declaration_shape() {
		let (statements, errors) = parse("fun add(a, b) { return a + b; }");
		assert!(errors.is_empty());
		match &statements[0] {
			Stmt::Function(decl) => {
				assert_eq!(decl.name.lexeme, "add");
				assert_eq!(decl.params.len(), 2);
				assert!(matches!(decl.body[0], Stmt::Return { .. }));
			}
			other => panic!("expected a function declaration, got {other:?}"),
		}
	}

	#[test]
	fn bare_return_parses() {
		let (statements, errors) = parse("fun f() { return; }");
		assert!(errors.is_empty());
		match &statements[0] {
			Stmt::Function(decl) => assert!(matches!(decl.body[0], Stmt::Return { value: None, .. })),
			other => panic!("expected a function declaration, got {other:?}"),
		}
	}

	#[test]
	fn for_loop_desugars_to_while_in_a_block() {
		let (statements, errors) = parse("for (var i = 0; i < 3; i = i + 1) print i;");
		assert!(errors.is_empty());
		let Stmt::Block(outer) = &statements[0] else { panic!("expected the initializer block") };
		assert!(matches!(outer[0], Stmt::Var { .. }));
		let Stmt::While { body, .. } = &outer[1] else { panic!("expected the desugared while") };
		let Stmt::Block(inner) = &**body else { panic!("expected the increment block") };
		assert!(matches!(inner[0], Stmt::Print(_)));
		assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
	}

	#[test]
	fn for_loop_without_clauses_defaults_to_while_true() {
		let (statements, errors) = parse("for (;;) print 1;");
		assert!(errors.is_empty());
		let Stmt::While { condition, .. } = &statements[0] else { panic!("expected a bare while") };
		assert!(matches!(condition, Expr::Literal(Literal::Bool(true))));
	}

	#[test]
	fn reference_sites_get_distinct_ids() {
		let (statements, errors) = parse("a; a; a = 1;");
		assert!(errors.is_empty());
		let mut ids = Vec::new();
		for statement in &statements {
			if let Stmt::Expression(Expr::Variable { id, .. } | Expr::Assign { id, .. }) = statement {
				ids.push(*id);
			}
		}
		assert_eq!(ids.len(), 3);
		ids.dedup();
		assert_eq!(ids.len(), 3);
	}
}
