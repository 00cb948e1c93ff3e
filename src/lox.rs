use std::{
	fs::read_to_string,
	io::{self, Write},
	path::Path,
};

use anyhow::Context;
use log::debug;

use crate::{
	error::LoxError, interpreter::Interpreter, parser::Parser, resolver::Resolver, scanner::Scanner,
};

/// The front-to-back pipeline: source text in, observable effects out.
///
/// Every stage runs to completion over its whole input and hands back an
/// explicit error collection; diagnostics go to stderr as they are found.
/// Holds the reference-site id watermark so a REPL session stays
/// consistent across lines.
#[derive(Default)]
pub struct Lox {
	next_id: usize,
}

impl Lox {
	pub fn new() -> Self { Self::default() }

	pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoxError> {
		let source = read_to_string(&path)
			.with_context(|| format!("failed to read script {}", path.as_ref().display()))?;
		let mut interpreter = Interpreter::new();
		self.run(&source, &mut interpreter)
	}

	/// The interactive prompt. One interpreter lives for the whole
	/// session, so definitions persist; an erroneous line is reported and
	/// forgotten.
	pub fn run_prompt(&mut self) {
		let mut interpreter = Interpreter::new();
		let stdin = io::stdin();
		let mut input = String::new();
		loop {
			input.clear();
			print!("> ");
			if let Err(error) = io::stdout().flush() {
				eprintln!("failed to flush prompt: {error}");
			}
			match stdin.read_line(&mut input) {
				Ok(0) => break,
				Ok(_) => {}
				Err(error) => {
					eprintln!("failed to read line: {error}");
					continue;
				}
			}
			if let Err(error) = self.run(input.trim(), &mut interpreter) {
				match error {
					LoxError::SyntaxErrors(_) | LoxError::ResolveErrors(_) => {} // already reported
					other => eprintln!("{other}"),
				}
			}
		}
	}

	fn run<W: Write>(&mut self, source: &str, interpreter: &mut Interpreter<W>) -> Result<(), LoxError> {
		let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
		debug!("scanned {} tokens, {} errors", tokens.len(), scan_errors.len());
		for error in &scan_errors {
			eprintln!("{error}");
		}

		let mut parser = Parser::with_first_id(tokens, self.next_id);
		let (statements, parse_errors) = parser.parse();
		self.next_id = parser.next_id();
		debug!("parsed {} statements, {} errors", statements.len(), parse_errors.len());
		for error in &parse_errors {
			eprintln!("{error}");
		}

		let syntax_errors = scan_errors.len() + parse_errors.len();
		if syntax_errors > 0 {
			return Err(LoxError::SyntaxErrors(syntax_errors));
		}

		let (resolutions, resolve_errors) = Resolver::resolve(&statements);
		debug!("resolved {} local references, {} errors", resolutions.len(), resolve_errors.len());
		for error in &resolve_errors {
			eprintln!("{error}");
		}
		if !resolve_errors.is_empty() {
			return Err(LoxError::ResolveErrors(resolve_errors.len()));
		}

		interpreter.interpret(&statements, resolutions)?;
		Ok(())
	}
}
