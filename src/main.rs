use std::process;

use palc::Parser;
use rlox::{
	cli::{Cli, Mode},
	Lox, LoxError,
};

fn main() {
	env_logger::init();
	let mut lox = Lox::new();

	let result = match Cli::parse().mode {
		Mode::File { path } => lox.run_file(&path),
		Mode::Repl => {
			lox.run_prompt();
			Ok(())
		}
	};

	if let Err(error) = result {
		match &error {
			// Stage diagnostics already went to stderr one by one.
			LoxError::SyntaxErrors(_) | LoxError::ResolveErrors(_) => {}
			other => eprintln!("{other}"),
		}
		process::exit(error.exit_code());
	}
}
