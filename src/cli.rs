use std::path::PathBuf;

use palc::{Parser, Subcommand};

/// A tree-walking interpreter for the Lox language
#[derive(Parser)]
#[command(name = "rlox")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Run a Lox script
	File { path: PathBuf },
	/// Start an interactive session
	Repl,
}
