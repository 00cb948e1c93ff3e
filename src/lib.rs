//! A tree-walking interpreter for the Lox scripting language.
//!
//! Source text flows through four stages, each of which runs to completion
//! over its whole input and returns an explicit error collection alongside
//! its output, with no ambient error flags:
//!
//! 1. [`scanner`]: characters to tokens;
//! 2. [`parser`]: tokens to a statement/expression tree;
//! 3. [`resolver`]: static lexical-scope analysis, producing a hop-count
//!    table for every local variable reference;
//! 4. [`interpreter`]: evaluation of the tree against a chain of mutable
//!    scopes, supporting closures and first-class functions.
//!
//! Scanning, parsing, and resolution each accumulate every error they find
//! in a single pass; interpretation is fail-fast and halts at the first
//! runtime error. The [`Lox`] driver wires the stages together for file
//! and REPL use.

pub mod cli;
pub mod environment;
pub mod error;
pub mod interpreter;
mod lox;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod statement;

pub use error::LoxError;
pub use lox::Lox;
