//! # axo
//!
//! axo is a small, statically-annotated scripting language with a
//! tree-walking interpreter. Source text is lexed into tokens, parsed into an
//! AST, and evaluated against a lexically scoped environment. Declared types
//! are structural specs (unions, array and tuple types, object shapes,
//! literal types, user aliases) checked at assignment boundaries; modules
//! export named and default values; `program` units can run on background
//! worker tasks joined by `await`.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use std::fs;

use crate::{
    error::ParseError,
    interpreter::{evaluator::core::Interpreter, lexer, parser::core::parse_program},
};

/// Defines the structure of parsed code.
///
/// This module declares the expression and statement enums that represent
/// source code as a tree. The AST is built by the parser and traversed by the
/// evaluator; every node carries its source line for error reporting.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// Parse errors carry line, column and the offending lexeme for caret
/// diagnostics; runtime errors describe the fatal failure modes of
/// evaluation. Both integrate with the standard error traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, the value model,
/// the module loader and the built-in library to provide a complete runtime
/// for axo source code.
pub mod interpreter;

/// Lexes and parses a source string into a [`ast::Program`].
///
/// # Errors
/// Returns the first [`ParseError`] encountered. No recovery is attempted.
pub fn parse_source(source: &str) -> Result<ast::Program, ParseError> {
    let tokens = lexer::tokenize(source)?;
    let mut iter = tokens.iter().peekable();
    parse_program(&mut iter)
}

/// Parses and executes a source string in a fresh interpreter.
///
/// # Errors
/// Returns an error when parsing or evaluation fails.
///
/// # Examples
/// ```
/// use axo::run_source;
///
/// // Declared types are checked against initializers and at stores.
/// let source = "var x: int = 2 + 3 * 4; assert(x == 14, \"arithmetic\");";
/// assert!(run_source(source).is_ok());
///
/// // A union type rejects a value outside its branches.
/// let source = "var s: int|string = 1; s = \"ok\"; s = true;";
/// assert!(run_source(source).is_err());
/// ```
pub fn run_source(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let program = parse_source(source)?;
    let mut interpreter = Interpreter::new();
    interpreter.run(&program)?;
    Ok(())
}

/// Reads and executes a script file.
///
/// # Errors
/// Returns an error when the file cannot be read, or when parsing or
/// evaluation fails.
pub fn run_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;
    run_source(&source)
}
