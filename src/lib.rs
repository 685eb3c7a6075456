//! # prometheus
//!
//! prometheus is an interpreter for a small, dynamically typed, class-based
//! scripting language written in Rust. Programs declare typed variables,
//! functions and closures ("blocks"), and every operator is a message sent to
//! a built-in class such as `Integer`, `String` or `Array`.

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
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::debug;

use crate::{
    ast::Program,
    error::{Error, ParseError},
    interpreter::{lexer::tokenize, parser::core::parse_program},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types
/// that represent the syntactic structure of source code as a tree. The AST is
/// built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
/// - Describes assignable places and function and block definitions.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing or
/// evaluating code. Every error carries the source line it refers to and
/// renders as `Error on line N: ...`.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, the class runtime, scopes and
/// evaluation.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// These helpers are used throughout the evaluator and the built-in methods to
/// convert between `i64`, `usize` and `f64` without silent data loss.
pub mod util;

pub use interpreter::{
    evaluator::core::{Config, Context, DEFAULT_MAX_CALL_DEPTH},
    scope::ScopeRef,
    value::core::Value,
};

/// Lexes and parses a unit of source code.
///
/// # Errors
/// Returns the first lexical or syntax error.
///
/// # Examples
/// ```
/// use prometheus::parse;
///
/// let program = parse("Integer x = 1;\nprint x;").unwrap();
/// assert_eq!(program.statements.len(), 2);
///
/// assert!(parse("Integer = 1;").is_err());
/// ```
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized source");
    parse_program(&mut tokens.iter().peekable())
}

/// Parses and runs a unit of source code in the context's root scope.
///
/// Declarations persist in the context, so running several units one after the
/// other behaves like a single program. With `pipe_mode` enabled, the value of
/// the last expression statement is printed after the run.
///
/// # Returns
/// The value of the last expression statement, if any.
///
/// # Errors
/// Returns a parse error if the source is malformed (nothing runs in that
/// case), or the first runtime error raised.
///
/// # Examples
/// ```
/// use prometheus::{Config, Context, Value, run_source};
///
/// let mut context = Context::with_output(Config::default(), std::io::sink());
/// run_source(&mut context, "Integer x = 20;").unwrap();
///
/// let result = run_source(&mut context, "x + 22;").unwrap();
/// assert_eq!(result, Some(Value::Integer(42)));
///
/// // `y` was never declared.
/// assert!(run_source(&mut context, "y + 1;").is_err());
/// ```
pub fn run_source(context: &mut Context, source: &str) -> Result<Option<Value>, Error> {
    let program = parse(source)?;
    let root = context.root();
    let result = context.run_program(&program, &root)?;

    if context.config().pipe_mode
       && let Some(value) = &result
    {
        let line = program.statements.last().map_or(0, statement_line);
        context.print_value(value, &root, line)?;
    }
    Ok(result)
}

fn statement_line(statement: &ast::Statement) -> usize {
    use ast::Statement;

    match statement {
        Statement::Function(def) => def.line,
        Statement::Expression { line, .. }
        | Statement::VariableDeclaration { line, .. }
        | Statement::Compound { line, .. }
        | Statement::If { line, .. }
        | Statement::While { line, .. }
        | Statement::For { line, .. }
        | Statement::Return { line, .. }
        | Statement::Print { line, .. } => *line,
    }
}
