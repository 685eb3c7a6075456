/// Expression entry points.
///
/// Parses comma expressions, assignments and conditionals, the three lowest
/// precedence levels, and whole programs.
pub mod core;

/// Statement parsing.
///
/// Parses declarations, function definitions, control flow statements,
/// `return`, `print` and expression statements.
pub mod statement;

/// Compound statements and block literals.
///
/// Parses `{ ... }` statement lists, typed parameter lists and `^(...) {}`
/// closures.
pub mod block;

/// Binary operator parsing.
///
/// Implements the left-associative levels from `||` down to `*`, `/`, `%`
/// and `^`.
pub mod binary;

/// Unary, postfix and primary expressions.
///
/// Parses prefix operators, the postfix chain of increments, subscripts,
/// calls and member access, and literals.
pub mod unary;

/// Parser utility functions.
///
/// Token expectations, comma-separated lists, identifiers and type names.
pub mod utils;
