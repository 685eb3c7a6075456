/// Core evaluation logic for expressions and programs.
///
/// Holds the `Context`, its configuration, the `Flow` signal used for
/// `return`, and the expression dispatcher.
pub mod core;

/// Statement evaluation.
///
/// Implements declarations, compound statements and `return`, and runs
/// statement lists until one of them returns.
pub mod statement;

/// Conditionals and loops.
///
/// Evaluates `if`, `while` and `for` statements and the `?:` expressions,
/// each in its own child scope.
pub mod control_flow;

/// Calls of functions, blocks and methods.
///
/// Binds and checks arguments, enforces return contracts and the call depth
/// limit, and sends messages through the method registry.
pub mod call;

/// Assignable locations.
///
/// Resolves variables and subscripts to locations that can be read and
/// written, and implements assignment and subscript access.
pub mod place;

/// Unary operator evaluation.
///
/// Handles negation, logical NOT and the increment and decrement operators.
pub mod unary;

/// Binary operator evaluation.
///
/// Implements arithmetic through method dispatch, comparisons, equality and
/// the logical operators.
pub mod binary;

/// The `print` statement.
///
/// Describes values through their `description` method and substitutes
/// `<name>` references with the description of the named variable.
pub mod print;

/// Utility functions for the evaluator.
///
/// Builds values from array, dictionary and block literals.
pub mod utils;
