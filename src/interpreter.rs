/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the AST of a program, evaluating expressions and
/// statements against a chain of scopes. Operators are translated into method
/// sends on the runtime classes, so arithmetic, comparison and equality all go
/// through the same dispatch that user-visible methods use.
///
/// # Responsibilities
/// - Evaluates AST nodes, including calls of functions, blocks and methods.
/// - Enforces declared types of variables, parameters and return values.
/// - Reports runtime errors such as division by zero or missing methods.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens paired
/// with their line numbers: literals, keywords, type names, identifiers,
/// operators and delimiters. Comments and whitespace are dropped here.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source lines.
/// - Resolves string escapes and numeric literals.
/// - Reports lexical errors with a line and column.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser is a recursive-descent parser with one function per precedence
/// level. It processes the token stream produced by the lexer and constructs
/// the statements of a program.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates the grammar, reporting the first error with its line.
/// - Resolves type names in declarations and signatures.
pub mod parser;
/// The class hierarchy and its method tables.
///
/// Every value belongs to one of a fixed set of classes arranged under
/// `Object`. Each class owns a table of native methods keyed by name, and a
/// message sent to a value is resolved by walking up the class chain.
pub mod runtime;
/// Lexical scopes.
///
/// A scope is a frame of typed bindings with a link to its parent. Frames are
/// shared, so a block keeps the scope it was created in alive.
pub mod scope;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a program manipulates: integers, floats,
/// booleans, strings, arrays, dictionaries, nil, and the callable values
/// (blocks, functions and bound methods).
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Classifies values into runtime classes and provides zero values.
/// - Implements truthiness, structural equality and descriptions.
pub mod value;
