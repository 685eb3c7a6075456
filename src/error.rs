/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code: unknown characters, unexpected tokens, unknown type names and
/// literals that do not fit their type.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. Runtime
/// errors include undeclared variables, type mismatches, failed method lookups
/// and arithmetic faults such as division by zero.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
use thiserror::Error;

/// Any error produced while turning source text into results.
///
/// Returned by [`crate::run_source`], which both parses and evaluates.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be lexed or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation of a parsed program failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// The source line the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Parse(error) => error.line(),
            Self::Runtime(error) => error.line(),
        }
    }
}
