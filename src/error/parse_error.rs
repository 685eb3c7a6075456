use thiserror::Error;

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No token rule matched the input.
    #[error("Error on line {line}: Unrecognized input '{text}' at column {column}.")]
    Lexical {
        /// The offending text.
        text:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The 1-based column of the offending text.
        column: usize,
    },
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}: Expected {expected}, found '{found}'.")]
    UnexpectedToken {
        /// A description of what the grammar required.
        expected: String,
        /// The token encountered.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Expected {expected}, found end of input.")]
    UnexpectedEndOfInput {
        /// A description of what the grammar required.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A capitalised name in type position is not a known type.
    #[error("Error on line {line}: Unknown type '{name}'.")]
    UnknownType {
        /// The name that was used as a type.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left-hand side of an assignment or increment is not a place.
    #[error("Error on line {line}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A literal value was too large to be represented safely.
    #[error("Error on line {line}: Literal '{literal}' is too large.")]
    LiteralTooLarge {
        /// The literal as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Expressions or statements were nested too deeply to parse.
    #[error("Error on line {line}: Nesting is deeper than {limit} levels.")]
    NestingTooDeep {
        /// The deepest nesting the parser accepts.
        limit: usize,
        /// The source line where the limit was reached.
        line:  usize,
    },
}

impl ParseError {
    /// The source line the error refers to.
    ///
    /// # Example
    /// ```
    /// use prometheus::error::ParseError;
    ///
    /// let error = ParseError::InvalidAssignmentTarget { line: 3 };
    /// assert_eq!(error.line(), 3);
    /// assert_eq!(error.to_string(), "Error on line 3: Invalid assignment target.");
    /// ```
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Lexical { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line, .. }
            | Self::UnknownType { line, .. }
            | Self::InvalidAssignmentTarget { line }
            | Self::LiteralTooLarge { line, .. }
            | Self::NestingTooDeep { line, .. } => *line,
        }
    }
}
