use thiserror::Error;

use crate::interpreter::runtime::class::TypeTag;

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Tried to use a variable that is not declared in any enclosing scope.
    #[error("Error on line {line}: Undeclared variable '{name}'.")]
    UndeclaredVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Declared a name twice in the same scope.
    #[error("Error on line {line}: '{name}' is already declared in this scope.")]
    Redeclaration {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value does not match the declared type of its variable.
    #[error("Error on line {line}: Cannot store {found} in '{name}' of type {expected}.")]
    TypeMismatch {
        /// The variable being written.
        name:     String,
        /// The declared type.
        expected: TypeTag,
        /// The type of the offending value.
        found:    TypeTag,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An operator is not supported for the operand type.
    #[error("Error on line {line}: Operator '{operator}' is not supported for type {found}.")]
    UnsupportedOperand {
        /// The operator as written.
        operator: String,
        /// The type of the operand.
        found:    TypeTag,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The wrong number of arguments was supplied to a call.
    #[error("Error on line {line}: {callee} expects {expected} argument(s), found {found}.")]
    ArgumentCount {
        /// The called function, block or method.
        callee:   String,
        /// The number of declared parameters.
        expected: usize,
        /// The number of supplied arguments.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An argument does not match the declared parameter type.
    #[error("Error on line {line}: Argument {position} of {callee} must be {expected}, found {found}.")]
    ArgumentType {
        /// The called function, block or method.
        callee:   String,
        /// The 1-based position of the argument.
        position: usize,
        /// The declared parameter type.
        expected: TypeTag,
        /// The type of the supplied argument.
        found:    TypeTag,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// No class in the receiver's chain defines the method.
    #[error("Error on line {line}: {receiver} does not respond to '{method}'.")]
    MissingMethod {
        /// The type of the receiver.
        receiver: TypeTag,
        /// The requested method name.
        method:   String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Tried to access an element outside the allowed bounds.
    #[error("Error on line {line}: Index {index} is out of bounds for length {length}.")]
    IndexOutOfBounds {
        /// The index that was actually requested.
        index:  i64,
        /// The length of the indexed value.
        length: usize,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A dictionary lookup found no entry for the key.
    #[error("Error on line {line}: Key {key} not found.")]
    MissingKey {
        /// Description of the key.
        key:  String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A callable with a value return type finished without a value.
    #[error("Error on line {line}: {callee} must return a value of type {expected}.")]
    MissingReturnValue {
        /// The function or block.
        callee:   String,
        /// The declared return type.
        expected: TypeTag,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A `Void` callable returned a value.
    #[error("Error on line {line}: {callee} is Void and cannot return a value.")]
    UnexpectedReturnValue {
        /// The function or block.
        callee: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A callable returned a value of the wrong type.
    #[error("Error on line {line}: {callee} must return {expected}, returned {found}.")]
    ReturnType {
        /// The function, block or method.
        callee:   String,
        /// The declared return type.
        expected: TypeTag,
        /// The type of the returned value.
        found:    TypeTag,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Called a value that is neither a function, a block nor a method.
    #[error("Error on line {line}: Value of type {found} is not callable.")]
    NotCallable {
        /// The type of the called value.
        found: TypeTag,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A declaration without initializer names a type without zero value.
    #[error("Error on line {line}: Variable '{name}' of type {type_tag} needs an initial value.")]
    NoDefaultValue {
        /// The declared variable.
        name:     String,
        /// The declared type.
        type_tag: TypeTag,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Attempted integer division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Integer arithmetic overflowed.
    #[error("Error on line {line}: Integer overflow while trying to compute result.")]
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Nested calls exceeded the configured maximum depth.
    #[error("Error on line {line}: Maximum call depth of {limit} exceeded.")]
    RecursionLimit {
        /// The configured maximum call depth.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A `return` statement outside of any function or block.
    #[error("Error on line {line}: 'return' outside of a function or block.")]
    ReturnOutsideFunction {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Writing program output failed.
    #[error("Error on line {line}: Could not write output.")]
    Io {
        /// The underlying I/O failure.
        source: std::io::Error,
        /// The source line where the error occurred.
        line:   usize,
    },
}

impl RuntimeError {
    /// The source line the error refers to.
    ///
    /// # Example
    /// ```
    /// use prometheus::error::RuntimeError;
    ///
    /// let error = RuntimeError::DivisionByZero { line: 7 };
    /// assert_eq!(error.line(), 7);
    /// ```
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UndeclaredVariable { line, .. }
            | Self::Redeclaration { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::UnsupportedOperand { line, .. }
            | Self::ArgumentCount { line, .. }
            | Self::ArgumentType { line, .. }
            | Self::MissingMethod { line, .. }
            | Self::IndexOutOfBounds { line, .. }
            | Self::MissingKey { line, .. }
            | Self::MissingReturnValue { line, .. }
            | Self::UnexpectedReturnValue { line, .. }
            | Self::ReturnType { line, .. }
            | Self::NotCallable { line, .. }
            | Self::NoDefaultValue { line, .. }
            | Self::DivisionByZero { line }
            | Self::Overflow { line }
            | Self::RecursionLimit { line, .. }
            | Self::ReturnOutsideFunction { line }
            | Self::Io { line, .. } => *line,
        }
    }
}
