use std::fmt;

use crate::interpreter::runtime::class::TypeTag;

/// The typed interface of a built-in method.
///
/// Two signatures are equal when their name, return type, class-level flag
/// and parameter types are all equal, position by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSignature {
    /// The selector, such as `length` or `add`.
    pub name:        &'static str,
    /// The type every result must conform to.
    pub return_type: TypeTag,
    /// `true` for methods sent to the class rather than an instance.
    pub class_level: bool,
    /// The declared type of each parameter, in order.
    pub params:      &'static [TypeTag],
}

impl MethodSignature {
    /// Creates an instance-level signature.
    #[must_use]
    pub const fn instance(name: &'static str,
                          return_type: TypeTag,
                          params: &'static [TypeTag])
                          -> Self {
        Self { name,
               return_type,
               class_level: false,
               params }
    }

    /// The number of arguments the method takes.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for MethodSignature {
    /// Renders the signature as `- Integer length()` or
    /// `+ Number add(Number)`.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::runtime::{MethodSignature, TypeTag};
    ///
    /// let signature =
    ///     MethodSignature::instance("substr", TypeTag::String, &[TypeTag::Integer, TypeTag::Integer]);
    /// assert_eq!(signature.to_string(), "- String substr(Integer, Integer)");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.class_level { '+' } else { '-' };
        let params = self.params
                         .iter()
                         .map(|tag| tag.name())
                         .collect::<Vec<_>>()
                         .join(", ");
        write!(f, "{kind} {} {}({params})", self.return_type, self.name)
    }
}
