use std::{collections::HashMap, fmt};

use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        runtime::{builtin, class::ClassDescriptor, signature::MethodSignature, TypeTag},
        value::core::Value,
    },
};

/// Native implementation of a built-in method.
///
/// Receives the evaluation context, the receiver (which mutating methods
/// update in place), the already type-checked arguments and the line of the
/// call.
pub type NativeMethod = fn(&mut Context, &mut Value, &[Value], usize) -> EvalResult<Value>;

/// A method table entry: a signature and the code behind it.
#[derive(Clone, Copy)]
pub struct MethodEntry {
    /// The typed interface of the method.
    pub signature: MethodSignature,
    /// The native implementation.
    pub function:  NativeMethod,
    /// Whether the method changes its receiver.
    pub mutating:  bool,
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
         .field("signature", &self.signature)
         .field("mutating", &self.mutating)
         .finish_non_exhaustive()
    }
}

/// The registry of all class descriptors.
///
/// Built once per [`Context`] and never changed afterwards.
#[derive(Debug, Clone)]
pub struct Runtime {
    classes: HashMap<TypeTag, ClassDescriptor>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates the registry with every built-in method installed.
    #[must_use]
    pub fn new() -> Self {
        let classes = TypeTag::ALL.into_iter()
                                  .map(|tag| (tag, ClassDescriptor::new(tag)))
                                  .collect();
        let mut runtime = Self { classes };
        builtin::register(&mut runtime);
        runtime
    }

    /// Adds a method that leaves its receiver unchanged.
    pub(crate) fn define(&mut self,
                         tag: TypeTag,
                         signature: MethodSignature,
                         function: NativeMethod) {
        self.insert(tag,
                    MethodEntry { signature,
                                  function,
                                  mutating: false });
    }

    /// Adds a method whose changes to the receiver are written back to the
    /// variable it was called on.
    pub(crate) fn define_mutating(&mut self,
                                  tag: TypeTag,
                                  signature: MethodSignature,
                                  function: NativeMethod) {
        self.insert(tag,
                    MethodEntry { signature,
                                  function,
                                  mutating: true });
    }

    fn insert(&mut self, tag: TypeTag, entry: MethodEntry) {
        if let Some(class) = self.classes.get_mut(&tag) {
            class.methods.insert(entry.signature.name, entry);
        }
    }

    /// Returns the descriptor of a class.
    #[must_use]
    pub fn class(&self, tag: TypeTag) -> Option<&ClassDescriptor> {
        self.classes.get(&tag)
    }

    /// Resolves `name` on `tag`, walking up the superclass chain.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::runtime::{Runtime, TypeTag};
    ///
    /// let runtime = Runtime::new();
    /// let add = runtime.lookup(TypeTag::Integer, "add").unwrap();
    /// assert_eq!(add.signature.to_string(), "- Number add(Number)");
    ///
    /// assert!(runtime.lookup(TypeTag::Bool, "add").is_none());
    /// ```
    #[must_use]
    pub fn lookup(&self, tag: TypeTag, name: &str) -> Option<MethodEntry> {
        self.ancestry(tag).find_map(|class| {
                              let entry = class.methods.get(name)?;
                              trace!(receiver = %tag, found_on = %class.tag, method = name, "resolved method");
                              Some(*entry)
                          })
    }

    /// Returns `true` if `tag` or one of its superclasses defines a method
    /// with exactly this signature.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::runtime::{MethodSignature, Runtime, TypeTag};
    ///
    /// let runtime = Runtime::new();
    /// let length = MethodSignature::instance("length", TypeTag::Integer, &[]);
    /// assert!(runtime.implements(TypeTag::Array, &length));
    /// assert!(!runtime.implements(TypeTag::Integer, &length));
    ///
    /// let wrong = MethodSignature::instance("length", TypeTag::Number, &[]);
    /// assert!(!runtime.implements(TypeTag::Array, &wrong));
    /// ```
    #[must_use]
    pub fn implements(&self, tag: TypeTag, signature: &MethodSignature) -> bool {
        self.ancestry(tag).any(|class| {
                              class.methods
                                   .get(signature.name)
                                   .is_some_and(|entry| entry.signature == *signature)
                          })
    }

    /// Iterates over the descriptor of `tag` and then the descriptors of its
    /// superclasses, following each descriptor's `superclass` link.
    fn ancestry(&self, tag: TypeTag) -> impl Iterator<Item = &ClassDescriptor> {
        std::iter::successors(self.class(tag), |class| class.superclass.and_then(|parent| self.class(parent)))
    }
}

/// Checks the arguments of a method call against its signature.
///
/// # Errors
/// - `RuntimeError::ArgumentCount` if the number of arguments differs from
///   the number of parameters.
/// - `RuntimeError::ArgumentType` for the first argument whose class does not
///   conform to its parameter type.
pub fn check_arguments(receiver: TypeTag,
                       signature: &MethodSignature,
                       args: &[Value],
                       line: usize)
                       -> EvalResult<()> {
    let callee = || format!("{receiver}.{}", signature.name);

    if args.len() != signature.arity() {
        return Err(RuntimeError::ArgumentCount { callee: callee(),
                                                 expected: signature.arity(),
                                                 found: args.len(),
                                                 line });
    }

    for (position, (arg, expected)) in args.iter().zip(signature.params).enumerate() {
        if !arg.type_tag().is_a(*expected) {
            return Err(RuntimeError::ArgumentType { callee: callee(),
                                                    position: position + 1,
                                                    expected: *expected,
                                                    found: arg.type_tag(),
                                                    line });
        }
    }
    Ok(())
}

/// Checks the result of a method call against its declared return type.
///
/// # Errors
/// Returns `RuntimeError::ReturnType` if the result's class does not conform.
pub fn check_result(receiver: TypeTag,
                    signature: &MethodSignature,
                    result: Value,
                    line: usize)
                    -> EvalResult<Value> {
    if result.type_tag().is_a(signature.return_type) {
        Ok(result)
    } else {
        Err(RuntimeError::ReturnType { callee: format!("{receiver}.{}", signature.name),
                                       expected: signature.return_type,
                                       found: result.type_tag(),
                                       line })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookup_follows_descriptor_superclasses() {
        let runtime = Runtime::new();

        let integer = runtime.class(TypeTag::Integer).expect("Integer is registered");
        assert_eq!(integer.tag, TypeTag::Integer);
        assert_eq!(integer.superclass, Some(TypeTag::Number));
        assert!(!integer.methods.contains_key("add"));

        let add = runtime.lookup(TypeTag::Integer, "add").expect("inherited from Number");
        assert_eq!(add.signature.to_string(), "- Number add(Number)");
        assert!(runtime.lookup(TypeTag::Float, "modulus").is_none());

        let ancestry = runtime.ancestry(TypeTag::Float)
                              .map(|class| class.tag)
                              .collect::<Vec<_>>();
        assert_eq!(ancestry, [TypeTag::Float, TypeTag::Number, TypeTag::Object]);
    }
}
