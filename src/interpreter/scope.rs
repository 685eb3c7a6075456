use std::{cell::RefCell, collections::HashMap, rc::Rc};

use tracing::warn;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, runtime::TypeTag, value::core::Value},
};

/// A declared variable: its type and current value.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The type every stored value must conform to.
    pub type_tag: TypeTag,
    /// The current value.
    pub value:    Value,
}

/// One frame of the scope chain.
#[derive(Debug)]
pub struct ScopeFrame {
    tag:      String,
    parent:   Option<ScopeRef>,
    bindings: HashMap<String, Binding>,
}

/// Shared handle to a scope frame.
///
/// Frames are reference counted: a closure keeps its defining frame, and that
/// frame's ancestors, alive for as long as the closure exists.
#[derive(Debug, Clone)]
pub struct ScopeRef(Rc<RefCell<ScopeFrame>>);

impl ScopeRef {
    /// Creates a frame without parent.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::{runtime::TypeTag, scope::ScopeRef, value::core::Value};
    ///
    /// let root = ScopeRef::root();
    /// root.declare("x", TypeTag::Integer, Value::Integer(1), 1).unwrap();
    ///
    /// let inner = root.child("block");
    /// inner.declare("x", TypeTag::String, Value::from("shadow"), 2).unwrap();
    ///
    /// assert_eq!(inner.get("x", 3).unwrap().describe(), "shadow");
    /// assert_eq!(root.get("x", 3).unwrap().describe(), "1");
    /// assert!(root.declare("x", TypeTag::Integer, Value::Integer(2), 4).is_err());
    /// ```
    #[must_use]
    pub fn root() -> Self {
        Self::new("root", None)
    }

    /// Creates a frame whose parent is `self`.
    #[must_use]
    pub fn child(&self, tag: &str) -> Self {
        Self::new(tag, Some(self.clone()))
    }

    fn new(tag: &str, parent: Option<Self>) -> Self {
        Self(Rc::new(RefCell::new(ScopeFrame { tag: tag.to_string(),
                                               parent,
                                               bindings: HashMap::new() })))
    }

    /// The label the frame was created with, such as `root` or `while`.
    #[must_use]
    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// The parent frame, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.clone()
    }

    /// The outermost frame of the chain.
    #[must_use]
    pub fn root_frame(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Declares a new variable in this frame.
    ///
    /// Shadowing a variable of an enclosing frame is allowed and logged.
    ///
    /// # Errors
    /// - `RuntimeError::Redeclaration` if this frame already declares `name`.
    /// - `RuntimeError::TypeMismatch` if `value` does not conform to
    ///   `type_tag`.
    pub fn declare(&self,
                   name: &str,
                   type_tag: TypeTag,
                   value: Value,
                   line: usize)
                   -> EvalResult<()> {
        check_type(name, type_tag, &value, line)?;

        if self.0.borrow().bindings.contains_key(name) {
            return Err(RuntimeError::Redeclaration { name: name.to_string(),
                                                     line });
        }

        if let Some(parent) = self.parent()
           && parent.find(name).is_some()
        {
            warn!(name, scope = %self.tag(), line, "declaration shadows an outer variable");
        }

        self.0
            .borrow_mut()
            .bindings
            .insert(name.to_string(), Binding { type_tag, value });
        Ok(())
    }

    /// Reads a variable, searching this frame and then its ancestors.
    ///
    /// # Errors
    /// Returns `RuntimeError::UndeclaredVariable` if no frame declares `name`.
    pub fn get(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.find(name)
            .map(|binding| binding.value)
            .ok_or_else(|| RuntimeError::UndeclaredVariable { name: name.to_string(),
                                                              line })
    }

    /// Overwrites a variable in the nearest frame declaring it.
    ///
    /// # Errors
    /// - `RuntimeError::UndeclaredVariable` if no frame declares `name`.
    /// - `RuntimeError::TypeMismatch` if `value` does not conform to the
    ///   declared type.
    pub fn set(&self, name: &str, value: Value, line: usize) -> EvalResult<()> {
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            let mut frame = scope.0.borrow_mut();
            if let Some(binding) = frame.bindings.get_mut(name) {
                check_type(name, binding.type_tag, &value, line)?;
                binding.value = value;
                return Ok(());
            }
            current = frame.parent.clone();
        }
        Err(RuntimeError::UndeclaredVariable { name: name.to_string(),
                                               line })
    }

    /// Moves a variable's value out of the nearest frame declaring it and
    /// leaves `nil` behind until [`set`](Self::set) stores it back.
    ///
    /// # Errors
    /// Returns `RuntimeError::UndeclaredVariable` if no frame declares `name`.
    pub(crate) fn take(&self, name: &str, line: usize) -> EvalResult<Value> {
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            let mut frame = scope.0.borrow_mut();
            if let Some(binding) = frame.bindings.get_mut(name) {
                return Ok(std::mem::replace(&mut binding.value, Value::Nil));
            }
            current = frame.parent.clone();
        }
        Err(RuntimeError::UndeclaredVariable { name: name.to_string(),
                                               line })
    }

    /// Finds the binding for `name` along the chain.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Binding> {
        let frame = self.0.borrow();
        match frame.bindings.get(name) {
            Some(binding) => Some(binding.clone()),
            None => frame.parent.as_ref().and_then(|parent| parent.find(name)),
        }
    }
}

fn check_type(name: &str, expected: TypeTag, value: &Value, line: usize) -> EvalResult<()> {
    let found = value.type_tag();
    if found.is_a(expected) {
        Ok(())
    } else {
        Err(RuntimeError::TypeMismatch { name: name.to_string(),
                                         expected,
                                         found,
                                         line })
    }
}
