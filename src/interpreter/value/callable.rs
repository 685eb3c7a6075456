use std::{fmt, rc::Rc};

use crate::{
    ast::{BlockDef, FunctionDef, Parameter},
    interpreter::{
        evaluator::place::Location, runtime::dispatch::MethodEntry, scope::ScopeRef,
        value::core::Value,
    },
};

/// A block literal closed over the scope it was evaluated in.
///
/// Calling the closure creates a frame whose parent is `scope`, so names
/// visible where the literal appeared stay visible wherever it is called.
#[derive(Clone)]
pub struct Closure {
    /// The shared definition from the syntax tree.
    pub def:   Rc<BlockDef>,
    /// The defining scope.
    pub scope: ScopeRef,
}

impl Closure {
    /// `<Block:^(Integer x, String s)>`
    #[must_use]
    pub fn describe(&self) -> String {
        format!("<Block:^({})>", join_params(&self.def.params))
    }
}

impl fmt::Debug for Closure {
    // The captured scope may hold this closure, so it is not printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
         .field("params", &self.def.params)
         .field("return_type", &self.def.return_type)
         .finish_non_exhaustive()
    }
}

/// A method resolved on a receiver by member access (`items.length`).
#[derive(Debug, Clone)]
pub struct BoundMethod {
    /// The value the method will be sent to.
    pub receiver: Value,
    /// The resolved method.
    pub entry:    MethodEntry,
    /// Set when the method is mutating and the receiver came from a
    /// variable. Calls then change that variable instead of `receiver`.
    pub(crate) origin: Option<Origin>,
}

/// The variable a bound mutating method writes back to.
#[derive(Clone)]
pub(crate) struct Origin {
    pub(crate) location: Location,
    pub(crate) scope:    ScopeRef,
}

impl fmt::Debug for Origin {
    // The scope may hold the bound method itself.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Origin")
         .field("location", &self.location)
         .finish_non_exhaustive()
    }
}

impl BoundMethod {
    /// `<Method:- Integer length()>`
    #[must_use]
    pub fn describe(&self) -> String {
        format!("<Method:{}>", self.entry.signature)
    }
}

/// `<Function:Integer square(Integer)>`
#[must_use]
pub fn describe_function(function: &FunctionDef) -> String {
    let params = function.params
                         .iter()
                         .map(|param| param.type_tag.name())
                         .collect::<Vec<_>>()
                         .join(", ");
    format!("<Function:{} {}({params})>", function.return_type, function.name)
}

fn join_params(params: &[Parameter]) -> String {
    params.iter()
          .map(ToString::to_string)
          .collect::<Vec<_>>()
          .join(", ")
}
