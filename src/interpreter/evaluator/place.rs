use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr, Place},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        runtime::{TypeTag, builtin::dict},
        scope::ScopeRef,
        value::core::{Value, dict_insert},
    },
    util::num::checked_index,
};

/// A place whose subscripts have been evaluated.
#[derive(Debug, Clone)]
pub(crate) struct Location {
    name:    String,
    indices: Vec<Value>,
    line:    usize,
}

impl Context {
    /// Evaluates `target = value` or a compound form such as `target += value`.
    ///
    /// Subscripts of the target are evaluated first, then the right-hand
    /// side. The stored value is re-checked against the variable's declared
    /// type.
    ///
    /// # Returns
    /// The value that was stored.
    pub(crate) fn eval_assign(&mut self,
                              target: &Place,
                              op: Option<BinaryOperator>,
                              value: &Expr,
                              scope: &ScopeRef,
                              line: usize)
                              -> EvalResult<Value> {
        let location = self.locate(target, scope)?;
        let value = self.eval(value, scope)?;

        let value = match op {
            None => value,
            Some(op) => {
                let current = self.read_location(&location, scope)?;
                self.apply_arithmetic(op, current, value, line)?
            },
        };

        self.write_location(&location, value.clone(), scope)?;
        Ok(value)
    }

    pub(crate) fn locate(&mut self, place: &Place, scope: &ScopeRef) -> EvalResult<Location> {
        let indices = place.indices
                           .iter()
                           .map(|index| self.eval(index, scope))
                           .collect::<EvalResult<Vec<_>>>()?;
        Ok(Location { name: place.name.clone(),
                      indices,
                      line: place.line })
    }

    /// Evaluates an expression together with the location it was read from.
    ///
    /// Variables and subscripts of them have a location. So does a call of a
    /// mutating method on such an expression, because the call returns its
    /// updated receiver (`items.append(1).append(2)`). Anything else is
    /// evaluated normally and has none.
    pub(crate) fn eval_located(&mut self,
                               expr: &Expr,
                               scope: &ScopeRef)
                               -> EvalResult<(Value, Option<Location>)> {
        match expr {
            Expr::Lookup { name, line } => {
                let location = Location { name:    name.clone(),
                                          indices: Vec::new(),
                                          line:    *line, };
                Ok((scope.get(name, *line)?, Some(location)))
            },
            Expr::Subscript { target, index, line } => {
                let (container, location) = self.eval_located(target, scope)?;
                let index = self.eval(index, scope)?;
                let value = Self::subscript(&container, &index, *line)?;
                Ok((value,
                    location.map(|mut location| {
                                location.indices.push(index);
                                location
                            })))
            },
            Expr::Call { callee, arguments, line } => match callee.as_ref() {
                Expr::Member { target, name, .. } => {
                    self.eval_method_call(target, name, arguments, scope, *line)
                },
                _ => Ok((self.eval(expr, scope)?, None)),
            },
            _ => Ok((self.eval(expr, scope)?, None)),
        }
    }

    pub(crate) fn read_location(&self, location: &Location, scope: &ScopeRef) -> EvalResult<Value> {
        let mut value = scope.get(&location.name, location.line)?;
        for index in &location.indices {
            value = Self::subscript(&value, index, location.line)?;
        }
        Ok(value)
    }

    pub(crate) fn write_location(&self,
                                 location: &Location,
                                 value: Value,
                                 scope: &ScopeRef)
                                 -> EvalResult<()> {
        if location.indices.is_empty() {
            return scope.set(&location.name, value, location.line);
        }

        let mut root = scope.get(&location.name, location.line)?;
        store(&mut root, &location.indices, value, location.line)?;
        scope.set(&location.name, root, location.line)
    }

    /// Applies `update` to the value stored at `location`.
    ///
    /// The variable's value is moved out of its frame while `update` runs, so
    /// containers that nothing else shares are changed without being copied.
    /// The value is stored back even when `update` fails.
    pub(crate) fn update_location<T>(&mut self,
                                     location: &Location,
                                     scope: &ScopeRef,
                                     update: impl FnOnce(&mut Self, &mut Value) -> EvalResult<T>)
                                     -> EvalResult<T> {
        let mut root = scope.take(&location.name, location.line)?;
        let outcome = slot(&mut root, &location.indices, location.line).and_then(|value| update(self, value));
        scope.set(&location.name, root, location.line)?;
        outcome
    }

    /// Reads `container[index]`.
    ///
    /// # Errors
    /// - `RuntimeError::IndexOutOfBounds` for array indices outside
    ///   `[0, length)`.
    /// - `RuntimeError::ArgumentType` for non-Integer array indices.
    /// - `RuntimeError::MissingKey` for absent dictionary keys.
    /// - `RuntimeError::UnsupportedOperand` for anything but arrays and
    ///   dictionaries.
    pub(crate) fn subscript(container: &Value, index: &Value, line: usize) -> EvalResult<Value> {
        match container {
            Value::Array(elements) => {
                let position = array_position(index, elements.len(), line)?;
                Ok(elements[position].clone())
            },
            Value::Dict(_) => dict::lookup(container, index, line),
            other => Err(RuntimeError::UnsupportedOperand { operator: "[]".to_string(),
                                                           found: other.type_tag(),
                                                           line }),
        }
    }
}

fn array_position(index: &Value, length: usize, line: usize) -> EvalResult<usize> {
    match index {
        Value::Integer(index) => checked_index(*index, length, line),
        other => Err(RuntimeError::ArgumentType { callee: "Array subscript".to_string(),
                                                  position: 1,
                                                  expected: TypeTag::Integer,
                                                  found: other.type_tag(),
                                                  line }),
    }
}

/// Borrows the element reached by `indices` inside `container`, unsharing
/// every container on the way.
fn slot<'v>(container: &'v mut Value, indices: &[Value], line: usize) -> EvalResult<&'v mut Value> {
    let Some((index, rest)) = indices.split_first() else {
        return Ok(container);
    };

    match container {
        Value::Array(elements) => {
            let position = array_position(index, elements.len(), line)?;
            slot(&mut Rc::make_mut(elements)[position], rest, line)
        },
        Value::Dict(entries) => match Rc::make_mut(entries).iter_mut().find(|(key, _)| key.equals(index)) {
            Some((_, value)) => slot(value, rest, line),
            None => Err(RuntimeError::MissingKey { key: index.describe(),
                                                   line }),
        },
        other => Err(RuntimeError::UnsupportedOperand { operator: "[]".to_string(),
                                                       found: other.type_tag(),
                                                       line }),
    }
}

/// Replaces the element reached by `indices` inside `container`.
///
/// Array slots must already exist; dictionary entries are created when the
/// last subscript names a new key.
fn store(container: &mut Value, indices: &[Value], value: Value, line: usize) -> EvalResult<()> {
    let Some((index, rest)) = indices.split_first() else {
        *container = value;
        return Ok(());
    };

    match container {
        Value::Array(elements) => {
            let position = array_position(index, elements.len(), line)?;
            store(&mut Rc::make_mut(elements)[position], rest, value, line)
        },
        Value::Dict(entries) => {
            let entries = Rc::make_mut(entries);
            if rest.is_empty() {
                dict_insert(entries, index.clone(), value);
                return Ok(());
            }
            match entries.iter_mut().find(|(key, _)| key.equals(index)) {
                Some((_, slot)) => store(slot, rest, value, line),
                None => Err(RuntimeError::MissingKey { key: index.describe(),
                                                       line }),
            }
        },
        other => Err(RuntimeError::UnsupportedOperand { operator: "[]=".to_string(),
                                                       found: other.type_tag(),
                                                       line }),
    }
}
