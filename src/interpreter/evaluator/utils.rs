use std::rc::Rc;

use crate::{
    ast::{BlockDef, Expr, KeyValue},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::ScopeRef,
        value::{
            callable::Closure,
            core::{Value, dict_insert},
        },
    },
};

impl Context {
    /// Evaluates the elements of an array literal, left to right.
    pub(crate) fn eval_array_literal(&mut self,
                                     elements: &[Expr],
                                     scope: &ScopeRef)
                                     -> EvalResult<Value> {
        let values = elements.iter()
                             .map(|element| self.eval(element, scope))
                             .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::from(values))
    }

    /// Evaluates a dictionary literal. A repeated key keeps its first
    /// position and its last value.
    pub(crate) fn eval_dict_literal(&mut self,
                                    entries: &[KeyValue],
                                    scope: &ScopeRef)
                                    -> EvalResult<Value> {
        let mut pairs = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = self.eval(&entry.key, scope)?;
            let value = self.eval(&entry.value, scope)?;
            dict_insert(&mut pairs, key, value);
        }
        Ok(Value::Dict(Rc::new(pairs)))
    }

    /// Closes a block literal over the scope it is evaluated in.
    pub(crate) fn eval_block_literal(block: &Rc<BlockDef>, scope: &ScopeRef) -> Value {
        Value::Block(Rc::new(Closure { def:   Rc::clone(block),
                                       scope: scope.clone(), }))
    }
}
