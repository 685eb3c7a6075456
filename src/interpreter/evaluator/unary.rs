use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator, UpdateOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        runtime::TypeTag,
        scope::ScopeRef,
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a prefix unary operation.
    ///
    /// - `Negate` sends `negate` to the operand.
    /// - `Not` negates the operand's truthiness.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnsupportedOperand` when negating a value whose
    /// class does not define `negate`.
    pub(crate) fn eval_unary_op(&mut self,
                                op: UnaryOperator,
                                expr: &Expr,
                                scope: &ScopeRef,
                                line: usize)
                                -> EvalResult<Value> {
        let mut value = self.eval(expr, scope)?;

        match op {
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOperator::Negate => {
                let tag = value.type_tag();
                let entry = self.runtime
                                .lookup(tag, "negate")
                                .ok_or_else(|| RuntimeError::UnsupportedOperand {
                                    operator: "-".to_string(),
                                    found: tag,
                                    line,
                                })?;
                self.invoke(&mut value, entry, &[], line)
            },
        }
    }

    /// Evaluates `++x`, `--x`, `x++` and `x--`.
    ///
    /// When the operand is a variable or a subscript of one, the updated
    /// value is stored back. Prefix forms yield the new value, postfix forms
    /// the old one.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnsupportedOperand` if the operand is not a
    /// Number.
    pub(crate) fn eval_update(&mut self,
                              op: UpdateOperator,
                              prefix: bool,
                              target: &Expr,
                              scope: &ScopeRef,
                              line: usize)
                              -> EvalResult<Value> {
        let (old, location) = self.eval_located(target, scope)?;

        if !old.type_tag().is_a(TypeTag::Number) {
            return Err(RuntimeError::UnsupportedOperand { operator: op.to_string(),
                                                          found: old.type_tag(),
                                                          line });
        }

        let new = self.apply_arithmetic(BinaryOperator::Add,
                                        old.clone(),
                                        Value::Integer(op.delta()),
                                        line)?;

        if let Some(location) = &location {
            self.write_location(location, new.clone(), scope)?;
        }
        Ok(if prefix { new } else { old })
    }
}
