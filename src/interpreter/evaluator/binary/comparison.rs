use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        runtime::builtin::number::COMPARE,
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `==` and `!=` by sending `eql` to the left operand.
    pub(crate) fn eval_equality(&mut self,
                                op: BinaryOperator,
                                left: Value,
                                right: &Value,
                                line: usize)
                                -> EvalResult<Value> {
        let mut receiver = left;
        let equal = self.send(&mut receiver, "eql", std::slice::from_ref(right), line)?
                        .is_truthy();

        Ok(Value::Bool(if op == BinaryOperator::NotEqual { !equal } else { equal }))
    }

    /// Evaluates `<`, `<=`, `>` and `>=` by sending `compare` to the left
    /// operand.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnsupportedOperand` if the left operand does
    /// not implement `- Integer compare(Number)`.
    pub(crate) fn eval_comparison(&mut self,
                                  op: BinaryOperator,
                                  left: Value,
                                  right: &Value,
                                  line: usize)
                                  -> EvalResult<Value> {
        let tag = left.type_tag();
        if !self.runtime.implements(tag, &COMPARE) {
            return Err(RuntimeError::UnsupportedOperand { operator: op.to_string(),
                                                          found: tag,
                                                          line });
        }

        let mut receiver = left;
        let ordering = match self.send(&mut receiver, "compare", std::slice::from_ref(right), line)? {
            Value::Integer(ordering) => ordering,
            _ => 0,
        };

        let result = match op {
            BinaryOperator::Less => ordering < 0,
            BinaryOperator::LessEqual => ordering <= 0,
            BinaryOperator::Greater => ordering > 0,
            _ => ordering >= 0,
        };
        Ok(Value::Bool(result))
    }
}
