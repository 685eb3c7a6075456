use crate::{
    ast::BinaryOperator,
    interpreter::{evaluator::core::Context, value::core::Value},
};

impl Context {
    /// Evaluates a logical operation on the truthiness of both operands.
    ///
    /// # Example
    /// ```
    /// use prometheus::{
    ///     Context,
    ///     ast::BinaryOperator,
    ///     interpreter::value::core::Value,
    /// };
    ///
    /// let result = Context::eval_logic(BinaryOperator::And, &Value::Integer(1), &Value::from("x"));
    /// assert!(result.is_truthy());
    ///
    /// let result = Context::eval_logic(BinaryOperator::Or, &Value::Nil, &Value::Float(0.0));
    /// assert!(!result.is_truthy());
    /// ```
    #[must_use]
    pub fn eval_logic(op: BinaryOperator, left: &Value, right: &Value) -> Value {
        match op {
            BinaryOperator::And => Value::Bool(left.is_truthy() && right.is_truthy()),
            _ => Value::Bool(left.is_truthy() || right.is_truthy()),
        }
    }
}
