use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::ScopeRef,
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary operation.
    ///
    /// Both operands are always evaluated, left first; `&&` and `||` do not
    /// short-circuit.
    ///
    /// # Parameters
    /// - `left`: Left operand expression.
    /// - `op`: Binary operator.
    /// - `right`: Right operand expression.
    /// - `scope`: Scope the operands are evaluated in.
    /// - `line`: Line number for error reporting.
    pub(crate) fn eval_binary_op(&mut self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 scope: &ScopeRef,
                                 line: usize)
                                 -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Pow, Sub,
        };

        let left = self.eval(left, scope)?;
        let right = self.eval(right, scope)?;

        match op {
            Add | Sub | Mul | Div | Mod | Pow => self.apply_arithmetic(op, left, right, line),
            Equal | NotEqual => self.eval_equality(op, left, &right, line),
            Less | LessEqual | Greater | GreaterEqual => {
                self.eval_comparison(op, left, &right, line)
            },
            And | Or => Ok(Self::eval_logic(op, &left, &right)),
        }
    }

    /// Sends the method behind an arithmetic operator to the left operand.
    ///
    /// `+` sends `add`, `-` `subtract`, `*` `multiply`, `/` `divide`, `%`
    /// `modulus` and `^` `pow`.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnsupportedOperand` if the left operand's class
    /// chain has no such method, and the dispatch errors of the method
    /// otherwise.
    ///
    /// # Example
    /// ```
    /// use prometheus::{
    ///     Config, Context,
    ///     ast::BinaryOperator,
    ///     error::RuntimeError,
    ///     interpreter::value::core::Value,
    /// };
    ///
    /// let mut context = Context::new(Config::default());
    ///
    /// let sum = context.apply_arithmetic(BinaryOperator::Add, Value::Integer(2), Value::Float(0.5), 1);
    /// assert_eq!(sum.unwrap().describe(), "2.5");
    ///
    /// let err = context.apply_arithmetic(BinaryOperator::Mul, Value::from("ab"), Value::Integer(2), 1);
    /// assert!(matches!(err, Err(RuntimeError::UnsupportedOperand { .. })));
    /// ```
    pub fn apply_arithmetic(&mut self,
                            op: BinaryOperator,
                            left: Value,
                            right: Value,
                            line: usize)
                            -> EvalResult<Value> {
        let tag = left.type_tag();
        let entry = op.method_name()
                      .and_then(|name| self.runtime.lookup(tag, name))
                      .ok_or_else(|| RuntimeError::UnsupportedOperand { operator: op.to_string(),
                                                                        found: tag,
                                                                        line })?;
        let mut receiver = left;
        self.invoke(&mut receiver, entry, &[right], line)
    }
}
