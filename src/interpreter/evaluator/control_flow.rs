use crate::{
    ast::{Expr, ForContext, Statement},
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        scope::ScopeRef,
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `if (condition) then_branch else else_branch`.
    ///
    /// The condition and the chosen branch share one child scope.
    pub(crate) fn eval_if(&mut self,
                          condition: &Expr,
                          then_branch: &Statement,
                          else_branch: Option<&Statement>,
                          scope: &ScopeRef)
                          -> EvalResult<Flow> {
        let inner = scope.child("if");

        if self.eval(condition, &inner)?.is_truthy() {
            self.eval_statement(then_branch, &inner)
        } else if let Some(else_branch) = else_branch {
            self.eval_statement(else_branch, &inner)
        } else {
            Ok(Flow::Continue)
        }
    }

    /// Evaluates `while (condition) body`.
    ///
    /// One child scope is created before the first iteration and reused for
    /// all of them.
    pub(crate) fn eval_while(&mut self,
                             condition: &Expr,
                             body: &Statement,
                             scope: &ScopeRef)
                             -> EvalResult<Flow> {
        let inner = scope.child("while");

        while self.eval(condition, &inner)?.is_truthy() {
            if let flow @ Flow::Return { .. } = self.eval_statement(body, &inner)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }

    /// Evaluates a `for` loop.
    ///
    /// The initializer runs once in the loop's child scope. A missing
    /// condition counts as true, so `for (;;)` only ends through `return`.
    pub(crate) fn eval_for(&mut self, context: &ForContext, scope: &ScopeRef) -> EvalResult<Flow> {
        let inner = scope.child("for");

        if let Some(init) = &context.init {
            self.eval_statement(init, &inner)?;
        }

        loop {
            if let Some(condition) = &context.condition
               && !self.eval(condition, &inner)?.is_truthy()
            {
                break;
            }

            if let flow @ Flow::Return { .. } = self.eval_statement(&context.body, &inner)? {
                return Ok(flow);
            }

            if let Some(step) = &context.step {
                self.eval(step, &inner)?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Evaluates `c ? a : b`, or `c ?: b` when `then_branch` is absent.
    ///
    /// Only the chosen branch is evaluated. The short form yields the
    /// condition's own value when it is truthy.
    pub(crate) fn eval_conditional(&mut self,
                                   condition: &Expr,
                                   then_branch: Option<&Expr>,
                                   else_branch: &Expr,
                                   scope: &ScopeRef)
                                   -> EvalResult<Value> {
        let value = self.eval(condition, scope)?;

        if !value.is_truthy() {
            return self.eval(else_branch, scope);
        }
        match then_branch {
            Some(then_branch) => self.eval(then_branch, scope),
            None => Ok(value),
        }
    }
}
