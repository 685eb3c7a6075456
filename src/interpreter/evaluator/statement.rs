use crate::{
    ast::Statement,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        runtime::TypeTag,
        scope::ScopeRef,
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a single statement.
    ///
    /// # Parameters
    /// - `statement`: Statement to evaluate.
    /// - `scope`: Scope the statement runs in; declarations land here.
    ///
    /// # Returns
    /// `Flow::Return` if a `return` statement ran, `Flow::Continue`
    /// otherwise.
    pub fn eval_statement(&mut self, statement: &Statement, scope: &ScopeRef) -> EvalResult<Flow> {
        match statement {
            Statement::Expression { expr, .. } => {
                self.eval(expr, scope)?;
                Ok(Flow::Continue)
            },
            Statement::VariableDeclaration { type_tag,
                                             name,
                                             value,
                                             line, } => {
                let value = match value {
                    Some(expr) => self.eval(expr, scope)?,
                    None => {
                        Value::zero(*type_tag).ok_or_else(|| RuntimeError::NoDefaultValue {
                                                  name: name.clone(),
                                                  type_tag: *type_tag,
                                                  line: *line,
                                              })?
                    },
                };
                scope.declare(name, *type_tag, value, *line)?;
                Ok(Flow::Continue)
            },
            Statement::Function(def) => {
                scope.declare(&def.name, TypeTag::Function, Value::Function(def.clone()), def.line)?;
                Ok(Flow::Continue)
            },
            Statement::Compound { statements, .. } => {
                let inner = scope.child("compound");
                self.eval_statements(statements, &inner)
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => self.eval_if(condition, then_branch, else_branch.as_deref(), scope),
            Statement::While { condition, body, .. } => self.eval_while(condition, body, scope),
            Statement::For { context, .. } => self.eval_for(context, scope),
            Statement::Return { value, line } => {
                let value = match value {
                    Some(expr) => Some(self.eval(expr, scope)?),
                    None => None,
                };
                Ok(Flow::Return { value,
                                  line: *line })
            },
            Statement::Print { value, line } => {
                let value = self.eval(value, scope)?;
                self.print_value(&value, scope, *line)?;
                Ok(Flow::Continue)
            },
        }
    }

    /// Runs statements in order until one of them returns.
    pub fn eval_statements(&mut self,
                           statements: &[Statement],
                           scope: &ScopeRef)
                           -> EvalResult<Flow> {
        for statement in statements {
            if let flow @ Flow::Return { .. } = self.eval_statement(statement, scope)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }
}
