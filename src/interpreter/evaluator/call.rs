use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::{Expr, FunctionDef, Parameter, ReturnType, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow},
            place::Location,
        },
        runtime::{
            TypeTag,
            dispatch::{MethodEntry, check_arguments, check_result},
        },
        scope::ScopeRef,
        value::{
            callable::{BoundMethod, Closure, Origin},
            core::Value,
        },
    },
};

impl Context {
    /// Evaluates a call expression.
    ///
    /// A call whose callee is a member access (`items.append(4)`) is sent to
    /// the receiver directly. When that receiver is a variable or a subscript
    /// of one and the method changes it, the changed value is stored back.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            arguments: &[Expr],
                            scope: &ScopeRef,
                            line: usize)
                            -> EvalResult<Value> {
        if let Expr::Member { target, name, .. } = callee {
            return self.eval_method_call(target, name, arguments, scope, line)
                       .map(|(result, _)| result);
        }

        let callee = self.eval(callee, scope)?;
        let args = self.eval_arguments(arguments, scope)?;
        self.call_value(&callee, args, scope, line)
    }

    fn eval_arguments(&mut self, arguments: &[Expr], scope: &ScopeRef) -> EvalResult<Vec<Value>> {
        arguments.iter()
                 .map(|argument| self.eval(argument, scope))
                 .collect()
    }

    /// Sends `name` to the value of `target`.
    ///
    /// # Returns
    /// The result, and the receiver's location when a mutating method
    /// changed a receiver that has one.
    pub(crate) fn eval_method_call(&mut self,
                                   target: &Expr,
                                   name: &str,
                                   arguments: &[Expr],
                                   scope: &ScopeRef,
                                   line: usize)
                                   -> EvalResult<(Value, Option<Location>)> {
        let (mut receiver, location) = self.eval_located(target, scope)?;
        let entry = self.resolve_method(receiver.type_tag(), name, line)?;
        let args = self.eval_arguments(arguments, scope)?;

        match location {
            Some(location) if entry.mutating => {
                drop(receiver);
                let result = self.update_location(&location, scope, |context, receiver| {
                                     context.send(receiver, name, &args, line)
                                 })?;
                Ok((result, Some(location)))
            },
            _ => Ok((self.invoke(&mut receiver, entry, &args, line)?, None)),
        }
    }

    /// Evaluates `receiver.name` into a bound method.
    ///
    /// # Errors
    /// Returns `RuntimeError::MissingMethod` if the receiver's class chain
    /// does not define `name`.
    pub(crate) fn eval_member(&mut self,
                              target: &Expr,
                              name: &str,
                              scope: &ScopeRef,
                              line: usize)
                              -> EvalResult<Value> {
        let (receiver, location) = self.eval_located(target, scope)?;
        let entry = self.resolve_method(receiver.type_tag(), name, line)?;
        let origin = location.filter(|_| entry.mutating)
                             .map(|location| Origin { location,
                                                      scope: scope.clone() });
        Ok(Value::Method(Rc::new(BoundMethod { receiver,
                                               entry,
                                               origin })))
    }

    /// Calls a function, block or bound method value.
    ///
    /// # Errors
    /// Returns `RuntimeError::NotCallable` for any other value, and whatever
    /// the call itself raises.
    pub fn call_value(&mut self,
                      callee: &Value,
                      args: Vec<Value>,
                      scope: &ScopeRef,
                      line: usize)
                      -> EvalResult<Value> {
        match callee {
            Value::Function(function) => self.call_function(function, args, scope, line),
            Value::Block(closure) => self.call_block(closure, args, line),
            Value::Method(method) => match &method.origin {
                Some(origin) => self.update_location(&origin.location, &origin.scope, |context, receiver| {
                                        context.send(receiver, method.entry.signature.name, &args, line)
                                    }),
                None => {
                    let mut receiver = method.receiver.clone();
                    self.invoke(&mut receiver, method.entry, &args, line)
                },
            },
            other => Err(RuntimeError::NotCallable { found: other.type_tag(),
                                                     line }),
        }
    }

    /// Calls a named function.
    ///
    /// The function body runs in a new frame whose parent is the root of the
    /// caller's scope chain, so it sees global names but not the caller's
    /// locals.
    pub fn call_function(&mut self,
                         function: &Rc<FunctionDef>,
                         args: Vec<Value>,
                         caller: &ScopeRef,
                         line: usize)
                         -> EvalResult<Value> {
        let callee = format!("function '{}'", function.name);
        debug!(function = %function.name, depth = self.depth, "calling function");

        let scope = caller.root_frame().child(&function.name);
        bind_parameters(&callee, &function.params, args, &scope, line)?;

        let returned = self.run_body(&function.body, &scope, line)?;
        check_return(&callee, function.return_type, returned, line)
    }

    /// Calls a block closure.
    ///
    /// The body runs in a new frame whose parent is the scope the block
    /// literal was evaluated in. A block without declared return type yields
    /// whatever it returns, or `nil`.
    pub fn call_block(&mut self,
                      closure: &Rc<Closure>,
                      args: Vec<Value>,
                      line: usize)
                      -> EvalResult<Value> {
        debug!(params = closure.def.params.len(), depth = self.depth, "calling block");

        let scope = closure.scope.child("block");
        bind_parameters("block", &closure.def.params, args, &scope, line)?;

        let returned = self.run_body(&closure.def.body, &scope, line)?;
        match closure.def.return_type {
            Some(return_type) => check_return("block", return_type, returned, line),
            None => Ok(returned.unwrap_or(Value::Nil)),
        }
    }

    /// Runs a function or block body one call level deeper.
    fn run_body(&mut self,
                body: &[Statement],
                scope: &ScopeRef,
                line: usize)
                -> EvalResult<Option<Value>> {
        if self.depth >= self.config().max_call_depth {
            return Err(RuntimeError::RecursionLimit { limit: self.config().max_call_depth,
                                                      line });
        }

        self.depth += 1;
        let flow = self.eval_statements(body, scope);
        self.depth -= 1;

        match flow? {
            Flow::Return { value, .. } => Ok(value),
            Flow::Continue => Ok(None),
        }
    }

    /// Sends the message `name` to `receiver`.
    ///
    /// Resolves the method along the receiver's class chain, checks the
    /// arguments, runs it and checks the result.
    ///
    /// # Errors
    /// - `RuntimeError::MissingMethod` if no class in the chain defines
    ///   `name`.
    /// - Argument and return type errors from the signature checks.
    pub fn send(&mut self,
                receiver: &mut Value,
                name: &str,
                args: &[Value],
                line: usize)
                -> EvalResult<Value> {
        let entry = self.resolve_method(receiver.type_tag(), name, line)?;
        self.invoke(receiver, entry, args, line)
    }

    pub(crate) fn resolve_method(&self,
                                 tag: TypeTag,
                                 name: &str,
                                 line: usize)
                                 -> EvalResult<MethodEntry> {
        self.runtime
            .lookup(tag, name)
            .ok_or_else(|| RuntimeError::MissingMethod { receiver: tag,
                                                         method: name.to_string(),
                                                         line })
    }

    pub(crate) fn invoke(&mut self,
                         receiver: &mut Value,
                         entry: MethodEntry,
                         args: &[Value],
                         line: usize)
                         -> EvalResult<Value> {
        let tag = receiver.type_tag();
        check_arguments(tag, &entry.signature, args, line)?;
        trace!(receiver = %tag, signature = %entry.signature, "sending message");

        let result = (entry.function)(self, receiver, args, line)?;
        check_result(tag, &entry.signature, result, line)
    }
}

/// Declares each parameter in the call frame after checking arity and types.
fn bind_parameters(callee: &str,
                   params: &[Parameter],
                   args: Vec<Value>,
                   scope: &ScopeRef,
                   line: usize)
                   -> EvalResult<()> {
    if params.len() != args.len() {
        return Err(RuntimeError::ArgumentCount { callee: callee.to_string(),
                                                 expected: params.len(),
                                                 found: args.len(),
                                                 line });
    }

    for (position, (param, arg)) in params.iter().zip(args).enumerate() {
        if !arg.type_tag().is_a(param.type_tag) {
            return Err(RuntimeError::ArgumentType { callee: callee.to_string(),
                                                    position: position + 1,
                                                    expected: param.type_tag,
                                                    found: arg.type_tag(),
                                                    line });
        }
        scope.declare(&param.name, param.type_tag, arg, line)?;
    }
    Ok(())
}

/// Enforces a declared return type on the value a body returned.
///
/// `Void` callables yield `nil`.
fn check_return(callee: &str,
                return_type: ReturnType,
                returned: Option<Value>,
                line: usize)
                -> EvalResult<Value> {
    match (return_type, returned) {
        (ReturnType::Void, None) => Ok(Value::Nil),
        (ReturnType::Void, Some(_)) => {
            Err(RuntimeError::UnexpectedReturnValue { callee: callee.to_string(),
                                                      line })
        },
        (ReturnType::Value(expected), None) => {
            Err(RuntimeError::MissingReturnValue { callee: callee.to_string(),
                                                   expected,
                                                   line })
        },
        (ReturnType::Value(expected), Some(value)) => {
            if value.type_tag().is_a(expected) {
                Ok(value)
            } else {
                Err(RuntimeError::ReturnType { callee: callee.to_string(),
                                               expected,
                                               found: value.type_tag(),
                                               line })
            }
        },
    }
}
