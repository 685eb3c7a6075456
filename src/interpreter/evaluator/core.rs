use std::io::{self, Write};

use tracing::debug;

use crate::{
    ast::{Expr, Program, Statement},
    error::RuntimeError,
    interpreter::{runtime::Runtime, scope::ScopeRef, value::core::Value},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default limit on nested function, block and method calls.
///
/// Every nested call costs several evaluator frames on the host stack. At
/// this depth a debug build still fits on a 2 MiB thread stack, which is what
/// spawned threads and the test harness get.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

/// Settings for one interpreter session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Calls nested deeper than this fail with a recursion-limit error.
    pub max_call_depth: usize,
    /// Print the value of the last expression statement after each run.
    pub pipe_mode:      bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH,
               pipe_mode:      false, }
    }
}

/// Outcome of evaluating a statement.
#[derive(Debug, Clone)]
pub enum Flow {
    /// Carry on with the next statement.
    Continue,
    /// A `return` statement ran; unwind to the enclosing call.
    Return {
        /// The returned value, if any.
        value: Option<Value>,
        /// Line of the `return` statement.
        line:  usize,
    },
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the method registry, the root
/// scope shared by every program run in the session, the sink `print` writes
/// to and the current call depth.
///
/// ## Usage
///
/// `Context` is created once and reused for every unit of source code, so
/// declarations made by one REPL line stay visible to the next.
pub struct Context {
    pub(crate) runtime: Runtime,
    root:               ScopeRef,
    output:             Box<dyn Write>,
    pub(crate) depth:   usize,
    config:             Config,
}

impl Context {
    /// Creates a context that prints to standard output.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_output(config, io::stdout())
    }

    /// Creates a context that prints to `output`.
    ///
    /// # Example
    /// ```
    /// use std::{cell::RefCell, io::Write, rc::Rc};
    ///
    /// use prometheus::{Config, Context, run_source};
    ///
    /// #[derive(Clone, Default)]
    /// struct Buffer(Rc<RefCell<Vec<u8>>>);
    ///
    /// impl Write for Buffer {
    ///     fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
    ///         self.0.borrow_mut().write(bytes)
    ///     }
    ///
    ///     fn flush(&mut self) -> std::io::Result<()> {
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let buffer = Buffer::default();
    /// let mut context = Context::with_output(Config::default(), buffer.clone());
    /// run_source(&mut context, "print 6 * 7;").unwrap();
    ///
    /// assert_eq!(String::from_utf8(buffer.0.borrow().clone()).unwrap(), "42\n");
    /// ```
    #[must_use]
    pub fn with_output(config: Config, output: impl Write + 'static) -> Self {
        Self { runtime: Runtime::new(),
               root: ScopeRef::root(),
               output: Box::new(output),
               depth: 0,
               config }
    }

    /// The session's root scope.
    #[must_use]
    pub fn root(&self) -> ScopeRef {
        self.root.clone()
    }

    /// The settings the context was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// Runs every statement of `program` in `scope`.
    ///
    /// # Returns
    /// The value of the last expression statement, if there was one.
    ///
    /// # Errors
    /// Returns the first runtime error raised, or
    /// `RuntimeError::ReturnOutsideFunction` if a `return` reaches the top
    /// level.
    pub fn run_program(&mut self,
                       program: &Program,
                       scope: &ScopeRef)
                       -> EvalResult<Option<Value>> {
        debug!(statements = program.statements.len(), scope = %scope.tag(), "running program");

        let mut last = None;
        for statement in &program.statements {
            if let Statement::Expression { expr, .. } = statement {
                last = Some(self.eval(expr, scope)?);
                continue;
            }
            if let Flow::Return { line, .. } = self.eval_statement(statement, scope)? {
                return Err(RuntimeError::ReturnOutsideFunction { line });
            }
        }
        Ok(last)
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation.
    /// The evaluator dispatches based on expression variant: literals,
    /// variable lookups, assignments, operators, subscripts, member access,
    /// calls, collection and block literals, conditionals and comma
    /// expressions.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `scope`: Scope that names are resolved in.
    pub fn eval(&mut self, expr: &Expr, scope: &ScopeRef) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Lookup { name, line } => scope.get(name, *line),
            Expr::Assign { target,
                           op,
                           value,
                           line, } => self.eval_assign(target, *op, value, scope, *line),
            Expr::UnaryOp { op, expr, line } => self.eval_unary_op(*op, expr, scope, *line),
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => self.eval_binary_op(left, *op, right, scope, *line),
            Expr::Update { op,
                           prefix,
                           target,
                           line, } => self.eval_update(*op, *prefix, target, scope, *line),
            Expr::Subscript { target, index, line } => {
                let container = self.eval(target, scope)?;
                let index = self.eval(index, scope)?;
                Self::subscript(&container, &index, *line)
            },
            Expr::Member { target, name, line } => self.eval_member(target, name, scope, *line),
            Expr::Call { callee,
                         arguments,
                         line, } => self.eval_call(callee, arguments, scope, *line),
            Expr::ArrayLiteral { elements, .. } => self.eval_array_literal(elements, scope),
            Expr::DictLiteral { entries, .. } => self.eval_dict_literal(entries, scope),
            Expr::BlockLiteral { block, .. } => Ok(Self::eval_block_literal(block, scope)),
            Expr::Conditional { condition,
                                then_branch,
                                else_branch,
                                .. } => {
                self.eval_conditional(condition, then_branch.as_deref(), else_branch, scope)
            },
            Expr::Comma { expressions, .. } => {
                let mut last = Value::Nil;
                for expr in expressions {
                    last = self.eval(expr, scope)?;
                }
                Ok(last)
            },
        }
    }
}
