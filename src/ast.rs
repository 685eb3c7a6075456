use std::rc::Rc;

use crate::interpreter::runtime::class::TypeTag;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw constants that can appear directly in source
/// code. Containers and closures are built from their own literal nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Float(f64),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A string literal with escapes already resolved.
    String(String),
    /// The `nil` literal.
    Nil,
}

/// The declared return type of a function or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    /// The callable must not produce a value.
    Void,
    /// The callable must produce a value of this type.
    Value(TypeTag),
}

impl std::fmt::Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Void => write!(f, "Void"),
            Self::Value(tag) => write!(f, "{tag}"),
        }
    }
}

/// A typed parameter declaration, e.g. `Integer x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The declared type of the parameter.
    pub type_tag: TypeTag,
    /// The parameter name.
    pub name:     String,
    /// Line number in the source code.
    pub line:     usize,
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.type_tag, self.name)
    }
}

/// A named function definition: `Integer square(Integer x) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:        String,
    /// The declared return type.
    pub return_type: ReturnType,
    /// The ordered parameter list.
    pub params:      Vec<Parameter>,
    /// The statements of the function body.
    pub body:        Vec<Statement>,
    /// Line number in the source code.
    pub line:        usize,
}

/// The definition behind a block-expression literal: `^(Integer x) { ... }`.
///
/// The definition is shared between the syntax tree and every closure value
/// created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDef {
    /// The declared return type, if the literal names one.
    pub return_type: Option<ReturnType>,
    /// The ordered parameter list.
    pub params:      Vec<Parameter>,
    /// The statements of the block body.
    pub body:        Vec<Statement>,
    /// Line number in the source code.
    pub line:        usize,
}

/// One `key : value` entry of a dictionary literal.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    /// The key expression.
    pub key:   Expr,
    /// The value expression.
    pub value: Expr,
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Each variant models a distinct syntactic construct and carries the line it
/// started on for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Lookup {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Plain (`=`) or compound (`+=`, `-=`, ...) assignment.
    Assign {
        /// The assigned place: a variable or a subscript rooted at one.
        target: Place,
        /// The operator of a compound assignment, `None` for `=`.
        op:     Option<BinaryOperator>,
        /// The right-hand side.
        value:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// A prefix operation (`!x`, `-x`).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (arithmetic, logic, equality or comparison).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Pre or post increment and decrement.
    Update {
        /// Whether the value goes up or down.
        op:     UpdateOperator,
        /// `true` for `++x`, `false` for `x++`.
        prefix: bool,
        /// The operand.
        target: Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Subscript access (`a[i]`).
    Subscript {
        /// The indexed container.
        target: Box<Self>,
        /// The index or key.
        index:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Method lookup (`a.length`).
    Member {
        /// The receiver expression.
        target: Box<Self>,
        /// The method name.
        name:   String,
        /// Line number in the source code.
        line:   usize,
    },
    /// Call of a function, block or method.
    Call {
        /// The called expression.
        callee:    Box<Self>,
        /// Arguments to the call.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Array literal expression.
    ArrayLiteral {
        /// Elements of the array.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Dictionary literal expression (`@[k : v, ...]`).
    DictLiteral {
        /// Entries of the dictionary, in source order.
        entries: Vec<KeyValue>,
        /// Line number in the source code.
        line:    usize,
    },
    /// Block-expression literal (`^(Integer x) { ... }`).
    BlockLiteral {
        /// The shared block definition.
        block: Rc<BlockDef>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Ternary conditional `c ? a : b`, or `c ?: b` when `then_branch` is
    /// absent.
    Conditional {
        /// The condition.
        condition:   Box<Self>,
        /// Expression evaluated if the condition is truthy.
        then_branch: Option<Box<Self>>,
        /// Expression evaluated otherwise.
        else_branch: Box<Self>,
        /// Line number in the source code.
        line:        usize,
    },
    /// Comma expression; evaluates all parts and yields the last.
    Comma {
        /// The expressions, in evaluation order.
        expressions: Vec<Self>,
        /// Line number in the source code.
        line:        usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use prometheus::ast::Expr;
    ///
    /// let expr = Expr::Lookup { name: "x".to_string(),
    ///                           line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Lookup { line, .. }
            | Self::Assign { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Update { line, .. }
            | Self::Subscript { line, .. }
            | Self::Member { line, .. }
            | Self::Call { line, .. }
            | Self::ArrayLiteral { line, .. }
            | Self::DictLiteral { line, .. }
            | Self::BlockLiteral { line, .. }
            | Self::Conditional { line, .. }
            | Self::Comma { line, .. } => *line,
        }
    }

    /// Returns `true` if the expression can be assigned to.
    ///
    /// Places are variables and subscripts whose innermost target is a
    /// variable, such as `x` or `grid[1][2]`.
    #[must_use]
    pub fn is_place(&self) -> bool {
        match self {
            Self::Lookup { .. } => true,
            Self::Subscript { target, .. } => target.is_place(),
            _ => false,
        }
    }
}

/// An assignable location: a variable followed by zero or more subscripts,
/// such as `x` or `grid[row][col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// The variable the location is rooted at.
    pub name:    String,
    /// Subscript expressions, outermost container first.
    pub indices: Vec<Expr>,
    /// Line number in the source code.
    pub line:    usize,
}

impl Place {
    /// Converts a parsed expression into a place.
    ///
    /// Gives the expression back unchanged if it is not assignable.
    ///
    /// # Example
    /// ```
    /// use prometheus::ast::{Expr, LiteralValue, Place};
    ///
    /// let grid = Expr::Lookup { name: "grid".to_string(),
    ///                           line: 1, };
    /// let row = Expr::Subscript { target: Box::new(grid),
    ///                             index:  Box::new(Expr::Literal { value: LiteralValue::Integer(0),
    ///                                                              line:  1, }),
    ///                             line:   1, };
    ///
    /// let place = Place::from_expr(row).unwrap();
    /// assert_eq!(place.name, "grid");
    /// assert_eq!(place.indices.len(), 1);
    ///
    /// let literal = Expr::Literal { value: LiteralValue::Nil,
    ///                               line:  1, };
    /// assert!(Place::from_expr(literal).is_err());
    /// ```
    pub fn from_expr(expr: Expr) -> Result<Self, Expr> {
        match expr {
            Expr::Lookup { name, line } => Ok(Self { name,
                                                     indices: Vec::new(),
                                                     line }),
            Expr::Subscript { target, index, line } if target.is_place() => {
                let mut place = Self::from_expr(*target)?;
                place.indices.push(*index);
                place.line = line;
                Ok(place)
            },
            other => Err(other),
        }
    }
}

/// Header of a `for` statement; every part may be omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ForContext {
    /// Runs once before the loop, in the loop scope.
    pub init:      Option<Box<Statement>>,
    /// Re-evaluated before each iteration; absent means always true.
    pub condition: Option<Expr>,
    /// Runs after each iteration that did not return.
    pub step:      Option<Expr>,
    /// The loop body.
    pub body:      Box<Statement>,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A standalone expression evaluated for its result.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A typed variable declaration: `Integer x;` or `Integer x = 1;`.
    VariableDeclaration {
        /// The declared type.
        type_tag: TypeTag,
        /// The name of the variable.
        name:     String,
        /// The initializer, if any.
        value:    Option<Expr>,
        /// Line number in the source code.
        line:     usize,
    },
    /// A user-defined function declaration.
    Function(Rc<FunctionDef>),
    /// A `{ ... }` statement list, evaluated in a fresh child scope.
    Compound {
        /// Statements inside the braces.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `if (condition) then_branch else else_branch`.
    If {
        /// The condition expression.
        condition:   Expr,
        /// Statement run when the condition is truthy.
        then_branch: Box<Self>,
        /// Statement run otherwise.
        else_branch: Option<Box<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `while (condition) body`.
    While {
        /// The loop condition.
        condition: Expr,
        /// The loop body.
        body:      Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `for (init; condition; step) body`.
    For {
        /// The loop header and body.
        context: ForContext,
        /// Line number in the source code.
        line:    usize,
    },
    /// `return;` or `return value;`.
    Return {
        /// The returned expression, if any.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `print value;`.
    Print {
        /// The printed expression.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
}

/// A parsed source unit: top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// The top-level statements.
    pub statements: Vec<Statement>,
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`^`)
    Pow,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
}

impl BinaryOperator {
    /// Name of the method an arithmetic operator dispatches to.
    ///
    /// Returns `None` for operators that are not arithmetic.
    ///
    /// # Example
    /// ```
    /// use prometheus::ast::BinaryOperator;
    ///
    /// assert_eq!(BinaryOperator::Mod.method_name(), Some("modulus"));
    /// assert_eq!(BinaryOperator::Less.method_name(), None);
    /// ```
    #[must_use]
    pub const fn method_name(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("add"),
            Self::Sub => Some("subtract"),
            Self::Mul => Some("multiply"),
            Self::Div => Some("divide"),
            Self::Mod => Some("modulus"),
            Self::Pow => Some("pow"),
            _ => None,
        }
    }
}

/// Represents a prefix unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

/// Direction of an increment or decrement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UpdateOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl UpdateOperator {
    /// The amount added to the operand.
    #[must_use]
    pub const fn delta(self) -> i64 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Pow, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "^",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "&&",
            Or => "||",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UpdateOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Increment => write!(f, "++"),
            Self::Decrement => write!(f, "--"),
        }
    }
}
