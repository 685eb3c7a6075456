use std::rc::Rc;

use crate::{
    ast::{FunctionDef, LiteralValue},
    interpreter::{
        runtime::TypeTag,
        value::callable::{BoundMethod, Closure, describe_function},
    },
    util::num::{format_float, int_to_float},
};

/// Represents a runtime value in the interpreter.
///
/// Containers are shared behind `Rc` and copied on write, so assigning an
/// array to a second variable and then appending to it leaves the first
/// variable unchanged.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double precision floating-point number.
    Float(f64),
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Rc<Vec<Self>>),
    /// Key/value pairs in insertion order; keys are compared with
    /// [`Value::equals`].
    Dict(Rc<Vec<(Self, Self)>>),
    /// The absence of a value.
    Nil,
    /// A closure created by a block literal.
    Block(Rc<Closure>),
    /// A named function.
    Function(Rc<FunctionDef>),
    /// A method bound to its receiver.
    Method(Rc<BoundMethod>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(v))
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Integer(n) => Self::Integer(*n),
            LiteralValue::Float(r) => Self::Float(*r),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::String(s) => Self::String(s.clone()),
            LiteralValue::Nil => Self::Nil,
        }
    }
}

impl Value {
    /// The runtime class of the value.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::{runtime::TypeTag, value::core::Value};
    ///
    /// assert_eq!(Value::Integer(3).type_tag(), TypeTag::Integer);
    /// assert_eq!(Value::Nil.type_tag(), TypeTag::Nil);
    /// ```
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        match self {
            Self::Integer(_) => TypeTag::Integer,
            Self::Float(_) => TypeTag::Float,
            Self::Bool(_) => TypeTag::Bool,
            Self::String(_) => TypeTag::String,
            Self::Array(_) => TypeTag::Array,
            Self::Dict(_) => TypeTag::Dict,
            Self::Nil => TypeTag::Nil,
            Self::Block(_) => TypeTag::Block,
            Self::Function(_) | Self::Method(_) => TypeTag::Function,
        }
    }

    /// The value a declaration without initializer starts with.
    ///
    /// Returns `None` for types without a zero value (`Block`, `Function`).
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::{runtime::TypeTag, value::core::Value};
    ///
    /// assert!(Value::zero(TypeTag::Float).unwrap().equals(&Value::Float(0.0)));
    /// assert!(Value::zero(TypeTag::Block).is_none());
    /// ```
    #[must_use]
    pub fn zero(tag: TypeTag) -> Option<Self> {
        match tag {
            TypeTag::Integer | TypeTag::Number => Some(Self::Integer(0)),
            TypeTag::Float => Some(Self::Float(0.0)),
            TypeTag::Bool => Some(Self::Bool(false)),
            TypeTag::String => Some(Self::String(String::new())),
            TypeTag::Array => Some(Self::Array(Rc::default())),
            TypeTag::Dict => Some(Self::Dict(Rc::default())),
            TypeTag::Object | TypeTag::Nil => Some(Self::Nil),
            TypeTag::Block | TypeTag::Function => None,
        }
    }

    /// Truthiness used by conditions and logical operators.
    ///
    /// Booleans are themselves, numeric zero and `nil` are false, and every
    /// other value is true.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::value::core::Value;
    ///
    /// assert!(!Value::Integer(0).is_truthy());
    /// assert!(!Value::Float(0.0).is_truthy());
    /// assert!(!Value::Nil.is_truthy());
    /// assert!(Value::from("").is_truthy());
    /// assert!(Value::from(Vec::new()).is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(r) => *r != 0.0,
            Self::Nil => false,
            _ => true,
        }
    }

    /// Language-level equality, as used by `==` and dictionary keys.
    ///
    /// Numbers compare by value across `Integer` and `Float`. Arrays compare
    /// slot by slot and dictionaries key by key. Callables are equal only to
    /// themselves, and values of unrelated classes are never equal.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::value::core::Value;
    ///
    /// assert!(Value::Integer(1).equals(&Value::Float(1.0)));
    /// assert!(Value::from(vec![Value::Integer(1)]).equals(&Value::from(vec![Value::Float(1.0)])));
    /// assert!(!Value::from("1").equals(&Value::Integer(1)));
    /// ```
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn equals(&self, other: &Self) -> bool {
        use Value::{Array, Block, Bool, Dict, Float, Function, Integer, Method, Nil, String};

        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Integer(a), Float(b)) | (Float(b), Integer(a)) => int_to_float(*a) == *b,
            (Bool(a), Bool(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Nil, Nil) => true,
            (Array(a), Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            },
            (Dict(a), Dict(b)) => {
                a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| dict_get(b, key).is_some_and(|other| value.equals(other)))
            },
            (Block(a), Block(b)) => Rc::ptr_eq(a, b),
            (Function(a), Function(b)) => Rc::ptr_eq(a, b),
            (Method(a), Method(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The text `print` shows for the value.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::value::core::Value;
    ///
    /// let items = Value::from(vec![Value::Integer(1), Value::Float(2.0), Value::from("three")]);
    /// assert_eq!(items.describe(), "[1, 2.0, three]");
    /// assert_eq!(Value::Nil.describe(), "nil");
    /// ```
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Float(r) => format_float(*r),
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::Nil => "nil".to_string(),
            Self::Array(elements) => {
                let parts = elements.iter().map(Self::describe).collect::<Vec<_>>();
                format!("[{}]", parts.join(", "))
            },
            Self::Dict(entries) => {
                let parts = entries.iter()
                                   .map(|(key, value)| {
                                       format!("{}: {}", key.describe(), value.describe())
                                   })
                                   .collect::<Vec<_>>();
                format!("{{{}}}", parts.join(", "))
            },
            Self::Block(closure) => closure.describe(),
            Self::Function(function) => describe_function(function),
            Self::Method(method) => method.describe(),
        }
    }

    /// Returns the numeric payload widened to `f64`, or `None` for
    /// non-numbers.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(int_to_float(*n)),
            Self::Float(r) => Some(*r),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Finds the value stored under `key`.
#[must_use]
pub fn dict_get<'a>(entries: &'a [(Value, Value)], key: &Value) -> Option<&'a Value> {
    entries.iter()
           .find(|(candidate, _)| candidate.equals(key))
           .map(|(_, value)| value)
}

/// Stores `value` under `key`, replacing an existing entry in place.
pub fn dict_insert(entries: &mut Vec<(Value, Value)>, key: Value, value: Value) {
    match entries.iter_mut().find(|(candidate, _)| candidate.equals(&key)) {
        Some((_, slot)) => *slot = value,
        None => entries.push((key, value)),
    }
}
