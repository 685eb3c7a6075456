use std::{collections::HashMap, fmt};

use crate::interpreter::runtime::dispatch::MethodEntry;

/// Identifies one of the built-in classes.
///
/// The set is closed: user programs cannot define classes, so every value's
/// class is one of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Root of the hierarchy; every value is an `Object`.
    Object,
    /// The class of `nil`.
    Nil,
    /// Common superclass of `Integer` and `Float`.
    Number,
    /// 64-bit signed integers.
    Integer,
    /// 64-bit floating-point numbers.
    Float,
    /// `true` and `false`.
    Bool,
    /// Text.
    String,
    /// Ordered sequences of values.
    Array,
    /// Insertion-ordered key/value maps.
    Dict,
    /// Closures created by block literals.
    Block,
    /// Named functions and bound methods.
    Function,
}

impl TypeTag {
    /// Every class, listed superclasses first.
    pub const ALL: [Self; 11] = [Self::Object,
                                 Self::Nil,
                                 Self::Number,
                                 Self::Integer,
                                 Self::Float,
                                 Self::Bool,
                                 Self::String,
                                 Self::Array,
                                 Self::Dict,
                                 Self::Block,
                                 Self::Function];

    /// Resolves a type name as written in source code.
    ///
    /// `Void` is not a class and resolves to `None`, like any unknown name.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::runtime::TypeTag;
    ///
    /// assert_eq!(TypeTag::from_name("Integer"), Some(TypeTag::Integer));
    /// assert_eq!(TypeTag::from_name("Void"), None);
    /// assert_eq!(TypeTag::from_name("Widget"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// The source-level name of the class.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Nil => "Nil",
            Self::Number => "Number",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Array => "Array",
            Self::Dict => "Dict",
            Self::Block => "Block",
            Self::Function => "Function",
        }
    }

    /// The direct superclass, or `None` for `Object`.
    #[must_use]
    pub const fn superclass(self) -> Option<Self> {
        match self {
            Self::Object => None,
            Self::Integer | Self::Float => Some(Self::Number),
            _ => Some(Self::Object),
        }
    }

    /// Returns `true` if `self` is `other` or inherits from it.
    ///
    /// # Example
    /// ```
    /// use prometheus::interpreter::runtime::TypeTag;
    ///
    /// assert!(TypeTag::Integer.is_a(TypeTag::Number));
    /// assert!(TypeTag::Nil.is_a(TypeTag::Object));
    /// assert!(!TypeTag::Number.is_a(TypeTag::Float));
    /// ```
    #[must_use]
    pub fn is_a(self, other: Self) -> bool {
        self.chain().any(|tag| tag == other)
    }

    /// Iterates over `self` and then each superclass up to `Object`.
    pub fn chain(self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |tag| tag.superclass())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Runtime description of one built-in class.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    /// The class this descriptor belongs to.
    pub tag:        TypeTag,
    /// The superclass consulted when a method is not found here.
    pub superclass: Option<TypeTag>,
    /// Methods defined directly on this class, keyed by name.
    pub methods:    HashMap<&'static str, MethodEntry>,
}

impl ClassDescriptor {
    /// Creates a descriptor with an empty method table.
    #[must_use]
    pub fn new(tag: TypeTag) -> Self {
        Self { tag,
               superclass: tag.superclass(),
               methods: HashMap::new() }
    }
}
