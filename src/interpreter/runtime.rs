/// Type tags and class descriptors.
///
/// Defines the closed set of built-in classes, how they chain to their
/// superclasses, and the descriptor holding each class's method table.
pub mod class;

/// Method signatures.
///
/// A signature names a method, its return type, whether it is class level and
/// the ordered types of its parameters.
pub mod signature;

/// The method registry and message dispatch.
///
/// Holds every class descriptor, resolves a method name along a class chain
/// and checks arguments and results against the resolved signature.
pub mod dispatch;

/// Native implementations of the built-in methods.
///
/// One submodule per class family; each registers its methods with the
/// registry when a context is created.
pub mod builtin;

pub use class::TypeTag;
pub use dispatch::Runtime;
pub use signature::MethodSignature;
