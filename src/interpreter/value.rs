/// Closure and bound-method payloads.
///
/// Defines the data behind `Block` and `Method` values: a block literal paired
/// with the scope it was created in, and a method resolved on a receiver.
pub mod callable;

/// The `Value` enum and its core operations.
///
/// Covers classification into runtime classes, truthiness, structural
/// equality, textual descriptions and the zero value of each declarable type.
pub mod core;
