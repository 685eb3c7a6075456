/// Entry point for binary operators and arithmetic dispatch.
pub mod core;

/// Equality and relational comparison.
pub mod comparison;

/// Logical AND and OR.
pub mod logic;
