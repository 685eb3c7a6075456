/// Numeric conversion helpers.
///
/// This module provides the conversions the runtime needs between `i64`,
/// `usize`, `u32` and `f64`: checked index and length conversions that report
/// runtime errors instead of silently wrapping, the Integer-to-Float widening
/// used by mixed arithmetic, and the canonical textual form of a Float.
pub mod num;
