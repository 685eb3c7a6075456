use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Widens an Integer to a Float for mixed arithmetic.
///
/// Values beyond `2^53` round to the nearest representable `f64`, as they do
/// in any language with IEEE doubles.
///
/// ## Example
/// ```
/// use prometheus::util::num::int_to_float;
///
/// assert_eq!(int_to_float(42), 42.0);
/// assert_eq!(int_to_float(-3), -3.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn int_to_float(value: i64) -> f64 {
    value as f64
}

/// Converts a language-level index into a position inside a sequence of
/// `length` elements.
///
/// ## Errors
/// Returns `RuntimeError::IndexOutOfBounds` if `index` is negative or not
/// smaller than `length`.
///
/// ## Parameters
/// - `index`: The requested index.
/// - `length`: The length of the indexed sequence.
/// - `line`: Source code line number for error reporting.
///
/// ## Example
/// ```
/// use prometheus::{error::RuntimeError, util::num::checked_index};
///
/// assert_eq!(checked_index(2, 3, 1).unwrap(), 2);
///
/// let err = checked_index(3, 3, 9).unwrap_err();
/// assert!(matches!(err, RuntimeError::IndexOutOfBounds { index: 3, length: 3, line: 9 }));
///
/// assert!(checked_index(-1, 3, 9).is_err());
/// ```
pub fn checked_index(index: i64, length: usize, line: usize) -> EvalResult<usize> {
    match usize::try_from(index) {
        Ok(position) if position < length => Ok(position),
        _ => Err(RuntimeError::IndexOutOfBounds { index, length, line }),
    }
}

/// Converts a length or count into an Integer value.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the value does not fit in an `i64`.
///
/// ## Example
/// ```
/// use prometheus::util::num::usize_to_i64_checked;
///
/// assert_eq!(usize_to_i64_checked(5, 0).unwrap(), 5);
/// ```
pub fn usize_to_i64_checked(value: usize, line: usize) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::Overflow { line })
}

/// Converts a non-negative Integer exponent for `i64::checked_pow`.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the exponent is negative or larger than
/// `u32::MAX`; any such exponent overflows an `i64` base other than `0`, `1`
/// or `-1` anyway.
///
/// ## Example
/// ```
/// use prometheus::{error::RuntimeError, util::num::exponent_to_u32_checked};
///
/// assert_eq!(exponent_to_u32_checked(10, 1).unwrap(), 10);
///
/// let err = exponent_to_u32_checked(i64::MAX, 4).unwrap_err();
/// assert!(matches!(err, RuntimeError::Overflow { line: 4 }));
/// ```
pub fn exponent_to_u32_checked(value: i64, line: usize) -> EvalResult<u32> {
    u32::try_from(value).map_err(|_| RuntimeError::Overflow { line })
}

/// Renders a Float the way `print` shows it: always with a fractional part,
/// so that finite values read back as the same Float.
///
/// ## Example
/// ```
/// use prometheus::util::num::format_float;
///
/// assert_eq!(format_float(3.0), "3.0");
/// assert_eq!(format_float(1e20), "100000000000000000000.0");
/// assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_float(3.5), "3.5");
/// assert_eq!(format_float(-0.25), "-0.25");
/// assert_eq!(format_float(f64::INFINITY), "inf");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
