/// `Object` methods shared by every class, plus the `Nil`, `Bool`, `Block`
/// and `Function` tables.
pub mod object;

/// Arithmetic, comparison and negation on `Number`, `Integer` and `Float`.
pub mod number;

/// Methods on `String`.
pub mod string;

/// Methods on `Array`, including the block-taking `map`, `filter` and
/// `reject`.
pub mod array;

/// Methods on `Dict`.
pub mod dict;

use crate::interpreter::runtime::dispatch::Runtime;

/// Installs every built-in method table.
pub(crate) fn register(runtime: &mut Runtime) {
    object::register(runtime);
    number::register(runtime);
    string::register(runtime);
    array::register(runtime);
    dict::register(runtime);
}
