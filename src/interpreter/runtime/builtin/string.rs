use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        runtime::{
            MethodSignature, TypeTag,
            builtin::object::{DESCRIPTION, EQL, description, eql},
            dispatch::Runtime,
        },
        value::core::Value,
    },
    util::num::{checked_index, usize_to_i64_checked},
};

pub(crate) fn register(runtime: &mut Runtime) {
    let string = TypeTag::String;
    runtime.define(string,
                   MethodSignature::instance("append", string, &[TypeTag::String]),
                   append);
    runtime.define(string,
                   MethodSignature::instance("length", TypeTag::Integer, &[]),
                   length);
    runtime.define(string,
                   MethodSignature::instance("at", string, &[TypeTag::Integer]),
                   at);
    runtime.define(string,
                   MethodSignature::instance("substr",
                                             string,
                                             &[TypeTag::Integer, TypeTag::Integer]),
                   substr);
    runtime.define(string, EQL, eql);
    runtime.define(string, DESCRIPTION, description);
}

fn text(value: &Value) -> &str {
    match value {
        Value::String(s) => s,
        _ => "",
    }
}

const fn integer(value: &Value) -> i64 {
    match value {
        Value::Integer(n) => *n,
        _ => 0,
    }
}

/// Returns a new string; the receiver is left untouched.
fn append(_: &mut Context, receiver: &mut Value, args: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::String(format!("{}{}", text(receiver), text(&args[0]))))
}

/// Length in characters.
fn length(_: &mut Context, receiver: &mut Value, _: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Integer(usize_to_i64_checked(text(receiver).chars().count(), line)?))
}

fn at(_: &mut Context, receiver: &mut Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let chars = text(receiver).chars().collect::<Vec<_>>();
    let position = checked_index(integer(&args[0]), chars.len(), line)?;
    Ok(Value::String(chars[position].to_string()))
}

/// `substr(start, count)`: up to `count` characters beginning at `start`.
///
/// `start` may equal the length, which yields the empty string.
fn substr(_: &mut Context, receiver: &mut Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let chars = text(receiver).chars().collect::<Vec<_>>();
    let start = integer(&args[0]);
    let count = integer(&args[1]);

    let first = match usize::try_from(start) {
        Ok(first) if first <= chars.len() => first,
        _ => {
            return Err(RuntimeError::IndexOutOfBounds { index: start,
                                                        length: chars.len(),
                                                        line });
        },
    };
    let count = usize::try_from(count).map_err(|_| RuntimeError::IndexOutOfBounds { index: count,
                                                                                     length: chars.len(),
                                                                                     line })?;
    let last = first.saturating_add(count).min(chars.len());

    Ok(Value::String(chars[first..last].iter().collect()))
}
