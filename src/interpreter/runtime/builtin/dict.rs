use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        runtime::{
            MethodSignature, TypeTag,
            builtin::object::{DESCRIPTION, EQL, description, eql},
            dispatch::Runtime,
        },
        value::core::{Value, dict_get, dict_insert},
    },
    util::num::usize_to_i64_checked,
};

pub(crate) fn register(runtime: &mut Runtime) {
    let dict = TypeTag::Dict;
    runtime.define(dict,
                   MethodSignature::instance("fetch", TypeTag::Object, &[TypeTag::Object]),
                   fetch);
    runtime.define_mutating(dict,
                            MethodSignature::instance("add",
                                                      dict,
                                                      &[TypeTag::Object, TypeTag::Object]),
                            add);
    runtime.define(dict,
                   MethodSignature::instance("has_key", TypeTag::Bool, &[TypeTag::Object]),
                   has_key);
    runtime.define(dict,
                   MethodSignature::instance("length", TypeTag::Integer, &[]),
                   length);
    runtime.define(dict, EQL, eql);
    runtime.define(dict, DESCRIPTION, description);
}

fn entries(value: &Value) -> &[(Value, Value)] {
    match value {
        Value::Dict(entries) => entries,
        _ => &[],
    }
}

/// Looks up `key`.
///
/// # Errors
/// Returns `RuntimeError::MissingKey` if the dictionary has no such key.
pub(crate) fn lookup(receiver: &Value, key: &Value, line: usize) -> EvalResult<Value> {
    dict_get(entries(receiver), key).cloned()
                                    .ok_or_else(|| RuntimeError::MissingKey { key: key.describe(),
                                                                              line })
}

fn fetch(_: &mut Context, receiver: &mut Value, args: &[Value], line: usize) -> EvalResult<Value> {
    lookup(receiver, &args[0], line)
}

/// Inserts or replaces an entry and returns the updated dictionary.
fn add(_: &mut Context, receiver: &mut Value, args: &[Value], _: usize) -> EvalResult<Value> {
    if let Value::Dict(entries) = receiver {
        dict_insert(Rc::make_mut(entries), args[0].clone(), args[1].clone());
    }
    Ok(receiver.clone())
}

fn has_key(_: &mut Context, receiver: &mut Value, args: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::Bool(dict_get(entries(receiver), &args[0]).is_some()))
}

fn length(_: &mut Context, receiver: &mut Value, _: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Integer(usize_to_i64_checked(entries(receiver).len(), line)?))
}
