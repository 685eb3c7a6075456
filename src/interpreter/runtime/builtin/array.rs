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
        value::{callable::Closure, core::Value},
    },
    util::num::{checked_index, usize_to_i64_checked},
};

pub(crate) fn register(runtime: &mut Runtime) {
    let array = TypeTag::Array;
    runtime.define(array,
                   MethodSignature::instance("at", TypeTag::Object, &[TypeTag::Integer]),
                   at);
    runtime.define_mutating(array,
                            MethodSignature::instance("append", array, &[TypeTag::Object]),
                            append);
    runtime.define(array,
                   MethodSignature::instance("length", TypeTag::Integer, &[]),
                   length);
    runtime.define(array,
                   MethodSignature::instance("map", array, &[TypeTag::Block]),
                   map);
    runtime.define(array,
                   MethodSignature::instance("filter", array, &[TypeTag::Block]),
                   filter);
    runtime.define(array,
                   MethodSignature::instance("reject", array, &[TypeTag::Block]),
                   reject);
    runtime.define(array, EQL, eql);
    runtime.define(array, DESCRIPTION, description);
}

fn elements(value: &Value) -> &[Value] {
    match value {
        Value::Array(elements) => elements,
        _ => &[],
    }
}

fn block(value: &Value, line: usize) -> EvalResult<&Rc<Closure>> {
    match value {
        Value::Block(closure) => Ok(closure),
        other => Err(RuntimeError::NotCallable { found: other.type_tag(),
                                                 line }),
    }
}

fn at(_: &mut Context, receiver: &mut Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let elements = elements(receiver);
    let Value::Integer(index) = args[0] else {
        return Ok(Value::Nil);
    };
    Ok(elements[checked_index(index, elements.len(), line)?].clone())
}

/// Pushes onto the receiver and returns the updated array.
fn append(_: &mut Context, receiver: &mut Value, args: &[Value], _: usize) -> EvalResult<Value> {
    if let Value::Array(elements) = receiver {
        Rc::make_mut(elements).push(args[0].clone());
    }
    Ok(receiver.clone())
}

fn length(_: &mut Context, receiver: &mut Value, _: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Integer(usize_to_i64_checked(elements(receiver).len(), line)?))
}

fn map(context: &mut Context,
       receiver: &mut Value,
       args: &[Value],
       line: usize)
       -> EvalResult<Value> {
    let block = block(&args[0], line)?;
    let mapped = elements(receiver).iter()
                                   .map(|element| {
                                       context.call_block(block, vec![element.clone()], line)
                                   })
                                   .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::from(mapped))
}

/// Keeps the elements for which the block is truthy, or falsy when `keep` is
/// `false`.
fn select(context: &mut Context,
          receiver: &Value,
          block: &Rc<Closure>,
          keep: bool,
          line: usize)
          -> EvalResult<Value> {
    let mut selected = Vec::new();
    for element in elements(receiver) {
        if context.call_block(block, vec![element.clone()], line)?.is_truthy() == keep {
            selected.push(element.clone());
        }
    }
    Ok(Value::from(selected))
}

fn filter(context: &mut Context,
          receiver: &mut Value,
          args: &[Value],
          line: usize)
          -> EvalResult<Value> {
    select(context, receiver, block(&args[0], line)?, true, line)
}

fn reject(context: &mut Context,
          receiver: &mut Value,
          args: &[Value],
          line: usize)
          -> EvalResult<Value> {
    select(context, receiver, block(&args[0], line)?, false, line)
}
