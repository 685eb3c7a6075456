use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    runtime::{MethodSignature, TypeTag, dispatch::Runtime},
    value::core::Value,
};

/// `- Bool eql(Object)`
pub const EQL: MethodSignature = MethodSignature::instance("eql", TypeTag::Bool, &[TypeTag::Object]);
/// `- String description()`
pub const DESCRIPTION: MethodSignature =
    MethodSignature::instance("description", TypeTag::String, &[]);

pub(crate) fn register(runtime: &mut Runtime) {
    for tag in [TypeTag::Object, TypeTag::Nil, TypeTag::Bool] {
        runtime.define(tag, EQL, eql);
        runtime.define(tag, DESCRIPTION, description);
    }
    for tag in [TypeTag::Block, TypeTag::Function] {
        runtime.define(tag, DESCRIPTION, description);
    }
}

/// Structural equality; also installed on the container and number classes.
pub(crate) fn eql(_: &mut Context,
                  receiver: &mut Value,
                  args: &[Value],
                  _: usize)
                  -> EvalResult<Value> {
    Ok(Value::Bool(receiver.equals(&args[0])))
}

/// The text `print` shows; also installed on every other class.
pub(crate) fn description(_: &mut Context,
                          receiver: &mut Value,
                          _: &[Value],
                          _: usize)
                          -> EvalResult<Value> {
    Ok(Value::String(receiver.describe()))
}
