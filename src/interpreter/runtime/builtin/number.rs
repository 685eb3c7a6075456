use std::cmp::Ordering;

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
    util::num::exponent_to_u32_checked,
};

const NUMBER: &[TypeTag] = &[TypeTag::Number];

/// `- Integer compare(Number)`
pub const COMPARE: MethodSignature = MethodSignature::instance("compare", TypeTag::Integer, NUMBER);

pub(crate) fn register(runtime: &mut Runtime) {
    let number = TypeTag::Number;
    runtime.define(number, MethodSignature::instance("add", number, NUMBER), add);
    runtime.define(number, MethodSignature::instance("subtract", number, NUMBER), subtract);
    runtime.define(number, MethodSignature::instance("multiply", number, NUMBER), multiply);
    runtime.define(number, MethodSignature::instance("divide", number, NUMBER), divide);
    runtime.define(number, MethodSignature::instance("pow", number, NUMBER), pow);
    runtime.define(number, MethodSignature::instance("negate", number, &[]), negate);
    runtime.define(number, COMPARE, compare);
    runtime.define(number, EQL, eql);
    runtime.define(number, DESCRIPTION, description);

    runtime.define(TypeTag::Integer,
                   MethodSignature::instance("modulus", TypeTag::Integer, &[TypeTag::Integer]),
                   modulus);
}

/// Applies `int_op` when both operands are Integers and `float_op` otherwise.
///
/// # Errors
/// Returns `RuntimeError::Overflow` if the integer operation overflows.
fn arithmetic(left: &Value,
              right: &Value,
              line: usize,
              int_op: fn(i64, i64) -> Option<i64>,
              float_op: fn(f64, f64) -> f64)
              -> EvalResult<Value> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            int_op(*a, *b).map(Value::Integer)
                          .ok_or(RuntimeError::Overflow { line })
        },
        _ => {
            let (a, b) = as_floats(left, right, line)?;
            Ok(Value::Float(float_op(a, b)))
        },
    }
}

fn as_floats(left: &Value, right: &Value, line: usize) -> EvalResult<(f64, f64)> {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => Ok((a, b)),
        (None, _) => Err(RuntimeError::UnsupportedOperand { operator: "arithmetic".to_string(),
                                                           found: left.type_tag(),
                                                           line }),
        (_, None) => Err(RuntimeError::UnsupportedOperand { operator: "arithmetic".to_string(),
                                                           found: right.type_tag(),
                                                           line }),
    }
}

fn add(_: &mut Context, receiver: &mut Value, args: &[Value], line: usize) -> EvalResult<Value> {
    arithmetic(receiver, &args[0], line, i64::checked_add, |a, b| a + b)
}

fn subtract(_: &mut Context,
            receiver: &mut Value,
            args: &[Value],
            line: usize)
            -> EvalResult<Value> {
    arithmetic(receiver, &args[0], line, i64::checked_sub, |a, b| a - b)
}

fn multiply(_: &mut Context,
            receiver: &mut Value,
            args: &[Value],
            line: usize)
            -> EvalResult<Value> {
    arithmetic(receiver, &args[0], line, i64::checked_mul, |a, b| a * b)
}

/// Integer division truncates toward zero; anything involving a Float
/// follows IEEE rules.
fn divide(_: &mut Context, receiver: &mut Value, args: &[Value], line: usize) -> EvalResult<Value> {
    if let (Value::Integer(_), Value::Integer(0)) = (&*receiver, &args[0]) {
        return Err(RuntimeError::DivisionByZero { line });
    }
    arithmetic(receiver, &args[0], line, i64::checked_div, |a, b| a / b)
}

/// Integer exponents must be non-negative to stay Integer; a negative
/// exponent produces a Float.
fn pow(_: &mut Context, receiver: &mut Value, args: &[Value], line: usize) -> EvalResult<Value> {
    match (&*receiver, &args[0]) {
        (Value::Integer(base), Value::Integer(exponent)) if *exponent >= 0 => {
            let exponent = exponent_to_u32_checked(*exponent, line)?;
            base.checked_pow(exponent)
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow { line })
        },
        (left, right) => {
            let (a, b) = as_floats(left, right, line)?;
            Ok(Value::Float(a.powf(b)))
        },
    }
}

/// Remainder with the sign of the dividend, matching truncating division.
fn modulus(_: &mut Context,
           receiver: &mut Value,
           args: &[Value],
           line: usize)
           -> EvalResult<Value> {
    if let Value::Integer(0) = args[0] {
        return Err(RuntimeError::DivisionByZero { line });
    }
    arithmetic(receiver, &args[0], line, i64::checked_rem, |a, b| a % b)
}

fn negate(_: &mut Context, receiver: &mut Value, _: &[Value], line: usize) -> EvalResult<Value> {
    match receiver {
        Value::Integer(n) => n.checked_neg()
                              .map(Value::Integer)
                              .ok_or(RuntimeError::Overflow { line }),
        Value::Float(r) => Ok(Value::Float(-*r)),
        other => Err(RuntimeError::UnsupportedOperand { operator: "-".to_string(),
                                                       found: other.type_tag(),
                                                       line }),
    }
}

/// `-1`, `0` or `1`. Integers are compared exactly; a NaN operand compares
/// as equal.
fn compare(_: &mut Context,
           receiver: &mut Value,
           args: &[Value],
           line: usize)
           -> EvalResult<Value> {
    let ordering = match (&*receiver, &args[0]) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (left, right) => {
            let (a, b) = as_floats(left, right, line)?;
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        },
    };
    Ok(Value::Integer(match ordering {
                          Ordering::Less => -1,
                          Ordering::Equal => 0,
                          Ordering::Greater => 1,
                      }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::evaluator::core::Config;

    fn send(name: &str, receiver: Value, arg: Value) -> EvalResult<Value> {
        let mut context = Context::new(Config::default());
        let mut receiver = receiver;
        context.send(&mut receiver, name, &[arg], 1)
    }

    #[test]
    fn integer_arithmetic_stays_integer() {
        assert!(matches!(send("add", Value::Integer(2), Value::Integer(3)), Ok(Value::Integer(5))));
        assert!(matches!(send("divide", Value::Integer(7), Value::Integer(2)),
                         Ok(Value::Integer(3))));
        assert!(matches!(send("divide", Value::Integer(-7), Value::Integer(2)),
                         Ok(Value::Integer(-3))));
        assert!(matches!(send("modulus", Value::Integer(-7), Value::Integer(3)),
                         Ok(Value::Integer(-1))));
    }

    #[test]
    fn floats_are_contagious() {
        assert!(matches!(send("multiply", Value::Integer(2), Value::Float(1.5)),
                         Ok(Value::Float(r)) if r == 3.0));
        assert!(matches!(send("pow", Value::Integer(2), Value::Integer(-1)),
                         Ok(Value::Float(r)) if r == 0.5));
    }

    #[test]
    fn integer_faults_are_errors() {
        assert!(matches!(send("divide", Value::Integer(1), Value::Integer(0)),
                         Err(RuntimeError::DivisionByZero { line: 1 })));
        assert!(matches!(send("modulus", Value::Integer(1), Value::Integer(0)),
                         Err(RuntimeError::DivisionByZero { .. })));
        assert!(matches!(send("add", Value::Integer(i64::MAX), Value::Integer(1)),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(send("pow", Value::Integer(10), Value::Integer(40)),
                         Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn float_division_by_zero_is_infinite() {
        assert!(matches!(send("divide", Value::Float(1.0), Value::Integer(0)),
                         Ok(Value::Float(r)) if r.is_infinite()));
    }

    #[test]
    fn modulus_requires_integers() {
        assert!(matches!(send("modulus", Value::Float(5.0), Value::Integer(2)),
                         Err(RuntimeError::MissingMethod { receiver: TypeTag::Float, .. })));
        assert!(matches!(send("modulus", Value::Integer(5), Value::Float(2.0)),
                         Err(RuntimeError::ArgumentType { position: 1, .. })));
    }

    #[test]
    fn compare_orders_mixed_numbers() {
        assert!(matches!(send("compare", Value::Integer(1), Value::Float(1.5)),
                         Ok(Value::Integer(-1))));
        assert!(matches!(send("compare", Value::Float(2.0), Value::Integer(2)),
                         Ok(Value::Integer(0))));
    }

    #[test]
    fn arithmetic_rejects_non_numbers() {
        assert!(matches!(send("add", Value::Integer(1), Value::from("x")),
                         Err(RuntimeError::ArgumentType { expected: TypeTag::Number, .. })));
    }
}
