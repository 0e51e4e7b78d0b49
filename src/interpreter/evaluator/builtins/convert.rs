use crate::{
    error::RuntimeError,
    interpreter::value::core::Value,
};

/// `toString(v)`: the value's canonical string form.
pub(crate) fn to_string(args: &[Value], _line: usize) -> Result<Value, RuntimeError> {
    Ok(Value::Str(args[0].to_string()))
}

/// `toInt(v)`: integer conversion. Floats truncate toward zero, strings are
/// parsed (falling back through a float parse), booleans map to 1/0.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn to_int(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(x) => Ok(Value::Int(*x as i32)),
        Value::Bool(b) => Ok(Value::Int(i32::from(*b))),
        Value::Str(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<i32>() {
                Ok(Value::Int(n))
            } else if let Ok(x) = trimmed.parse::<f32>() {
                Ok(Value::Int(x as i32))
            } else {
                Ok(Value::Int(0))
            }
        },
        other => Err(RuntimeError::TypeError { details: format!("toInt() requires a scalar, got \
                                                                 {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `toFloat(v)`: float conversion. Unparseable strings yield 0.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn to_float(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Int(n) => Ok(Value::Float(*n as f32)),
        Value::Bool(b) => Ok(Value::Float(f32::from(u8::from(*b)))),
        Value::Str(s) => Ok(Value::Float(s.trim().parse().unwrap_or(0.0))),
        other => Err(RuntimeError::TypeError { details: format!("toFloat() requires a scalar, \
                                                                 got {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `toBool(v)`: the value's truthiness.
pub(crate) fn to_bool(args: &[Value], _line: usize) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(args[0].is_truthy()))
}
