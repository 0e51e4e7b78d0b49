use rand::Rng;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::builtins::core::{as_float, as_int},
        value::core::Value,
    },
};

/// Dispatches the one-argument float functions. Ints coerce up to float.
pub(crate) fn unary_float(name: &str, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let x = as_float(&args[0], name, line)?;
    let result = match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "asin" => x.asin(),
        "acos" => x.acos(),
        "atan" => x.atan(),
        "sqrt" => x.sqrt(),
        "log" => x.ln(),
        "log10" => x.log10(),
        "exp" => x.exp(),
        _ => unreachable!("unknown unary float builtin"),
    };
    Ok(Value::Float(result))
}

/// `atan2(y, x)`.
pub(crate) fn atan2(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let y = as_float(&args[0], "atan2()", line)?;
    let x = as_float(&args[1], "atan2()", line)?;
    Ok(Value::Float(y.atan2(x)))
}

/// `pow(base, exp)`: integer exponentiation when both operands are ints and
/// the exponent is non-negative (overflow is an error), float otherwise.
pub(crate) fn pow(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    if let (Value::Int(base), Value::Int(exp)) = (&args[0], &args[1])
       && let Ok(exp) = u32::try_from(*exp)
    {
        return base.checked_pow(exp)
                   .map(Value::Int)
                   .ok_or(RuntimeError::Overflow { line });
    }
    let base = as_float(&args[0], "pow()", line)?;
    let exp = as_float(&args[1], "pow()", line)?;
    Ok(Value::Float(base.powf(exp)))
}

/// `abs(x)`: preserves the numeric tag.
pub(crate) fn abs(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Int(n) => n.checked_abs()
                          .map(Value::Int)
                          .ok_or(RuntimeError::Overflow { line }),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(RuntimeError::TypeError { details: format!("abs() requires a number, got {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `floor`, `ceil` and `round`: an int result. Integer inputs pass through.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn unary_round(name: &str, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    if let Value::Int(n) = &args[0] {
        return Ok(Value::Int(*n));
    }
    let x = as_float(&args[0], name, line)?;
    let rounded = match name {
        "floor" => x.floor(),
        "ceil" => x.ceil(),
        "round" => x.round(),
        _ => unreachable!("unknown rounding builtin"),
    };
    Ok(Value::Int(rounded as i32))
}

/// `min(a, b)` / `max(a, b)`: int when both operands are ints, float
/// otherwise.
pub(crate) fn min_max(name: &str, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    if let (Value::Int(a), Value::Int(b)) = (&args[0], &args[1]) {
        let result = if name == "min" { *a.min(b) } else { *a.max(b) };
        return Ok(Value::Int(result));
    }
    let a = as_float(&args[0], name, line)?;
    let b = as_float(&args[1], name, line)?;
    Ok(Value::Float(if name == "min" { a.min(b) } else { a.max(b) }))
}

/// `clamp(x, lo, hi)`: int when all three are ints, float otherwise.
pub(crate) fn clamp(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    if let (Value::Int(x), Value::Int(lo), Value::Int(hi)) = (&args[0], &args[1], &args[2]) {
        if lo > hi {
            return Err(RuntimeError::TypeError { details: "clamp() requires min <= max"
                                                              .to_string(),
                                                 line });
        }
        return Ok(Value::Int(*x.clamp(lo, hi)));
    }
    let x = as_float(&args[0], "clamp()", line)?;
    let lo = as_float(&args[1], "clamp()", line)?;
    let hi = as_float(&args[2], "clamp()", line)?;
    if lo > hi {
        return Err(RuntimeError::TypeError { details: "clamp() requires min <= max".to_string(),
                                             line });
    }
    Ok(Value::Float(x.clamp(lo, hi)))
}

/// `lerp(a, b, t)`: linear interpolation, always float.
pub(crate) fn lerp(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let a = as_float(&args[0], "lerp()", line)?;
    let b = as_float(&args[1], "lerp()", line)?;
    let t = as_float(&args[2], "lerp()", line)?;
    Ok(Value::Float((b - a).mul_add(t, a)))
}

/// `random()`: a float in `[0, 1)`. `random(max)`: an int in `[0, max)`.
/// `random(min, max)`: an int in `[min, max)`. Empty ranges yield their
/// lower bound.
pub(crate) fn random(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let mut rng = rand::thread_rng();
    match args {
        [] => Ok(Value::Float(rng.r#gen::<f32>())),
        [max] => {
            let max = as_int(max, "random()", line)?;
            if max <= 0 {
                return Ok(Value::Int(0));
            }
            Ok(Value::Int(rng.gen_range(0..max)))
        },
        [min, max] => {
            let min = as_int(min, "random()", line)?;
            let max = as_int(max, "random()", line)?;
            if min >= max {
                return Ok(Value::Int(min));
            }
            Ok(Value::Int(rng.gen_range(min..max)))
        },
        _ => unreachable!("arity checked by dispatch"),
    }
}
