use std::sync::{Arc, Mutex};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::builtins::{arrays, convert, io, math, objects, strings},
        value::core::Value,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the evaluated argument values and the call's source
/// line. Builtins cannot raise control-flow signals, only errors.
type BuiltinFn = fn(&[Value], usize) -> Result<Value, RuntimeError>;

/// Specifies the allowed number of arguments for a builtin.
#[derive(Clone, Copy)]
pub(crate) enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// Any arity listed in the slice.
    OneOf(&'static [usize]),
    /// Any number of arguments.
    Any,
}

impl Arity {
    /// Tests whether the given argument count satisfies this constraint.
    fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::OneOf(choices) => choices.contains(&n),
            Self::Any => true,
        }
    }
}

/// One row of the builtin table.
pub(crate) struct BuiltinDef {
    name:  &'static str,
    arity: Arity,
    func:  BuiltinFn,
}

/// Defines builtin functions by generating the static lookup table.
///
/// Each entry provides a name, an arity specification and a function pointer
/// implementing the builtin. Builtins are resolved by exact name before
/// programs and user functions.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
    };
}

builtin_functions! {
    "print"      => { arity: Arity::Any,            func: io::print },
    "len"        => { arity: Arity::Exact(1),       func: strings::len },
    "pop"        => { arity: Arity::Exact(1),       func: arrays::pop },
    "substr"     => { arity: Arity::Exact(3),       func: strings::substr },
    "toUpper"    => { arity: Arity::Exact(1),       func: strings::to_upper },
    "toLower"    => { arity: Arity::Exact(1),       func: strings::to_lower },
    "indexOf"    => { arity: Arity::Exact(2),       func: strings::index_of },
    "contains"   => { arity: Arity::Exact(2),       func: strings::contains },
    "startsWith" => { arity: Arity::Exact(2),       func: strings::starts_with },
    "endsWith"   => { arity: Arity::Exact(2),       func: strings::ends_with },
    "trim"       => { arity: Arity::Exact(1),       func: strings::trim },
    "repeat"     => { arity: Arity::Exact(2),       func: strings::repeat },
    "replace"    => { arity: Arity::Exact(3),       func: strings::replace },
    "split"      => { arity: Arity::Exact(2),       func: strings::split },
    "charAt"     => { arity: Arity::Exact(2),       func: strings::char_at },
    "charCodeAt" => { arity: Arity::Exact(2),       func: strings::char_code_at },
    "slice"      => { arity: Arity::OneOf(&[2, 3]), func: arrays::slice },
    "reverse"    => { arity: Arity::Exact(1),       func: arrays::reverse },
    "join"       => { arity: Arity::Exact(2),       func: arrays::join },
    "sort"       => { arity: Arity::Exact(1),       func: arrays::sort },
    "find"       => { arity: Arity::Exact(2),       func: arrays::find },
    "includes"   => { arity: Arity::Exact(2),       func: arrays::includes },
    "keys"       => { arity: Arity::Exact(1),       func: objects::keys },
    "values"     => { arity: Arity::Exact(1),       func: objects::values },
    "hasKey"     => { arity: Arity::Exact(2),       func: objects::has_key },
    "merge"      => { arity: Arity::Exact(2),       func: objects::merge },
    "clone"      => { arity: Arity::Exact(1),       func: objects::clone },
    "toString"   => { arity: Arity::Exact(1),       func: convert::to_string },
    "toInt"      => { arity: Arity::Exact(1),       func: convert::to_int },
    "toFloat"    => { arity: Arity::Exact(1),       func: convert::to_float },
    "toBool"     => { arity: Arity::Exact(1),       func: convert::to_bool },
    "millis"     => { arity: Arity::Exact(0),       func: io::millis },
    "sleep"      => { arity: Arity::Exact(1),       func: io::sleep },
    "read"       => { arity: Arity::Exact(1),       func: io::read },
    "write"      => { arity: Arity::Exact(2),       func: io::write },
    "copy"       => { arity: Arity::Exact(2),       func: io::copy },
    "readDir"    => { arity: Arity::Exact(1),       func: io::read_dir },
    "sin"        => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("sin", args, line) },
    "cos"        => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("cos", args, line) },
    "tan"        => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("tan", args, line) },
    "asin"       => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("asin", args, line) },
    "acos"       => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("acos", args, line) },
    "atan"       => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("atan", args, line) },
    "atan2"      => { arity: Arity::Exact(2),       func: math::atan2 },
    "sqrt"       => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("sqrt", args, line) },
    "pow"        => { arity: Arity::Exact(2),       func: math::pow },
    "log"        => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("log", args, line) },
    "log10"      => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("log10", args, line) },
    "exp"        => { arity: Arity::Exact(1),       func: |args, line| math::unary_float("exp", args, line) },
    "abs"        => { arity: Arity::Exact(1),       func: math::abs },
    "floor"      => { arity: Arity::Exact(1),       func: |args, line| math::unary_round("floor", args, line) },
    "ceil"       => { arity: Arity::Exact(1),       func: |args, line| math::unary_round("ceil", args, line) },
    "round"      => { arity: Arity::Exact(1),       func: |args, line| math::unary_round("round", args, line) },
    "min"        => { arity: Arity::Exact(2),       func: |args, line| math::min_max("min", args, line) },
    "max"        => { arity: Arity::Exact(2),       func: |args, line| math::min_max("max", args, line) },
    "clamp"      => { arity: Arity::Exact(3),       func: math::clamp },
    "lerp"       => { arity: Arity::Exact(3),       func: math::lerp },
    "random"     => { arity: Arity::OneOf(&[0, 1, 2]), func: math::random },
    "assert"     => { arity: Arity::Exact(2),       func: io::assert_fn },
    "error"      => { arity: Arity::Exact(1),       func: io::error_fn },
}

/// Finds the builtin registered under `name`.
pub(crate) fn lookup(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|builtin| builtin.name == name)
}

/// Dispatches a builtin call after checking its arity.
///
/// # Errors
/// - [`RuntimeError::ArgumentCountMismatch`] when the arity does not match.
/// - Whatever the handler itself raises.
pub(crate) fn dispatch(name: &str, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let Some(builtin) = lookup(name) else {
        return Err(RuntimeError::UndefinedFunction { name: name.to_string(),
                                                     line });
    };
    if !builtin.arity.check(args.len()) {
        return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                         line });
    }
    (builtin.func)(args, line)
}

/// Requires a string argument.
pub(crate) fn as_str<'a>(value: &'a Value,
                         what: &str,
                         line: usize)
                         -> Result<&'a str, RuntimeError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(RuntimeError::TypeError { details: format!("{what} requires a string, got \
                                                                 {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// Requires an integer argument.
pub(crate) fn as_int(value: &Value, what: &str, line: usize) -> Result<i32, RuntimeError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::TypeError { details: format!("{what} requires an int, got {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// Requires a numeric argument; ints coerce up to float.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn as_float(value: &Value, what: &str, line: usize) -> Result<f32, RuntimeError> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Int(n) => Ok(*n as f32),
        other => Err(RuntimeError::TypeError { details: format!("{what} requires a number, got \
                                                                 {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// Requires an array argument.
pub(crate) fn as_array<'a>(value: &'a Value,
                           what: &str,
                           line: usize)
                           -> Result<&'a Arc<Mutex<Vec<Value>>>, RuntimeError> {
    match value {
        Value::Array(elements) => Ok(elements),
        other => Err(RuntimeError::TypeError { details: format!("{what} requires an array, got \
                                                                 {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// Requires an object argument.
pub(crate) fn as_object<'a>(
    value: &'a Value,
    what: &str,
    line: usize)
    -> Result<&'a Arc<Mutex<std::collections::HashMap<String, Value>>>, RuntimeError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(RuntimeError::TypeError { details: format!("{what} requires an object, got \
                                                                 {}",
                                                                other.type_name()),
                                               line }),
    }
}
