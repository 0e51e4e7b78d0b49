use std::collections::HashMap;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::builtins::core::{as_object, as_str},
        value::core::{Value, lock},
    },
};

/// `keys(obj)`: the field names as an array of strings, in sorted order.
pub(crate) fn keys(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let fields = as_object(&args[0], "keys()", line)?;
    let mut names: Vec<String> = lock(fields).keys().cloned().collect();
    names.sort();

    let values: Vec<Value> = names.into_iter().map(Value::Str).collect();
    Ok(values.into())
}

/// `values(obj)`: the field values as an array, in sorted key order.
pub(crate) fn values(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let fields = as_object(&args[0], "values()", line)?;
    let fields = lock(fields);
    let mut names: Vec<&String> = fields.keys().collect();
    names.sort();

    let collected: Vec<Value> = names.into_iter().map(|name| fields[name].clone()).collect();
    Ok(collected.into())
}

/// `hasKey(obj, key)`.
pub(crate) fn has_key(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let fields = as_object(&args[0], "hasKey()", line)?;
    let key = as_str(&args[1], "hasKey()", line)?;
    Ok(Value::Bool(lock(fields).contains_key(key)))
}

/// `merge(a, b)`: a new object holding `a`'s fields with `b`'s merged over
/// them. Neither input is mutated.
pub(crate) fn merge(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let a = as_object(&args[0], "merge()", line)?;
    let b = as_object(&args[1], "merge()", line)?;

    let mut merged: HashMap<String, Value> = lock(a).clone();
    for (key, value) in lock(b).iter() {
        merged.insert(key.clone(), value.clone());
    }
    Ok(merged.into())
}

/// `clone(v)`: a shallow copy. Arrays and objects get a fresh top-level
/// collection whose elements still share nested collections; scalars are
/// returned as-is.
pub(crate) fn clone(args: &[Value], _line: usize) -> Result<Value, RuntimeError> {
    let copied = match &args[0] {
        Value::Array(elements) => lock(elements).clone().into(),
        Value::Object(fields) => lock(fields).clone().into(),
        other => other.clone(),
    };
    Ok(copied)
}
