use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::builtins::core::{as_array, as_int, as_str},
        value::core::{Value, lock},
    },
};

/// `pop(arr)`: removes the last element and returns its string form, or the
/// empty string when the array is already empty.
pub(crate) fn pop(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let elements = as_array(&args[0], "pop()", line)?;
    let popped = lock(elements).pop();
    Ok(popped.map_or_else(Value::empty, |value| Value::Str(value.to_string())))
}

/// `slice(arr, start, end?)`: a new array covering `[start, end)`, indices
/// clamped to the array. `end` defaults to the length.
pub(crate) fn slice(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let elements = as_array(&args[0], "slice()", line)?;
    let elements = lock(elements);
    let len = elements.len();

    let start = usize::try_from(as_int(&args[1], "slice()", line)?).unwrap_or(0).min(len);
    let end = match args.get(2) {
        Some(value) => usize::try_from(as_int(value, "slice()", line)?).unwrap_or(0).min(len),
        None => len,
    };

    let copied: Vec<Value> = if start < end {
        elements[start..end].to_vec()
    } else {
        Vec::new()
    };
    Ok(copied.into())
}

/// `reverse(arr)`: a new array with the elements in reverse order.
pub(crate) fn reverse(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let elements = as_array(&args[0], "reverse()", line)?;
    let reversed: Vec<Value> = lock(elements).iter().rev().cloned().collect();
    Ok(reversed.into())
}

/// `join(arr, sep)`: the elements' string forms joined by `sep`.
pub(crate) fn join(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let elements = as_array(&args[0], "join()", line)?;
    let sep = as_str(&args[1], "join()", line)?;

    let joined = lock(elements).iter()
                               .map(ToString::to_string)
                               .collect::<Vec<_>>()
                               .join(sep);
    Ok(Value::Str(joined))
}

/// `sort(arr)`: a new array sorted by string form, ascending.
pub(crate) fn sort(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let elements = as_array(&args[0], "sort()", line)?;
    let mut sorted: Vec<Value> = lock(elements).clone();
    sorted.sort_by_key(ToString::to_string);
    Ok(sorted.into())
}

/// `find(arr, v)`: the index of the first element whose string form equals
/// `v`'s, or −1.
pub(crate) fn find(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let elements = as_array(&args[0], "find()", line)?;
    let needle = args[1].to_string();

    let index = lock(elements).iter()
                              .position(|element| element.to_string() == needle)
                              .map_or(-1, |i| i32::try_from(i).unwrap_or(-1));
    Ok(Value::Int(index))
}

/// `includes(arr, v)`: whether some element's string form equals `v`'s.
pub(crate) fn includes(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let elements = as_array(&args[0], "includes()", line)?;
    let needle = args[1].to_string();

    let found = lock(elements).iter().any(|element| element.to_string() == needle);
    Ok(Value::Bool(found))
}
