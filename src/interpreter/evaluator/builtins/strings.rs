use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::builtins::core::{as_int, as_str},
        value::core::{Value, lock},
    },
};

/// `len(x)`: the length of an array, or the character count of a string.
pub(crate) fn len(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Array(elements) => {
            let count = i32::try_from(lock(elements).len()).unwrap_or(i32::MAX);
            Ok(Value::Int(count))
        },
        Value::Str(s) => {
            let count = i32::try_from(s.chars().count()).unwrap_or(i32::MAX);
            Ok(Value::Int(count))
        },
        other => Err(RuntimeError::TypeError { details: format!("len() requires an array or \
                                                                 string, got {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `substr(s, start, length)`: a character-based substring. An out-of-range
/// start yields the empty string; the length is clipped to the end.
pub(crate) fn substr(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "substr()", line)?;
    let start = as_int(&args[1], "substr()", line)?;
    let length = as_int(&args[2], "substr()", line)?;

    let count = s.chars().count();
    let Ok(start) = usize::try_from(start) else {
        return Ok(Value::empty());
    };
    if start >= count || length < 0 {
        return Ok(Value::empty());
    }
    let taken: String = s.chars().skip(start).take(length.unsigned_abs() as usize).collect();
    Ok(Value::Str(taken))
}

/// `toUpper(s)`: ASCII uppercase.
pub(crate) fn to_upper(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "toUpper()", line)?;
    Ok(Value::Str(s.to_ascii_uppercase()))
}

/// `toLower(s)`: ASCII lowercase.
pub(crate) fn to_lower(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "toLower()", line)?;
    Ok(Value::Str(s.to_ascii_lowercase()))
}

/// `indexOf(s, sub)`: the character position of the first occurrence of
/// `sub`, or −1.
pub(crate) fn index_of(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "indexOf()", line)?;
    let sub = as_str(&args[1], "indexOf()", line)?;

    let position = s.find(sub)
                    .map_or(-1, |byte| i32::try_from(s[..byte].chars().count()).unwrap_or(-1));
    Ok(Value::Int(position))
}

/// `contains(s, sub)`: substring test.
pub(crate) fn contains(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "contains()", line)?;
    let sub = as_str(&args[1], "contains()", line)?;
    Ok(Value::Bool(s.contains(sub)))
}

/// `startsWith(s, prefix)`.
pub(crate) fn starts_with(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "startsWith()", line)?;
    let prefix = as_str(&args[1], "startsWith()", line)?;
    Ok(Value::Bool(s.starts_with(prefix)))
}

/// `endsWith(s, suffix)`.
pub(crate) fn ends_with(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "endsWith()", line)?;
    let suffix = as_str(&args[1], "endsWith()", line)?;
    Ok(Value::Bool(s.ends_with(suffix)))
}

/// `trim(s)`: strips leading and trailing whitespace.
pub(crate) fn trim(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "trim()", line)?;
    Ok(Value::Str(s.trim().to_string()))
}

/// `repeat(s, n)`: `n` copies of `s`; non-positive counts yield the empty
/// string.
pub(crate) fn repeat(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "repeat()", line)?;
    let n = as_int(&args[1], "repeat()", line)?;
    let n = usize::try_from(n).unwrap_or(0);
    Ok(Value::Str(s.repeat(n)))
}

/// `replace(s, from, to)`: replaces every occurrence.
pub(crate) fn replace(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "replace()", line)?;
    let from = as_str(&args[1], "replace()", line)?;
    let to = as_str(&args[2], "replace()", line)?;
    Ok(Value::Str(s.replace(from, to)))
}

/// `split(s, sep)`: an array of the separated pieces. An empty separator
/// splits into individual characters.
pub(crate) fn split(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "split()", line)?;
    let sep = as_str(&args[1], "split()", line)?;

    let pieces: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::Str(c.to_string())).collect()
    } else {
        s.split(sep).map(|piece| Value::Str(piece.to_string())).collect()
    };
    Ok(pieces.into())
}

/// `charAt(s, i)`: the character at position `i` as a one-character string,
/// or the empty string out of range.
pub(crate) fn char_at(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "charAt()", line)?;
    let i = as_int(&args[1], "charAt()", line)?;

    let c = usize::try_from(i).ok().and_then(|i| s.chars().nth(i));
    Ok(c.map_or_else(Value::empty, |c| Value::Str(c.to_string())))
}

/// `charCodeAt(s, i)`: the code point at position `i`, or −1 out of range.
pub(crate) fn char_code_at(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let s = as_str(&args[0], "charCodeAt()", line)?;
    let i = as_int(&args[1], "charCodeAt()", line)?;

    let code = usize::try_from(i).ok()
                                 .and_then(|i| s.chars().nth(i))
                                 .map_or(-1, |c| i32::try_from(u32::from(c)).unwrap_or(-1));
    Ok(Value::Int(code))
}
