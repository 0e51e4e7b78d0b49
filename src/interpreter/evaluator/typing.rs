use std::collections::HashMap;

use crate::interpreter::value::core::{Value, lock};

/// Alias chains longer than this are treated as non-matching instead of
/// recursing forever.
const MAX_ALIAS_DEPTH: usize = 64;

/// Returns whether a declared spec participates in the write-time gate.
///
/// Stores consult the matcher only for "complex" specs: unions, array types,
/// object-shape types and `any`. Plain nominal types are admitted
/// unconditionally on `set` for speed (initialization always checks). This
/// skew is part of the observable behavior and must be preserved.
#[must_use]
pub fn is_complex_spec(spec: &str) -> bool {
    spec == "any" || spec.contains(['|', '[', '{'])
}

/// Tests whether `value` inhabits the canonical type spec `spec`.
///
/// Resolution order: user-defined alias, array/tuple type, object-shape type,
/// top-level union, literal types, `any`, base tags, function specs. Unknown
/// specs match nothing.
///
/// The alias registry is passed explicitly; the matcher holds no state of its
/// own.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
///
/// use axo::interpreter::{evaluator::typing::matches_type, value::core::Value};
///
/// let aliases = HashMap::new();
/// assert!(matches_type(&Value::Int(3), "int", &aliases));
/// assert!(matches_type(&Value::Int(3), "int|string", &aliases));
/// assert!(!matches_type(&Value::Bool(true), "int|string", &aliases));
/// assert!(matches_type(&Value::Str("red".into()), "\"red\"|\"blue\"", &aliases));
/// ```
#[must_use]
pub fn matches_type(value: &Value, spec: &str, aliases: &HashMap<String, String>) -> bool {
    matches_with_depth(value, spec, aliases, 0)
}

fn matches_with_depth(value: &Value,
                      spec: &str,
                      aliases: &HashMap<String, String>,
                      depth: usize)
                      -> bool {
    if depth > MAX_ALIAS_DEPTH {
        return false;
    }
    let t = spec.trim();
    if t.is_empty() {
        return false;
    }

    // User-defined aliases resolve first, so an alias can shadow nothing and
    // a union over aliases works by recursion.
    if let Some(resolved) = aliases.get(t) {
        return matches_with_depth(value, resolved, aliases, depth + 1);
    }

    // Array type: [inner], or [T1,T2,...] for a fixed-length tuple.
    if is_delimited(t, '[') {
        let Value::Array(elements) = value else {
            return false;
        };
        let inner = &t[1..t.len() - 1];
        let elements = lock(elements);
        let slots = split_top_level(inner, ',');
        if slots.len() > 1 {
            return elements.len() == slots.len()
                   && elements.iter()
                              .zip(&slots)
                              .all(|(elem, slot)| {
                                  matches_with_depth(elem, slot, aliases, depth + 1)
                              });
        }
        return elements.iter()
                       .all(|elem| matches_with_depth(elem, inner, aliases, depth + 1));
    }

    // Object-shape type: {f1:T1,f2:T2}. Listed fields must be present and
    // match; extra fields are ignored. `{}` matches any object.
    if is_delimited(t, '{') {
        let Value::Object(fields) = value else {
            return false;
        };
        let inner = &t[1..t.len() - 1];
        if inner.is_empty() {
            return true;
        }
        let fields = lock(fields);
        return split_top_level(inner, ',').iter().all(|part| {
            let Some((name, field_type)) = part.split_once(':') else {
                return false;
            };
            fields.get(name.trim())
                  .is_some_and(|field| {
                      matches_with_depth(field, field_type, aliases, depth + 1)
                  })
        });
    }

    // Union: split on top-level '|' (a '|' inside brackets or braces belongs
    // to a nested spec) and accept any branch.
    let branches = split_top_level(t, '|');
    if branches.len() > 1 {
        return branches.iter()
                       .any(|branch| matches_with_depth(value, branch, aliases, depth + 1));
    }

    // String literal type: "specific".
    if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
        let Value::Str(s) = value else {
            return false;
        };
        return s == &t[1..t.len() - 1];
    }

    // Integer literal type: a bare number.
    if t.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '-')
       && let Ok(expected) = t.parse::<i32>()
    {
        return matches!(value, Value::Int(n) if *n == expected);
    }

    // Boolean literal types.
    if t == "true" {
        return matches!(value, Value::Bool(true));
    }
    if t == "false" {
        return matches!(value, Value::Bool(false));
    }

    if t == "any" {
        return true;
    }

    // Base tags.
    match t {
        "int" => return matches!(value, Value::Int(_)),
        "float" => return matches!(value, Value::Float(_)),
        "string" => return matches!(value, Value::Str(_)),
        "bool" => return matches!(value, Value::Bool(_)),
        "object" => return matches!(value, Value::Object(_)),
        _ => {},
    }

    // Function specs match any function reference; arity and return type are
    // not checked structurally.
    if t == "func" || t.starts_with('(') {
        return value.is_function();
    }

    false
}

/// When `spec` is an array type `[inner]`, returns the element spec `inner`.
/// Used by `push` and indexed stores to gate elements on the declared type.
#[must_use]
pub fn element_spec(spec: &str) -> Option<&str> {
    (spec.len() >= 2 && is_delimited(spec, '[')).then(|| &spec[1..spec.len() - 1])
}

/// Returns whether `t` is a single bracketed span: it starts with `open`,
/// and the delimiter that matches that first `open` is the final character.
/// This keeps `[int]|[string]` out of the array-type branch.
fn is_delimited(t: &str, open: char) -> bool {
    if !t.starts_with(open) {
        return false;
    }
    let mut depth = 0_usize;
    let mut in_string = false;
    for (index, c) in t.char_indices() {
        if in_string {
            if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return index == t.len() - 1;
                }
            },
            _ => {},
        }
    }
    false
}

/// Splits `t` on `separator`, honoring bracket/brace/paren nesting and string
/// literals. A naive split would cut `{x:int,y:int}|[int]` and
/// `[{a:int},{b:int}]` in the wrong places.
fn split_top_level(t: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut start = 0;

    for (index, c) in t.char_indices() {
        if in_string {
            if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth = depth.saturating_sub(1),
            _ if c == separator && depth == 0 => {
                parts.push(t[start..index].trim());
                start = index + c.len_utf8();
            },
            _ => {},
        }
    }
    parts.push(t[start..].trim());
    parts
}
