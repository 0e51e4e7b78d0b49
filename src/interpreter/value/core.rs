use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::ast::{FunctionDecl, FunctionLit};

/// Represents a runtime value in the interpreter.
///
/// Scalars are held by value. Arrays and objects are shared by reference:
/// every binding that holds the same collection sees mutations made through
/// any other binding. Function values reference their parsed declaration, so
/// calling through a variable reaches the same body as calling by name.
///
/// There is no null variant. The empty string, zero, `false`, the empty array
/// and the empty object are the "absent" values, and the empty string is what
/// a call without a `return` yields.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 32-bit signed integer.
    Int(i32),
    /// A 32-bit floating-point number.
    Float(f32),
    /// An owned string.
    Str(String),
    /// A boolean value.
    Bool(bool),
    /// A shared mutable sequence of values.
    Array(Arc<Mutex<Vec<Self>>>),
    /// A shared mutable map from field name to value.
    Object(Arc<Mutex<HashMap<String, Self>>>),
    /// A reference to a named function declaration.
    Func(Arc<FunctionDecl>),
    /// A reference to an anonymous function literal.
    Lambda(Arc<FunctionLit>),
}

/// Locks a shared collection, recovering the data if a worker panicked while
/// holding the guard.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Arc::new(Mutex::new(v)))
    }
}

impl From<HashMap<String, Self>> for Value {
    fn from(v: HashMap<String, Self>) -> Self {
        Self::Object(Arc::new(Mutex::new(v)))
    }
}

impl Value {
    /// The empty-string value produced by calls without a `return`.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Str(String::new())
    }

    /// Converts the value to a boolean for conditions and logical operators.
    ///
    /// `Bool` is itself; numbers are truthy when non-zero; strings, arrays
    /// and objects when non-empty; function references always.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Array(elements) => !lock(elements).is_empty(),
            Self::Object(fields) => !lock(fields).is_empty(),
            Self::Func(_) | Self::Lambda(_) => true,
        }
    }

    /// The runtime tag name, as reported by `typeof` when no declared type
    /// applies.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Func(_) | Self::Lambda(_) => "function",
        }
    }

    /// Returns `true` if the value is an [`Value::Array`].
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is a function reference of either kind.
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Func(..) | Self::Lambda(..))
    }

    /// Copies the value, duplicating arrays and objects recursively.
    ///
    /// This is the snapshot operation used when dispatching a program onto a
    /// worker task: the worker must not be able to mutate collections the
    /// caller still holds.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        match self {
            Self::Array(elements) => {
                let copied = lock(elements).iter().map(Self::deep_clone).collect::<Vec<_>>();
                copied.into()
            },
            Self::Object(fields) => {
                let copied = lock(fields).iter()
                                         .map(|(k, v)| (k.clone(), v.deep_clone()))
                                         .collect::<HashMap<_, _>>();
                copied.into()
            },
            _ => self.clone(),
        }
    }
}

impl std::fmt::Display for Value {
    /// Renders the canonical string form used by `print`, `==`, `switch` and
    /// string concatenation. Object fields print in sorted key order so the
    /// form is stable.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Array(elements) => {
                write!(f, "[")?;
                for (index, value) in lock(elements).iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            },
            Self::Object(fields) => {
                let fields = lock(fields);
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort();

                write!(f, "{{")?;
                for (index, key) in keys.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {}", fields[*key])?;
                }
                write!(f, "}}")
            },
            Self::Func(_) | Self::Lambda(_) => write!(f, "[function]"),
        }
    }
}

/// A variable binding: the current value, the declared type spec from the
/// source, and whether the declaration used `const`.
///
/// The `const` flag is informational; the interpreter does not presently
/// reject writes through const bindings.
#[derive(Debug, Clone)]
pub struct Variable {
    /// The current value.
    pub value:         Value,
    /// The declared type, as a canonical type-spec string. Empty for
    /// bindings that were never annotated (e.g. catch variables).
    pub declared_type: String,
    /// Whether the declaration used `const`.
    pub is_const:      bool,
}

impl Variable {
    /// Creates a binding with a declared type.
    #[must_use]
    pub fn new(value: Value, declared_type: impl Into<String>, is_const: bool) -> Self {
        Self { value,
               declared_type: declared_type.into(),
               is_const }
    }
}
