use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter, Outcome, propagate},
            typing::{element_spec, matches_type},
        },
        value::core::{Value, lock},
    },
};

impl Interpreter {
    /// Evaluates `base[index]`.
    ///
    /// Arrays take an integer index with hard bounds checking. Objects take
    /// any index, converted to its string form; a missing key reads as the
    /// empty string. Strings take an integer index and yield a one-character
    /// string.
    pub(crate) fn eval_index(&mut self,
                             base: &Expr,
                             index: &Expr,
                             line: usize)
                             -> EvalResult<Value> {
        let base_value = propagate!(self.eval_expr(base));
        let index_value = propagate!(self.eval_expr(index));

        match base_value {
            Value::Array(elements) => {
                let elements = lock(&elements);
                let i = expect_index(&index_value, "array index", line)?;
                usize::try_from(i)
                    .ok()
                    .and_then(|i| elements.get(i))
                    .map(|element| Outcome::Value(element.clone()))
                    .ok_or(RuntimeError::IndexOutOfBounds { len:   elements.len(),
                                                            found: i64::from(i),
                                                            line })
            },
            Value::Object(fields) => {
                let key = index_value.to_string();
                let field = lock(&fields).get(&key).cloned().unwrap_or_else(Value::empty);
                Ok(Outcome::Value(field))
            },
            Value::Str(s) => {
                let i = expect_index(&index_value, "string index", line)?;
                usize::try_from(i)
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Outcome::Value(Value::Str(c.to_string())))
                    .ok_or(RuntimeError::IndexOutOfBounds { len:   s.chars().count(),
                                                            found: i64::from(i),
                                                            line })
            },
            other => Err(RuntimeError::TypeError { details: format!("cannot index into {}",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// Evaluates `base.name`. A missing field reads as the empty string.
    pub(crate) fn eval_field(&mut self, base: &Expr, name: &str, line: usize) -> EvalResult<Value> {
        let base_value = propagate!(self.eval_expr(base));

        match base_value {
            Value::Object(fields) => {
                let field = lock(&fields).get(name).cloned().unwrap_or_else(Value::empty);
                Ok(Outcome::Value(field))
            },
            other => Err(RuntimeError::TypeError { details: format!("field access requires an \
                                                                     object, got {}",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// Evaluates `base[index] = value`.
    ///
    /// Array stores are bounds-checked and, when the base is a variable
    /// declared with an array type, gated on the declared element type.
    /// Object stores insert under the index's string form. The assignment
    /// yields the stored value.
    pub(crate) fn eval_index_assign(&mut self,
                                    base: &Expr,
                                    index: &Expr,
                                    value: &Expr,
                                    line: usize)
                                    -> EvalResult<Value> {
        let base_value = propagate!(self.eval_expr(base));
        let index_value = propagate!(self.eval_expr(index));
        let stored = propagate!(self.eval_expr(value));

        match base_value {
            Value::Array(elements) => {
                self.check_element_type(base, &stored, line)?;
                let mut elements = lock(&elements);
                let i = expect_index(&index_value, "array index", line)?;
                let len = elements.len();
                let slot = usize::try_from(i).ok()
                                             .and_then(|i| elements.get_mut(i))
                                             .ok_or(RuntimeError::IndexOutOfBounds { len,
                                                                                     found:
                                                                                         i64::from(i),
                                                                                     line })?;
                *slot = stored.clone();
                Ok(Outcome::Value(stored))
            },
            Value::Object(fields) => {
                lock(&fields).insert(index_value.to_string(), stored.clone());
                Ok(Outcome::Value(stored))
            },
            other => {
                Err(RuntimeError::TypeError { details: format!("index assignment requires an \
                                                                array or object, got {}",
                                                               other.type_name()),
                                              line })
            },
        }
    }

    /// Evaluates `base.name = value`. The assignment yields the stored value.
    pub(crate) fn eval_field_assign(&mut self,
                                    base: &Expr,
                                    name: &str,
                                    value: &Expr,
                                    line: usize)
                                    -> EvalResult<Value> {
        let base_value = propagate!(self.eval_expr(base));
        let stored = propagate!(self.eval_expr(value));

        match base_value {
            Value::Object(fields) => {
                lock(&fields).insert(name.to_string(), stored.clone());
                Ok(Outcome::Value(stored))
            },
            other => Err(RuntimeError::TypeError { details: format!("field assignment requires \
                                                                     an object, got {}",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// When `base` names a variable declared with an array type, checks the
    /// value being stored against the declared element type.
    fn check_element_type(&self,
                          base: &Expr,
                          stored: &Value,
                          line: usize)
                          -> Result<(), RuntimeError> {
        let Expr::Ident { name, .. } = base else {
            return Ok(());
        };
        let Some(var) = self.env.get(name) else {
            return Ok(());
        };
        if let Some(inner) = element_spec(&var.declared_type)
           && !matches_type(stored, inner, &self.type_aliases)
        {
            return Err(RuntimeError::ElementTypeMismatch { name:     name.clone(),
                                                           declared: inner.to_string(),
                                                           line });
        }
        Ok(())
    }
}

/// Requires an integer index value.
fn expect_index(value: &Value, what: &str, line: usize) -> Result<i32, RuntimeError> {
    match value {
        Value::Int(i) => Ok(*i),
        other => Err(RuntimeError::TypeError { details: format!("{what} must be an integer, got \
                                                                 {}",
                                                                other.type_name()),
                                               line }),
    }
}
