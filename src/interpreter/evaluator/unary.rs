use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Outcome, propagate},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates `typeof operand`.
    ///
    /// When the operand is an identifier, the declared type wins where it
    /// still describes the runtime value: a registered alias name is returned
    /// as written, a built-in tag is returned when it matches the value's
    /// tag, and an array spec is returned when the value is an array.
    /// Everything else falls back to the runtime tag name
    /// (`int`, `float`, `string`, `bool`, `array`, `object`, `function`).
    pub(crate) fn eval_typeof(&mut self, operand: &Expr, line: usize) -> EvalResult<Value> {
        if let Expr::Ident { name, .. } = operand {
            let Some(var) = self.env.get(name) else {
                return Err(RuntimeError::UndefinedVariable { name: name.clone(),
                                                             line });
            };
            let declared = var.declared_type.clone();
            let value = var.value.clone();

            if !declared.is_empty() {
                if self.type_aliases.contains_key(&declared) {
                    return Ok(Outcome::Value(Value::Str(declared)));
                }

                let declared_still_applies = match declared.as_str() {
                    "int" => matches!(value, Value::Int(_)),
                    "float" => matches!(value, Value::Float(_)),
                    "string" => matches!(value, Value::Str(_)),
                    "bool" => matches!(value, Value::Bool(_)),
                    "object" => matches!(value, Value::Object(_)),
                    "function" => value.is_function(),
                    spec => spec.starts_with('[') && spec.ends_with(']') && value.is_array(),
                };
                if declared_still_applies {
                    return Ok(Outcome::Value(Value::Str(declared)));
                }
            }

            return Ok(Outcome::Value(Value::Str(value.type_name().to_string())));
        }

        let value = propagate!(self.eval_expr(operand));
        Ok(Outcome::Value(Value::Str(value.type_name().to_string())))
    }
}
