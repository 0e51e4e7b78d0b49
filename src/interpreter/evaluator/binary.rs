use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::Interpreter, value::core::Value},
};

impl Interpreter {
    /// Applies a binary operator to two evaluated operands.
    ///
    /// Matching integer operands use integer arithmetic (`/` truncates, `%`
    /// is the remainder) with overflow and zero-divisor checks; matching
    /// float operands use floating arithmetic. Comparison operators are
    /// defined on matching numeric tags only. `+` on any other combination
    /// concatenates the operands' string forms, and `==`/`!=` fall back to
    /// comparing string forms, so `1 == "1"` holds.
    ///
    /// `&&` and `||` combine the truthiness of both operands; both sides have
    /// already been evaluated by the caller (no short-circuit).
    ///
    /// # Errors
    /// - [`RuntimeError::Overflow`] and [`RuntimeError::DivisionByZero`] from
    ///   integer arithmetic.
    /// - [`RuntimeError::TypeError`] when the operator is undefined for the
    ///   operand combination.
    pub(crate) fn apply_binary(op: BinaryOperator,
                               left: &Value,
                               right: &Value,
                               line: usize)
                               -> Result<Value, RuntimeError> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub,
        };

        // Logical operators work on truthiness of any tags.
        match op {
            And => return Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
            Or => return Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
            _ => {},
        }

        if let (Value::Int(l), Value::Int(r)) = (left, right) {
            let (l, r) = (*l, *r);
            return match op {
                Add => l.checked_add(r)
                        .map(Value::Int)
                        .ok_or(RuntimeError::Overflow { line }),
                Sub => l.checked_sub(r)
                        .map(Value::Int)
                        .ok_or(RuntimeError::Overflow { line }),
                Mul => l.checked_mul(r)
                        .map(Value::Int)
                        .ok_or(RuntimeError::Overflow { line }),
                Div => {
                    if r == 0 {
                        Err(RuntimeError::DivisionByZero { line })
                    } else {
                        l.checked_div(r)
                         .map(Value::Int)
                         .ok_or(RuntimeError::Overflow { line })
                    }
                },
                Mod => {
                    if r == 0 {
                        Err(RuntimeError::DivisionByZero { line })
                    } else {
                        l.checked_rem(r)
                         .map(Value::Int)
                         .ok_or(RuntimeError::Overflow { line })
                    }
                },
                Less => Ok(Value::Bool(l < r)),
                Greater => Ok(Value::Bool(l > r)),
                LessEqual => Ok(Value::Bool(l <= r)),
                GreaterEqual => Ok(Value::Bool(l >= r)),
                Equal => Ok(Value::Bool(l == r)),
                NotEqual => Ok(Value::Bool(l != r)),
                And | Or => unreachable!("handled above"),
            };
        }

        if let (Value::Float(l), Value::Float(r)) = (left, right) {
            let (l, r) = (*l, *r);
            return match op {
                Add => Ok(Value::Float(l + r)),
                Sub => Ok(Value::Float(l - r)),
                Mul => Ok(Value::Float(l * r)),
                Div => Ok(Value::Float(l / r)),
                Mod => Ok(Value::Float(l % r)),
                Less => Ok(Value::Bool(l < r)),
                Greater => Ok(Value::Bool(l > r)),
                LessEqual => Ok(Value::Bool(l <= r)),
                GreaterEqual => Ok(Value::Bool(l >= r)),
                Equal => Ok(Value::Bool(l == r)),
                NotEqual => Ok(Value::Bool(l != r)),
                And | Or => unreachable!("handled above"),
            };
        }

        match op {
            Add => Ok(Value::Str(format!("{left}{right}"))),
            Equal => Ok(Value::Bool(left.to_string() == right.to_string())),
            NotEqual => Ok(Value::Bool(left.to_string() != right.to_string())),
            _ => Err(RuntimeError::TypeError { details: format!("cannot use {op} on {} and {}",
                                                                left.type_name(),
                                                                right.type_name()),
                                               line }),
        }
    }
}
