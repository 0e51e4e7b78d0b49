//! The counter-loop accelerator.
//!
//! Before interpreting a `while` or `for` loop the evaluator offers it to
//! this pattern matcher: a condition of the form `i < N` (or `N > i`) with a
//! body consisting only of constant increments `x = x + k`. On a match the
//! final variable values are computed in closed form and written back to the
//! environment; on any mismatch the caller interprets the loop normally.
//! Correctness never depends on this path.

use std::collections::HashMap;

use crate::{
    ast::{BinaryOperator, Block, Expr, Stmt},
    error::RuntimeError,
    interpreter::{evaluator::core::Interpreter, value::core::Value},
};

/// Tries to finish a `while` loop in closed form.
///
/// Requirements: the condition is a counter comparison, every body statement
/// is a constant increment, the counter itself is incremented by a positive
/// step, and every incremented variable currently holds an `Int`. Returns
/// `true` when the loop was fully handled.
///
/// # Errors
/// Propagates type-gate failures from the final writes.
pub fn try_while(interp: &mut Interpreter,
                 condition: &Expr,
                 body: &Block)
                 -> Result<bool, RuntimeError> {
    let Some((counter, limit)) = match_counter_condition(condition) else {
        return Ok(false);
    };
    let Some(increments) = collect_increments(&body.statements) else {
        return Ok(false);
    };
    let Some(&step) = increments.get(counter) else {
        return Ok(false);
    };
    if step <= 0 {
        return Ok(false);
    }

    apply_closed_form(interp, counter, limit, step, &increments, condition.line_number())
}

/// Tries to finish a `for` loop in closed form. The init statement has
/// already executed in the loop scope.
///
/// Requirements: the init declared the counter as a plain `int`, the
/// condition compares that counter, the update is a positive constant
/// increment of it, and the body consists only of constant increments of
/// *other* variables (all currently `Int`).
///
/// # Errors
/// Propagates type-gate failures from the final writes.
pub fn try_for(interp: &mut Interpreter,
               init: Option<&Stmt>,
               condition: &Expr,
               update: &Expr,
               body: &Block)
               -> Result<bool, RuntimeError> {
    let Some(Stmt::VarDecl { name: counter,
                             type_spec,
                             init: Some(_),
                             .. }) = init
    else {
        return Ok(false);
    };
    if type_spec != "int" {
        return Ok(false);
    }
    let Some((cond_var, limit)) = match_counter_condition(condition) else {
        return Ok(false);
    };
    if cond_var != counter {
        return Ok(false);
    }
    let Some((update_var, step)) = match_increment_expr(update) else {
        return Ok(false);
    };
    if update_var != counter || step <= 0 {
        return Ok(false);
    }

    let Some(mut increments) = collect_increments(&body.statements) else {
        return Ok(false);
    };
    // A body that writes the counter itself would interleave with the update;
    // leave that shape to the interpreter.
    if increments.contains_key(counter) {
        return Ok(false);
    }
    increments.insert(counter.clone(), step);

    apply_closed_form(interp, counter, limit, step, &increments, condition.line_number())
}

/// Computes and stores the final values. `increments` maps each variable to
/// its per-iteration step, including the counter.
fn apply_closed_form(interp: &mut Interpreter,
                     counter: &str,
                     limit: i64,
                     step: i64,
                     increments: &HashMap<String, i64>,
                     line: usize)
                     -> Result<bool, RuntimeError> {
    let mut current = HashMap::new();
    for name in increments.keys() {
        match interp.env.get(name).map(|var| &var.value) {
            Some(Value::Int(n)) => {
                current.insert(name.clone(), i64::from(*n));
            },
            _ => return Ok(false),
        }
    }

    let start = current[counter];
    if start >= limit {
        // Zero iterations; the loop is done before it begins.
        return Ok(true);
    }
    let Some(iterations) = limit.checked_sub(start)
                                .and_then(|span| span.checked_add(step - 1))
                                .map(|span| span / step)
    else {
        return Ok(false);
    };

    for (name, &k) in increments {
        let Some(finished) = k.checked_mul(iterations)
                              .and_then(|total| current[name].checked_add(total))
        else {
            return Ok(false);
        };
        let Ok(finished) = i32::try_from(finished) else {
            // Out of range: interpret normally so overflow surfaces at the
            // exact iteration it occurs.
            return Ok(false);
        };
        interp.env.set(name, Value::Int(finished), &interp.type_aliases, line)?;
    }

    Ok(true)
}

/// Matches `i < N` or `N > i`, yielding the counter name and the limit.
fn match_counter_condition(condition: &Expr) -> Option<(&str, i64)> {
    let Expr::Binary { left, op, right, .. } = condition else {
        return None;
    };
    match (left.as_ref(), op, right.as_ref()) {
        (Expr::Ident { name, .. }, BinaryOperator::Less, Expr::IntLit { value, .. })
        | (Expr::IntLit { value, .. }, BinaryOperator::Greater, Expr::Ident { name, .. }) => {
            Some((name, *value))
        },
        _ => None,
    }
}

/// Matches the statement form of a constant increment: `x = x + k;`.
fn match_increment(stmt: &Stmt) -> Option<(&str, i64)> {
    let Stmt::Expression { expr, .. } = stmt else {
        return None;
    };
    match_increment_expr(expr)
}

/// Matches the expression form of a constant increment: `x = x + k`.
fn match_increment_expr(expr: &Expr) -> Option<(&str, i64)> {
    let Expr::Assign { name, value, .. } = expr else {
        return None;
    };
    let Expr::Binary { left,
                       op: BinaryOperator::Add,
                       right,
                       .. } = value.as_ref()
    else {
        return None;
    };
    match (left.as_ref(), right.as_ref()) {
        (Expr::Ident { name: read, .. }, Expr::IntLit { value, .. }) if read == name => {
            Some((name, *value))
        },
        _ => None,
    }
}

/// Requires every statement to be a constant increment; steps of repeated
/// targets accumulate. Returns `None` when any statement has another shape.
fn collect_increments(statements: &[Stmt]) -> Option<HashMap<String, i64>> {
    let mut increments = HashMap::new();
    for stmt in statements {
        let (name, k) = match_increment(stmt)?;
        *increments.entry(name.to_string()).or_insert(0) += k;
    }
    Some(increments)
}
