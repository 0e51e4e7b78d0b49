use crate::{
    ast::{Block, CaseClause, Expr, Stmt},
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter, Outcome, Signal, propagate},
            fastpath,
        },
        value::core::Variable,
    },
};

impl Interpreter {
    /// Executes an `if` statement: exactly one branch runs.
    pub(crate) fn exec_if(&mut self,
                          condition: &Expr,
                          then_block: &Block,
                          else_block: Option<&Block>)
                          -> EvalResult<()> {
        let cond = propagate!(self.eval_expr(condition));
        if cond.is_truthy() {
            self.exec_block(then_block)
        } else if let Some(else_block) = else_block {
            self.exec_block(else_block)
        } else {
            Ok(Outcome::Value(()))
        }
    }

    /// Executes a `while` loop.
    ///
    /// The counter-loop accelerator is consulted first; when it recognizes
    /// the shape it writes the final variable values directly and the loop is
    /// done. Otherwise the loop interprets normally, honoring `break`,
    /// `continue`, and propagating `return`/`throw`.
    pub(crate) fn exec_while(&mut self, condition: &Expr, body: &Block) -> EvalResult<()> {
        if fastpath::try_while(self, condition, body)? {
            return Ok(Outcome::Value(()));
        }

        loop {
            let cond = propagate!(self.eval_expr(condition));
            if !cond.is_truthy() {
                break;
            }
            match self.exec_block(body)? {
                Outcome::Value(()) | Outcome::Signal(Signal::Continue) => {},
                Outcome::Signal(Signal::Break) => break,
                Outcome::Signal(signal) => return Ok(Outcome::Signal(signal)),
            }
        }
        Ok(Outcome::Value(()))
    }

    /// Executes a `for` loop. One extra scope covers the init, condition,
    /// update and body; it is released on every exit path.
    pub(crate) fn exec_for(&mut self,
                           init: Option<&Stmt>,
                           condition: &Expr,
                           update: &Expr,
                           body: &Block)
                           -> EvalResult<()> {
        self.env.push_scope();
        let result = self.exec_for_inner(init, condition, update, body);
        self.env.pop_scope();
        result
    }

    fn exec_for_inner(&mut self,
                      init: Option<&Stmt>,
                      condition: &Expr,
                      update: &Expr,
                      body: &Block)
                      -> EvalResult<()> {
        if let Some(init) = init {
            propagate!(self.exec_stmt(init));
        }

        if fastpath::try_for(self, init, condition, update, body)? {
            return Ok(Outcome::Value(()));
        }

        loop {
            let cond = propagate!(self.eval_expr(condition));
            if !cond.is_truthy() {
                break;
            }
            match self.exec_block(body)? {
                // A `continue` still runs the update expression.
                Outcome::Value(()) | Outcome::Signal(Signal::Continue) => {},
                Outcome::Signal(Signal::Break) => break,
                Outcome::Signal(signal) => return Ok(Outcome::Signal(signal)),
            }
            propagate!(self.eval_expr(update));
        }
        Ok(Outcome::Value(()))
    }

    /// Executes a `switch` statement.
    ///
    /// The discriminant and each case value are compared by string form. On
    /// the first match execution falls through into subsequent clauses and
    /// the default until a `break` or the end of the switch. A `default`
    /// clause fires when reached with no prior match, or by fall-through.
    pub(crate) fn exec_switch(&mut self,
                              discriminant: &Expr,
                              cases: &[CaseClause])
                              -> EvalResult<()> {
        let disc = propagate!(self.eval_expr(discriminant)).to_string();

        let mut matched = false;
        for case in cases {
            if !matched {
                match &case.value {
                    None => matched = true,
                    Some(value_expr) => {
                        let value = propagate!(self.eval_expr(value_expr));
                        if value.to_string() == disc {
                            matched = true;
                        }
                    },
                }
            }
            if matched {
                match self.exec_statements(&case.statements)? {
                    Outcome::Value(()) => {},
                    Outcome::Signal(Signal::Break) => return Ok(Outcome::Value(())),
                    Outcome::Signal(signal) => return Ok(Outcome::Signal(signal)),
                }
            }
        }
        Ok(Outcome::Value(()))
    }

    /// Executes a `try` statement.
    ///
    /// Only thrown values are catchable: the catch variable (when named) is
    /// bound in a fresh scope around the catch block. The `finally` block
    /// runs exactly once on the normal, caught and re-raised paths before the
    /// statement's outcome is delivered; a signal raised inside `finally`
    /// replaces the pending outcome. A fatal runtime error is not caught
    /// here — it propagates immediately and the process terminates.
    pub(crate) fn exec_try(&mut self,
                           body: &Block,
                           catch_name: Option<&str>,
                           catch_block: Option<&Block>,
                           finally_block: Option<&Block>)
                           -> EvalResult<()> {
        let outcome = match self.exec_block(body)? {
            Outcome::Signal(Signal::Throw(thrown)) => {
                if let Some(catch_block) = catch_block {
                    self.env.push_scope();
                    if let Some(name) = catch_name {
                        self.env.define(name, Variable::new(thrown, "any", false));
                    }
                    let caught = self.exec_statements(&catch_block.statements);
                    self.env.pop_scope();
                    caught?
                } else {
                    Outcome::Signal(Signal::Throw(thrown))
                }
            },
            other => other,
        };

        if let Some(finally_block) = finally_block {
            match self.exec_block(finally_block)? {
                Outcome::Value(()) => {},
                Outcome::Signal(signal) => return Ok(Outcome::Signal(signal)),
            }
        }

        Ok(outcome)
    }
}
