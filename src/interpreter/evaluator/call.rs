use std::thread;

use crate::{
    ast::{Block, Expr, Param},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            builtins,
            core::{EvalResult, Interpreter, Outcome, Signal, propagate},
            typing::{element_spec, matches_type},
        },
        value::core::{Value, Variable, lock},
    },
};

impl Interpreter {
    /// Evaluates a call expression.
    ///
    /// For a plain `name(...)` call the name is resolved in order: built-in,
    /// program, named function, then a function value bound in the
    /// environment. Any other callee expression is evaluated and must yield a
    /// function value. Arity must match exactly.
    ///
    /// A `return` raised inside the body is caught here and becomes the
    /// call's result; without one the call yields the empty string.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            args: &[Expr],
                            line: usize)
                            -> EvalResult<Value> {
        if let Expr::Ident { name, .. } = callee {
            // `push` reads its first argument as an unevaluated identifier so
            // the declared element type can be enforced.
            if name == "push" {
                return self.eval_push(args, line);
            }
            if builtins::lookup(name).is_some() {
                let values = propagate!(self.eval_args(args));
                return Ok(Outcome::Value(builtins::dispatch(name, &values, line)?));
            }
            if let Some(prog) = self.programs.get(name).cloned() {
                let name = prog.name.clone();
                return self.invoke(&prog.params, &prog.body, args, &name, line);
            }
            if let Some(func) = self.functions.get(name).cloned() {
                let name = func.name.clone();
                return self.invoke(&func.params, &func.body, args, &name, line);
            }
            if let Some(var) = self.env.get(name) {
                let value = var.value.clone();
                return self.call_value(&value, args, name, line);
            }
            return Err(RuntimeError::UndefinedFunction { name: name.clone(),
                                                         line });
        }

        let value = propagate!(self.eval_expr(callee));
        self.call_value(&value, args, "<expression>", line)
    }

    /// Calls a first-class function value.
    fn call_value(&mut self,
                  value: &Value,
                  args: &[Expr],
                  name: &str,
                  line: usize)
                  -> EvalResult<Value> {
        match value {
            Value::Func(decl) => {
                let decl = decl.clone();
                let name = decl.name.clone();
                self.invoke(&decl.params, &decl.body, args, &name, line)
            },
            Value::Lambda(lit) => {
                let lit = lit.clone();
                self.invoke(&lit.params, &lit.body, args, name, line)
            },
            other => Err(RuntimeError::TypeError { details: format!("'{name}' is not callable \
                                                                     (got {})",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// Evaluates call arguments left to right.
    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(propagate!(self.eval_expr(arg)));
        }
        Ok(Outcome::Value(values))
    }

    /// Runs a function or program body with the given arguments.
    ///
    /// A scope is pushed for the parameters, the body executes in a nested
    /// block scope, and both are released on every exit. `return` is consumed
    /// here; `throw`, `break` and `continue` keep unwinding to their own
    /// handlers.
    pub(crate) fn invoke(&mut self,
                         params: &[Param],
                         body: &Block,
                         args: &[Expr],
                         name: &str,
                         line: usize)
                         -> EvalResult<Value> {
        if args.len() != params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                             line });
        }
        let values = propagate!(self.eval_args(args));

        self.env.push_scope();
        for (param, value) in params.iter().zip(values) {
            self.env
                .define(&param.name, Variable::new(value, param.type_spec.clone(), false));
        }
        let outcome = self.exec_block(body);
        self.env.pop_scope();

        match outcome? {
            Outcome::Signal(Signal::Return(value)) => Ok(Outcome::Value(value)),
            Outcome::Signal(signal) => Ok(Outcome::Signal(signal)),
            Outcome::Value(()) => Ok(Outcome::Value(Value::empty())),
        }
    }

    /// Evaluates an `await` expression.
    ///
    /// Awaiting a call to a registered program evaluates the arguments in the
    /// caller, deep-copies them together with a snapshot of the caller's
    /// environment into a worker interpreter, runs the program body on a
    /// worker thread, and blocks until it joins. Worker mutations are
    /// invisible to the caller and the await yields the empty string; a
    /// runtime error inside the worker propagates to the caller.
    ///
    /// Awaiting anything else evaluates the expression in place.
    pub(crate) fn eval_await(&mut self, expr: &Expr, line: usize) -> EvalResult<Value> {
        if let Expr::Call { callee, args, .. } = expr
           && let Expr::Ident { name, .. } = callee.as_ref()
           && let Some(prog) = self.programs.get(name).cloned()
        {
            if args.len() != prog.params.len() {
                return Err(RuntimeError::ArgumentCountMismatch { name: prog.name.clone(),
                                                                 line });
            }
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(propagate!(self.eval_expr(arg)).deep_clone());
            }

            let mut worker = self.clone_for_worker();
            let handle = thread::spawn(move || -> Result<(), RuntimeError> {
                worker.env.push_scope();
                for (param, value) in prog.params.iter().zip(values) {
                    worker.env
                          .define(&param.name, Variable::new(value, param.type_spec.clone(),
                                                             false));
                }
                let outcome = worker.exec_block(&prog.body);
                worker.env.pop_scope();

                match outcome? {
                    Outcome::Value(()) | Outcome::Signal(Signal::Return(_)) => Ok(()),
                    Outcome::Signal(Signal::Throw(value)) => {
                        Err(RuntimeError::UncaughtThrow { value: value.to_string(),
                                                          line:  prog.line, })
                    },
                    Outcome::Signal(signal) => {
                        Err(RuntimeError::StrayControlFlow { signal: signal.keyword(),
                                                             line:   prog.line, })
                    },
                }
            });

            match handle.join() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(RuntimeError::UserError { message:
                                                             "background program panicked"
                                                                 .to_string(),
                                                         line });
                },
            }
            return Ok(Outcome::Value(Value::empty()));
        }

        self.eval_expr(expr)
    }

    /// Evaluates `push(array, value)`.
    ///
    /// The first argument must be an identifier naming an array variable so
    /// the declared element type can be enforced before mutating.
    fn eval_push(&mut self, args: &[Expr], line: usize) -> EvalResult<Value> {
        if args.len() != 2 {
            return Err(RuntimeError::ArgumentCountMismatch { name: "push".to_string(),
                                                             line });
        }
        let Expr::Ident { name, .. } = &args[0] else {
            return Err(RuntimeError::TypeError { details: "push() requires an array variable as \
                                                           its first argument"
                                                              .to_string(),
                                                 line });
        };
        let var = self.env
                      .get(name)
                      .cloned()
                      .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone(),
                                                                       line })?;
        let Value::Array(elements) = &var.value else {
            return Err(RuntimeError::TypeError { details: format!("push() requires an array, \
                                                                   '{name}' is {}",
                                                                  var.value.type_name()),
                                                 line });
        };

        let value = propagate!(self.eval_expr(&args[1]));
        if let Some(inner) = element_spec(&var.declared_type)
           && !matches_type(&value, inner, &self.type_aliases)
        {
            return Err(RuntimeError::ElementTypeMismatch { name:     name.clone(),
                                                           declared: inner.to_string(),
                                                           line });
        }

        lock(elements).push(value);
        Ok(Outcome::Value(Value::empty()))
    }
}
