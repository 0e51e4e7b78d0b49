use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::Arc,
};

use crate::{
    ast::{Block, Expr, Program, Stmt, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::typing::matches_type,
        value::{
            core::{Value, Variable},
            environment::Environment,
        },
    },
};

/// A non-value result of evaluation that unwinds to a designated handler:
/// `return` to the enclosing call, `break`/`continue` to the enclosing loop,
/// and `throw` to the enclosing `try`.
#[derive(Debug, Clone)]
pub enum Signal {
    /// A `return` carrying the returned value.
    Return(Value),
    /// A `break` out of the nearest loop or switch.
    Break,
    /// A `continue` to the next loop iteration.
    Continue,
    /// A thrown value, catchable by `try`/`catch`.
    Throw(Value),
}

impl Signal {
    /// The keyword that raised this signal, for diagnostics.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Return(_) => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Throw(_) => "throw",
        }
    }
}

/// The result of evaluating one node: either a plain value or a control-flow
/// signal on its way to a handler. Errors travel in the surrounding `Result`
/// so control flow and genuine failures never share a channel.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Normal completion.
    Value(T),
    /// A signal unwinding through this node.
    Signal(Signal),
}

/// Result type used by the evaluator.
pub type EvalResult<T> = Result<Outcome<T>, RuntimeError>;

/// Unwraps an [`Outcome`], re-raising a signal to the caller.
macro_rules! propagate {
    ($e:expr) => {
        match $e? {
            Outcome::Value(value) => value,
            Outcome::Signal(signal) => return Ok(Outcome::Signal(signal)),
        }
    };
}
pub(crate) use propagate;

/// The tree-walking interpreter.
///
/// One instance owns the environment and every registry: named functions,
/// programs, type aliases, per-module exports and the set of modules already
/// loaded. Imports execute in this same instance, so an imported module's
/// declarations land in the shared registries and its exports attribute to
/// the module being loaded.
pub struct Interpreter {
    /// The scope stack.
    pub env:             Environment,
    /// Named functions, user-declared and imported.
    pub functions:       HashMap<String, Arc<crate::ast::FunctionDecl>>,
    /// Programs, invokable synchronously or through `await`.
    pub programs:        HashMap<String, Arc<crate::ast::ProgramDecl>>,
    /// Type aliases: name to canonical type-spec string.
    pub type_aliases:    HashMap<String, String>,
    /// Named exports per resolved module path.
    pub module_exports:  HashMap<PathBuf, HashMap<String, Value>>,
    /// Default export per resolved module path.
    pub default_exports: HashMap<PathBuf, Value>,
    /// Modules already executed; re-imports bind without re-running.
    pub loaded_modules:  HashSet<PathBuf>,
    /// The module currently being loaded, for export attribution and
    /// relative path resolution. `None` while running the top-level script.
    pub current_module:  Option<PathBuf>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter with an empty global scope and no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self { env:             Environment::new(),
               functions:       HashMap::new(),
               programs:        HashMap::new(),
               type_aliases:    HashMap::new(),
               module_exports:  HashMap::new(),
               default_exports: HashMap::new(),
               loaded_modules:  HashSet::new(),
               current_module:  None, }
    }

    /// Runs a parsed program top to bottom.
    ///
    /// A control-flow signal that escapes the top level is promoted to a
    /// runtime error: an uncaught `throw` reports the thrown value, and a
    /// stray `return`/`break`/`continue` reports the escaping keyword.
    ///
    /// # Errors
    /// Returns the first [`RuntimeError`] raised during execution.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for decl in &program.declarations {
            match self.exec_stmt(decl)? {
                Outcome::Value(()) => {},
                Outcome::Signal(Signal::Throw(value)) => {
                    return Err(RuntimeError::UncaughtThrow { value: value.to_string(),
                                                             line:  decl.line_number(), });
                },
                Outcome::Signal(signal) => {
                    return Err(RuntimeError::StrayControlFlow { signal: signal.keyword(),
                                                                line:   decl.line_number(), });
                },
            }
        }
        Ok(())
    }

    /// Evaluates a single statement.
    ///
    /// # Errors
    /// Returns a [`RuntimeError`] for fatal failures; control-flow signals
    /// travel in the [`Outcome`].
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match stmt {
            Stmt::Block(block) => self.exec_block(block),
            Stmt::VarDecl { name,
                            type_spec,
                            is_const,
                            init,
                            line, } => self.exec_var_decl(name, type_spec, *is_const,
                                                          init.as_ref(), *line),
            Stmt::Expression { expr, .. } => {
                propagate!(self.eval_expr(expr));
                Ok(Outcome::Value(()))
            },
            Stmt::If { condition,
                       then_block,
                       else_block,
                       .. } => self.exec_if(condition, then_block, else_block.as_ref()),
            Stmt::While { condition, body, .. } => self.exec_while(condition, body),
            Stmt::For { init,
                        condition,
                        update,
                        body,
                        .. } => self.exec_for(init.as_deref(), condition, update, body),
            Stmt::Switch { discriminant, cases, .. } => self.exec_switch(discriminant, cases),
            Stmt::Try { body,
                        catch_name,
                        catch_block,
                        finally_block,
                        .. } => self.exec_try(body,
                                              catch_name.as_deref(),
                                              catch_block.as_ref(),
                                              finally_block.as_ref()),
            Stmt::Return { value, .. } => {
                let result = match value {
                    Some(expr) => propagate!(self.eval_expr(expr)),
                    None => Value::empty(),
                };
                Ok(Outcome::Signal(Signal::Return(result)))
            },
            Stmt::Throw { value, .. } => {
                let thrown = propagate!(self.eval_expr(value));
                Ok(Outcome::Signal(Signal::Throw(thrown)))
            },
            Stmt::Break { .. } => Ok(Outcome::Signal(Signal::Break)),
            Stmt::Continue { .. } => Ok(Outcome::Signal(Signal::Continue)),
            Stmt::Function(decl) => {
                self.functions.insert(decl.name.clone(), Arc::clone(decl));
                // The name is also bound as a variable so `typeof f` and
                // first-class use resolve it.
                self.env.define(&decl.name,
                                Variable::new(Value::Func(Arc::clone(decl)), "function", false));
                Ok(Outcome::Value(()))
            },
            Stmt::Program(decl) => {
                self.programs.insert(decl.name.clone(), Arc::clone(decl));
                Ok(Outcome::Value(()))
            },
            Stmt::TypeAlias { name, spec, .. } => {
                self.type_aliases.insert(name.clone(), spec.clone());
                Ok(Outcome::Value(()))
            },
            Stmt::Import { path,
                           default_name,
                           named,
                           line, } => {
                self.exec_import(path, default_name.as_deref(), named, *line)?;
                Ok(Outcome::Value(()))
            },
            Stmt::Use { path, line } => {
                self.exec_use(path, *line)?;
                Ok(Outcome::Value(()))
            },
            Stmt::Export { kind, is_default, line } => self.exec_export(kind, *is_default, *line),
        }
    }

    /// Executes the statements of a block inside a fresh scope. The scope is
    /// released on every exit path, signaled or not.
    pub fn exec_block(&mut self, block: &Block) -> EvalResult<()> {
        self.env.push_scope();
        let result = self.exec_statements(&block.statements);
        self.env.pop_scope();
        result
    }

    /// Executes a statement list in the current scope, stopping at the first
    /// signal or error.
    pub(crate) fn exec_statements(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        for stmt in statements {
            match self.exec_stmt(stmt)? {
                Outcome::Value(()) => {},
                signal => return Ok(signal),
            }
        }
        Ok(Outcome::Value(()))
    }

    /// Declares a variable, enforcing the declared type against the
    /// initializer. Without an initializer the default value is zero, or an
    /// empty object for `object`-typed declarations.
    fn exec_var_decl(&mut self,
                     name: &str,
                     type_spec: &str,
                     is_const: bool,
                     init: Option<&Expr>,
                     line: usize)
                     -> EvalResult<()> {
        let value = match init {
            Some(expr) => {
                let value = propagate!(self.eval_expr(expr));
                if !matches_type(&value, type_spec, &self.type_aliases) {
                    return Err(RuntimeError::InitializerMismatch { name:     name.to_string(),
                                                                   declared:
                                                                       type_spec.to_string(),
                                                                   line });
                }
                value
            },
            None if type_spec == "object" => HashMap::new().into(),
            None => Value::Int(0),
        };

        self.env.define(name, Variable::new(value, type_spec, is_const));
        Ok(Outcome::Value(()))
    }

    /// Evaluates an expression to a value.
    ///
    /// # Errors
    /// Returns a [`RuntimeError`] for fatal failures; signals raised inside
    /// (a `throw` in a called function, for instance) travel in the
    /// [`Outcome`].
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::IntLit { value, line } => {
                let value = i32::try_from(*value).map_err(|_| {
                                                     RuntimeError::LiteralTooLarge { line: *line }
                                                 })?;
                Ok(Outcome::Value(Value::Int(value)))
            },
            Expr::FloatLit { value, .. } => Ok(Outcome::Value(Value::Float(*value))),
            Expr::StringLit { value,
                              interpolated,
                              line, } => {
                if *interpolated {
                    self.interpolate(value, *line)
                } else {
                    Ok(Outcome::Value(Value::Str(value.clone())))
                }
            },
            Expr::BoolLit { value, .. } => Ok(Outcome::Value(Value::Bool(*value))),
            Expr::Ident { name, line } => {
                self.env
                    .get(name)
                    .map(|var| Outcome::Value(var.value.clone()))
                    .ok_or(RuntimeError::UndefinedVariable { name: name.clone(),
                                                             line: *line, })
            },
            Expr::Binary { left,
                           op,
                           right,
                           line, } => {
                let lhs = propagate!(self.eval_expr(left));
                let rhs = propagate!(self.eval_expr(right));
                Ok(Outcome::Value(Self::apply_binary(*op, &lhs, &rhs, *line)?))
            },
            Expr::Unary { op, operand, line } => self.eval_unary(*op, operand, *line),
            Expr::Call { callee, args, line } => self.eval_call(callee, args, *line),
            Expr::ArrayLit { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(propagate!(self.eval_expr(element)));
                }
                Ok(Outcome::Value(values.into()))
            },
            Expr::ObjectLit { fields, .. } => {
                let mut map = HashMap::with_capacity(fields.len());
                for (name, value_expr) in fields {
                    let value = propagate!(self.eval_expr(value_expr));
                    map.insert(name.clone(), value);
                }
                Ok(Outcome::Value(map.into()))
            },
            Expr::FunctionLit { func, .. } => {
                Ok(Outcome::Value(Value::Lambda(Arc::clone(func))))
            },
            Expr::Index { base, index, line } => self.eval_index(base, index, *line),
            Expr::Field { base, name, line } => self.eval_field(base, name, *line),
            Expr::Assign { name, value, line } => {
                let assigned = propagate!(self.eval_expr(value));
                self.env.set(name, assigned.clone(), &self.type_aliases, *line)?;
                Ok(Outcome::Value(assigned))
            },
            Expr::IndexAssign { base,
                                index,
                                value,
                                line, } => self.eval_index_assign(base, index, value, *line),
            Expr::FieldAssign { base,
                                name,
                                value,
                                line, } => self.eval_field_assign(base, name, value, *line),
            Expr::Await { expr, line } => self.eval_await(expr, *line),
        }
    }

    /// Evaluates a unary operation. `typeof` is resolved here because it
    /// needs the unevaluated operand to consult declared types.
    fn eval_unary(&mut self, op: UnaryOperator, operand: &Expr, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::TypeOf => self.eval_typeof(operand, line),
            UnaryOperator::Negate => {
                let value = propagate!(self.eval_expr(operand));
                match value {
                    Value::Int(n) => {
                        let negated =
                            n.checked_neg().ok_or(RuntimeError::Overflow { line })?;
                        Ok(Outcome::Value(Value::Int(negated)))
                    },
                    Value::Float(x) => Ok(Outcome::Value(Value::Float(-x))),
                    other => Err(RuntimeError::TypeError { details: format!("cannot negate {}",
                                                                            other.type_name()),
                                                           line }),
                }
            },
            UnaryOperator::Not => {
                let value = propagate!(self.eval_expr(operand));
                Ok(Outcome::Value(Value::Bool(!value.is_truthy())))
            },
        }
    }

    /// Builds an interpreter for a worker task: a deep copy of the current
    /// environment plus shared-AST clones of every registry.
    #[must_use]
    pub fn clone_for_worker(&self) -> Self {
        Self { env:             self.env.snapshot(),
               functions:       self.functions.clone(),
               programs:        self.programs.clone(),
               type_aliases:    self.type_aliases.clone(),
               module_exports:  self.module_exports.clone(),
               default_exports: self.default_exports.clone(),
               loaded_modules:  self.loaded_modules.clone(),
               current_module:  self.current_module.clone(), }
    }
}
