use std::collections::HashMap;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::typing::{is_complex_spec, matches_type},
        value::core::{Value, Variable},
    },
};

/// A stack of lexical scope frames, each mapping names to [`Variable`]s.
///
/// Lookup walks innermost-to-outermost; definition writes to the innermost
/// frame; a store updates the nearest binding. The stack is never empty while
/// evaluation is running, and pushes and pops are balanced around every block
/// and call.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<HashMap<String, Variable>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment with a single empty global scope.
    #[must_use]
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }

    /// Defines `name` in the innermost scope, overwriting any binding of the
    /// same name in that scope.
    pub fn define(&mut self, name: &str, var: Variable) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), var);
        }
    }

    /// Looks up `name`, innermost scope first.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Returns whether `name` is bound in any scope.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains_key(name))
    }

    /// Stores `value` into the nearest binding of `name`.
    ///
    /// The declared-type gate runs only when the declared spec is complex
    /// (contains `|`, `[`, `{`, or equals `any`); plain nominal types are
    /// admitted unconditionally. Initialization checks the full spec instead;
    /// this skew is a documented performance trade-off of the store path.
    ///
    /// # Errors
    /// - [`RuntimeError::UndefinedVariable`] when no binding exists.
    /// - [`RuntimeError::TypeMismatch`] when the gate rejects the value.
    pub fn set(&mut self,
               name: &str,
               value: Value,
               aliases: &HashMap<String, String>,
               line: usize)
               -> Result<(), RuntimeError> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(var) = scope.get_mut(name) {
                if is_complex_spec(&var.declared_type)
                   && !matches_type(&value, &var.declared_type, aliases)
                {
                    return Err(RuntimeError::TypeMismatch { name:     name.to_string(),
                                                            declared: var.declared_type.clone(),
                                                            line });
                }
                var.value = value;
                return Ok(());
            }
        }
        Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                              line })
    }

    /// Pushes a fresh scope frame.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope frame. The global frame is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// The current scope-stack depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Deep-copies the environment: every frame is duplicated and every
    /// collection value is recursively cloned, so the copy shares no mutable
    /// state with the original. Used to build the snapshot a worker task
    /// receives when a program is awaited.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        let scopes =
            self.scopes
                .iter()
                .map(|scope| {
                    scope.iter()
                         .map(|(name, var)| {
                             (name.clone(),
                              Variable { value:         var.value.deep_clone(),
                                         declared_type: var.declared_type.clone(),
                                         is_const:      var.is_const, })
                         })
                         .collect()
                })
                .collect();
        Self { scopes }
    }
}
