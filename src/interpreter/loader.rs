use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    ast::{ExportKind, Stmt},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Outcome, propagate},
        lexer,
        parser::core::parse_program,
        value::{
            core::{Value, Variable},
            environment::Environment,
        },
    },
};

impl Interpreter {
    /// Executes an `import` declaration.
    ///
    /// The requested path is resolved (§ resolution below), the module is
    /// executed at most once per interpreter, and the requested bindings are
    /// materialized in the caller's environment:
    ///
    /// - `import X from "path"` binds the module's default export under `X`.
    /// - `import {a, b} from "path"` binds each named export.
    /// - `import "path"` loads for side effects only.
    ///
    /// A `.json` import binds the raw file contents as a string — under the
    /// default-import name when one was written, otherwise under the file
    /// stem. Named imports from `.json` are an error.
    ///
    /// Resolution: an explicit extension must be `.axo` or `.json`; relative
    /// paths resolve against the directory of the currently-loading module
    /// (or the process working directory at the top level); without an
    /// extension, `<path>.axo` is tried first and then `<path>/index.axo`
    /// when `<path>` is a directory.
    ///
    /// # Errors
    /// [`RuntimeError::ImportError`] for resolution, I/O, parse and
    /// evaluation failures, and for missing exports.
    pub(crate) fn exec_import(&mut self,
                              path: &str,
                              default_name: Option<&str>,
                              named: &[String],
                              line: usize)
                              -> Result<(), RuntimeError> {
        let resolved = self.resolve_module_path(path, line)?;

        if resolved.extension().is_some_and(|ext| ext == "json") {
            if !named.is_empty() {
                return Err(RuntimeError::ImportError { path:    path.to_string(),
                                                       details: "named imports are not \
                                                                 available from .json modules"
                                                                    .to_string(),
                                                       line });
            }
            let contents = fs::read_to_string(&resolved).map_err(|_| {
                               RuntimeError::ImportError { path:    path.to_string(),
                                                           details: "could not open file"
                                                                        .to_string(),
                                                           line }
                           })?;
            let binding = default_name.map_or_else(|| file_stem(&resolved), str::to_string);
            self.env
                .define(&binding, Variable::new(Value::Str(contents), "string", false));
            return Ok(());
        }

        self.load_module(&resolved, path, line)?;

        if let Some(name) = default_name {
            let value = self.default_exports.get(&resolved).cloned().ok_or_else(|| {
                            RuntimeError::ImportError { path:    path.to_string(),
                                                        details: "module has no default export"
                                                                     .to_string(),
                                                        line }
                        })?;
            self.env.define(name, Variable::new(value, "any", false));
        }
        for name in named {
            let value = self.module_exports
                            .get(&resolved)
                            .and_then(|exports| exports.get(name))
                            .cloned()
                            .ok_or_else(|| RuntimeError::ImportError { path:    path.to_string(),
                                                                       details: format!("module \
                                                                                         has no \
                                                                                         export \
                                                                                         named \
                                                                                         '{name}'"),
                                                                       line })?;
            self.env.define(name, Variable::new(value, "any", false));
        }
        Ok(())
    }

    /// Executes a `use` declaration: the module runs once for its top-level
    /// side effects inside an isolated environment that is restored
    /// afterwards, so no bindings leak into the caller. Registrations
    /// (functions, programs, types, exports) still land in the shared
    /// registries, and the module will not re-execute on a later `import`.
    pub(crate) fn exec_use(&mut self, path: &str, line: usize) -> Result<(), RuntimeError> {
        let resolved = self.resolve_module_path(path, line)?;
        if resolved.extension().is_some_and(|ext| ext == "json") {
            return Ok(());
        }

        let saved = std::mem::replace(&mut self.env, Environment::new());
        let result = self.load_module(&resolved, path, line);
        self.env = saved;
        result
    }

    /// Executes an `export` declaration and attributes the exported values
    /// to the module currently being loaded. Exports evaluated while no
    /// module is loading still take effect locally but attribute nothing.
    pub(crate) fn exec_export(&mut self,
                              kind: &ExportKind,
                              is_default: bool,
                              line: usize)
                              -> EvalResult<()> {
        match kind {
            ExportKind::Decl(decl) => {
                propagate!(self.exec_stmt(decl));
                match decl.as_ref() {
                    Stmt::Function(func) => {
                        self.record_export(Some(&func.name.clone()),
                                           Value::Func(func.clone()),
                                           is_default);
                    },
                    Stmt::VarDecl { name, .. } => {
                        if let Some(var) = self.env.get(name) {
                            let value = var.value.clone();
                            self.record_export(Some(&name.clone()), value, is_default);
                        }
                    },
                    // Type aliases live in the shared registry; there is no
                    // value to attribute.
                    _ => {},
                }
            },
            ExportKind::Named(names) => {
                for name in names {
                    let value = self.env
                                    .get(name)
                                    .map(|var| var.value.clone())
                                    .ok_or_else(|| RuntimeError::UndefinedVariable { name:
                                                                                         name.clone(),
                                                                                     line })?;
                    let single = names.len() == 1;
                    self.record_export(Some(name), value, is_default && single);
                }
            },
            ExportKind::Value(expr) => {
                let value = propagate!(self.eval_expr(expr));
                self.record_export(None, value, true);
            },
        }
        Ok(Outcome::Value(()))
    }

    /// Stores an export under the current module key.
    fn record_export(&mut self, name: Option<&str>, value: Value, is_default: bool) {
        let Some(module) = self.current_module.clone() else {
            return;
        };
        if is_default {
            self.default_exports.insert(module.clone(), value.clone());
        }
        if let Some(name) = name {
            self.module_exports
                .entry(module)
                .or_default()
                .insert(name.to_string(), value);
        }
    }

    /// Resolves a requested module path to a canonical filesystem path.
    fn resolve_module_path(&self, requested: &str, line: usize)
                           -> Result<PathBuf, RuntimeError> {
        let requested_path = Path::new(requested);
        let joined = if requested_path.is_absolute() {
            requested_path.to_path_buf()
        } else {
            self.current_module
                .as_deref()
                .and_then(Path::parent)
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
                .join(requested_path)
        };

        if let Some(ext) = joined.extension() {
            if ext != "axo" && ext != "json" {
                return Err(RuntimeError::ImportError { path:    requested.to_string(),
                                                       details: format!("unsupported module \
                                                                         extension '.{}'",
                                                                        ext.to_string_lossy()),
                                                       line });
            }
            return canonicalize(&joined, requested, line);
        }

        let with_extension = PathBuf::from(format!("{}.axo", joined.display()));
        if with_extension.is_file() {
            return canonicalize(&with_extension, requested, line);
        }
        if joined.is_dir() {
            let index = joined.join("index.axo");
            if index.is_file() {
                return canonicalize(&index, requested, line);
            }
        }

        Err(RuntimeError::ImportError { path:    requested.to_string(),
                                        details: "could not resolve module".to_string(),
                                        line })
    }

    /// Tokenizes, parses and executes a module, at most once per resolved
    /// path. The module executes in this interpreter with `current_module`
    /// pointing at it, so nested imports resolve relative to the module and
    /// its exports attribute to the right key. A re-entrant load of a module
    /// already in flight is a no-op, which is what breaks import cycles.
    fn load_module(&mut self,
                   resolved: &Path,
                   requested: &str,
                   line: usize)
                   -> Result<(), RuntimeError> {
        if self.loaded_modules.contains(resolved) {
            return Ok(());
        }
        self.loaded_modules.insert(resolved.to_path_buf());

        let import_error = |details: String| RuntimeError::ImportError { path:
                                                                             requested.to_string(),
                                                                         details,
                                                                         line };

        let source = fs::read_to_string(resolved).map_err(|_| {
                                                     import_error("could not open file"
                                                                      .to_string())
                                                 })?;
        let tokens = lexer::tokenize(&source).map_err(|e| import_error(e.to_string()))?;
        let program =
            parse_program(&mut tokens.iter().peekable()).map_err(|e| import_error(e.to_string()))?;

        let saved = self.current_module.replace(resolved.to_path_buf());
        let result = self.run(&program).map_err(|e| import_error(e.to_string()));
        self.current_module = saved;
        result
    }
}

/// Canonicalizes a resolved candidate path, turning missing files into
/// import errors.
fn canonicalize(path: &Path, requested: &str, line: usize) -> Result<PathBuf, RuntimeError> {
    fs::canonicalize(path).map_err(|_| {
                              RuntimeError::ImportError { path:    requested.to_string(),
                                                          details: "could not resolve module"
                                                                       .to_string(),
                                                          line }
                          })
}

/// The file stem used as the implicit binding name of a `.json` import.
fn file_stem(path: &Path) -> String {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}
