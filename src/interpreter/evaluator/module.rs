use std::{collections::HashMap, env, fs, path::PathBuf, rc::Rc};

use crate::{ast::Program,
            error::ModuleError,
            interpreter::{environment::Environment,
                          evaluator::{EvalResult, Evaluator, Signal, register_builtins},
                          lexer::Lexer,
                          parser::Parser,
                          value::{ModuleValue, Value}}};

/// Loads and caches module source files.
///
/// A dotted import path maps to a file path by joining its segments with the
/// host separator and appending the source extension, resolved against a
/// configurable base directory (the process working directory by default).
/// Parsed programs are cached by the raw dotted path for the lifetime of the
/// loader; there is no staleness detection within a run.
pub struct ModuleLoader {
    base_path: PathBuf,
    cache:     HashMap<String, Rc<Program>>,
}

impl ModuleLoader {
    /// Creates a loader rooted at the process working directory.
    #[must_use]
    pub fn new() -> Self {
        let base_path = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { base_path,
               cache: HashMap::new() }
    }

    /// Changes the directory module paths resolve against.
    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.base_path = path.into();
    }

    /// Loads and parses a module by its dotted path.
    ///
    /// A cached program is reused as-is. A fresh load reads the resolved
    /// file and parses it completely; a file with any parse diagnostic fails
    /// the load rather than producing a partial tree.
    ///
    /// # Errors
    /// [`ModuleError::NotFound`] when the file cannot be read, and
    /// [`ModuleError::ParseFailed`] carrying every parse diagnostic.
    pub fn load(&mut self, module_path: &str) -> Result<Rc<Program>, ModuleError> {
        if let Some(program) = self.cache.get(module_path) {
            return Ok(Rc::clone(program));
        }

        let file_path = self.resolve_path(module_path);
        let source = fs::read_to_string(&file_path).map_err(|reason| {
                         ModuleError::NotFound { path: module_path.to_string(),
                                                 reason }
                     })?;

        let (program, errors) = Parser::new(Lexer::new(&source)).parse_program();
        if !errors.is_empty() {
            return Err(ModuleError::ParseFailed { path: module_path.to_string(),
                                                  errors });
        }

        let program = Rc::new(program);
        self.cache.insert(module_path.to_string(), Rc::clone(&program));
        Ok(program)
    }

    /// Converts a dotted module path to a file path:
    /// `a.b.c` resolves to `<base>/a/b/c.moon`.
    fn resolve_path(&self, module_path: &str) -> PathBuf {
        let mut path = self.base_path.clone();
        for segment in module_path.split('.') {
            path.push(segment);
        }
        path.set_extension("moon");
        path
    }
}

impl Default for ModuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Evaluates an `import` statement.
    ///
    /// The module cache is consulted first; on a miss the loader parses the
    /// target file, which is then evaluated into a fresh environment seeded
    /// with the same builtins as the top-level program. The resulting module
    /// value is cached by the dotted path and bound under the path's final
    /// segment.
    pub(super) fn eval_import(&mut self, path: &[String], env: &Environment) -> EvalResult<Value> {
        let module_path = path.join(".");
        let binding = path.last().cloned().unwrap_or_default();

        if let Some(module) = self.modules.get(&module_path) {
            let value = Value::Module(Rc::clone(module));
            env.set(binding, value.clone());
            return Ok(value);
        }

        let program = self.loader
                          .load(&module_path)
                          .map_err(|error| Signal::fail(error.to_string()))?;

        let module_env = Environment::new();
        register_builtins(&module_env);
        self.eval_program(&program, &module_env).map_err(Signal::Error)?;

        let module = Rc::new(ModuleValue { name:    binding.clone(),
                                           exports: module_env, });
        self.modules.insert(module_path, Rc::clone(&module));

        let value = Value::Module(module);
        env.set(binding, value.clone());
        Ok(value)
    }
}
