/// Statement evaluation: program, blocks, bindings, declarations, loops.
mod statement;

/// Expression evaluation: operators, literals, access, match, wrappers.
mod expression;

/// Function application and closure machinery.
mod function;

/// Method dispatch (built-in and extension) plus error enrichment.
mod method;

/// Built-in free functions and their environment registration.
mod builtins;

/// Module resolution, loading, and caching.
mod module;

pub use builtins::register_builtins;
pub use module::ModuleLoader;

use std::{collections::HashMap, rc::Rc};

use crate::{ast::Program,
            interpreter::{environment::Environment,
                          value::{ErrorValue, FunctionValue, ModuleValue, StructDefinition,
                                  Value}}};

/// Non-local control flow riding alongside ordinary values.
///
/// Runtime failures, `return`, `break`, and `continue` all escape through
/// this channel instead of the value union, so `?` propagates them and each
/// construct intercepts exactly the signals it owns: function application
/// absorbs `Return`, loops absorb `Break` and `Continue`, and errors travel
/// to the program boundary. Blocks intercept nothing: any signal
/// short-circuits the remaining statements.
#[derive(Debug)]
pub enum Signal {
    /// A runtime failure propagating outward.
    Error(ErrorValue),
    /// A `return`, carrying the returned value until a call absorbs it.
    Return(Value),
    /// A `break`, absorbed by the nearest loop.
    Break,
    /// A `continue`, absorbed by the nearest loop.
    Continue,
}

impl Signal {
    /// Builds an error signal from a plain message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Error(ErrorValue::plain(message))
    }
}

impl From<ErrorValue> for Signal {
    fn from(error: ErrorValue) -> Self {
        Self::Error(error)
    }
}

/// Result type used by the evaluator.
///
/// Every evaluation function returns either a value of type `T` or a
/// [`Signal`] describing the escape in flight.
pub type EvalResult<T> = Result<T, Signal>;

/// The tree-walking evaluator.
///
/// One instance owns all interpretation state: the struct-definition
/// registry, the extension-method registry keyed by type name, the cache of
/// loaded modules, the module loader, and the name of the function currently
/// executing (used to attribute freshly constructed errors). There is no
/// ambient global state; independent instances are fully isolated.
pub struct Evaluator {
    structs:    HashMap<String, Rc<StructDefinition>>,
    extensions: HashMap<String, HashMap<String, Rc<FunctionValue>>>,
    modules:    HashMap<String, Rc<ModuleValue>>,
    loader:     ModuleLoader,
    current_fn: String,
}

impl Evaluator {
    /// Creates an evaluator with empty registries and a loader rooted at the
    /// process working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_loader(ModuleLoader::new())
    }

    /// Creates an evaluator around a preconfigured module loader.
    #[must_use]
    pub fn with_loader(loader: ModuleLoader) -> Self {
        Self { structs: HashMap::new(),
               extensions: HashMap::new(),
               modules: HashMap::new(),
               loader,
               current_fn: String::new() }
    }

    /// Evaluates a whole program in the given environment.
    ///
    /// The program's value is its last statement's value; a top-level
    /// `return` unwraps to its payload, and a stray `break` or `continue`
    /// yields null.
    ///
    /// # Errors
    /// The runtime error that reached the top level, ready for the driver to
    /// render.
    pub fn eval_program(&mut self,
                        program: &Program,
                        env: &Environment)
                        -> Result<Value, ErrorValue> {
        let mut result = Value::Null;

        for statement in &program.statements {
            match self.eval_statement(statement, env) {
                Ok(value) => result = value,
                Err(Signal::Return(value)) => return Ok(value),
                Err(Signal::Error(error)) => return Err(error),
                Err(Signal::Break | Signal::Continue) => return Ok(Value::Null),
            }
        }

        Ok(result)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
