use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::Value;

/// A lexical scope in the runtime: a binding table with an optional parent.
///
/// Environments form a parent-linked chain. Lookup walks the chain outward;
/// definition always writes the innermost scope, so shadowing falls out
/// naturally. Scopes are reference-counted because closures capture their
/// definition environment and keep it alive past the enclosing block.
///
/// The interpreter is single-threaded, so `Rc<RefCell<...>>` is the whole
/// synchronization story; there is deliberately no `Arc` or locking here.
#[derive(Debug, Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

#[derive(Debug)]
struct Scope {
    store:  HashMap<String, Value>,
    parent: Option<Environment>,
}

impl Environment {
    /// Creates a new root environment with no parent.
    #[must_use]
    pub fn new() -> Self {
        Self { scope: Rc::new(RefCell::new(Scope { store:  HashMap::new(),
                                                   parent: None, })) }
    }

    /// Creates a child environment enclosed by `parent`.
    ///
    /// Bindings made in the child never leak outward; lookups fall through
    /// to the parent chain.
    #[must_use]
    pub fn enclosed(parent: &Self) -> Self {
        Self { scope: Rc::new(RefCell::new(Scope { store:  HashMap::new(),
                                                   parent: Some(parent.clone()), })) }
    }

    /// Looks a name up through the scope chain.
    ///
    /// # Returns
    /// The nearest binding for `name`, or `None` if no scope defines it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.scope.borrow();
        if let Some(value) = scope.store.get(name) {
            return Some(value.clone());
        }
        scope.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Defines or replaces a binding in the innermost scope.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.scope.borrow_mut().store.insert(name.into(), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
