/// Statement-level verification: bindings, functions, loops, extend blocks.
mod statement;

/// Expression-level inference and verification.
mod expression;

use std::collections::HashMap;

use crate::{ast::{Program, Statement},
            error::TypeError,
            interpreter::types::Type};

/// The static type checker.
///
/// Checking runs in two passes. The collection pass registers every
/// top-level `struct` and `fun` (including methods inside `extend` blocks)
/// so declarations may reference each other in any order. The verification
/// pass then walks every statement, inferring or checking a structural
/// [`Type`] for each expression and accumulating diagnostics.
///
/// Scopes live on a plain stack: one frame per function body, loop body, or
/// block arm. Shadowing an outer binding is allowed, not an error.
pub struct Checker {
    /// Scope stack; the last frame is the innermost scope.
    scopes:         Vec<HashMap<String, Type>>,
    /// Declared struct types: name → field name → field type.
    structs:        HashMap<String, HashMap<String, Type>>,
    /// Declared function signatures: name → (parameters, return).
    functions:      HashMap<String, (Vec<Type>, Type)>,
    /// Every diagnostic recorded so far, in source order.
    errors:         Vec<TypeError>,
    /// The enclosing function's declared return type, when inside one.
    current_return: Option<Type>,
}

impl Checker {
    /// Creates a checker with the built-in function signatures registered in
    /// the global scope.
    #[must_use]
    pub fn new() -> Self {
        let mut globals = HashMap::new();

        let function = |parameters: Vec<Type>, ret: Type| Type::Function { parameters,
                                                                           ret: Box::new(ret) };

        globals.insert("print".to_string(), function(vec![Type::Any], Type::Null));
        globals.insert("println".to_string(), function(vec![Type::Any], Type::Null));
        globals.insert("range".to_string(),
                       function(vec![Type::Integer, Type::Integer],
                                Type::List(Box::new(Type::Integer))));
        globals.insert("len".to_string(), function(vec![Type::Any], Type::Integer));
        globals.insert("type".to_string(), function(vec![Type::Any], Type::String));
        globals.insert("str".to_string(), function(vec![Type::Any], Type::String));
        globals.insert("int".to_string(), function(vec![Type::Any], Type::Integer));
        globals.insert("float".to_string(), function(vec![Type::Any], Type::Float));

        Self { scopes:         vec![globals],
               structs:        HashMap::new(),
               functions:      HashMap::new(),
               errors:         Vec::new(),
               current_return: None, }
    }

    /// Type-checks a program.
    ///
    /// Diagnostics are collected for the whole program, but the external
    /// contract surfaces only the first: one type error stops the run.
    ///
    /// # Errors
    /// The first diagnostic, in source order, when any check fails.
    pub fn check(&mut self, program: &Program) -> Result<(), TypeError> {
        self.collect_declarations(program);

        for statement in &program.statements {
            self.check_statement(statement);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.remove(0))
        }
    }

    /// Collection pass: registers struct types and function signatures so
    /// forward references and mutual recursion check cleanly.
    fn collect_declarations(&mut self, program: &Program) {
        for statement in &program.statements {
            match statement {
                Statement::Struct { name, fields, .. } => {
                    let field_types = fields.iter()
                                            .map(|field| {
                                                (field.name.clone(),
                                                 Type::from_annotation(field.type_hint.as_ref()))
                                            })
                                            .collect();
                    self.structs.insert(name.clone(), field_types);
                    self.define(name.clone(), Type::Struct(name.clone()));
                },
                Statement::Function(def) => self.collect_function(def),
                Statement::Extend { methods, .. } => {
                    for method in methods {
                        self.collect_function(method);
                    }
                },
                _ => {},
            }
        }
    }

    /// Registers one function signature from its annotations.
    fn collect_function(&mut self, def: &crate::ast::FunctionDef) {
        let parameters: Vec<Type> = def.parameters
                                       .iter()
                                       .map(|p| Type::from_annotation(p.type_hint.as_ref()))
                                       .collect();
        let ret = Type::from_annotation(def.return_type.as_ref());

        self.define(def.name.clone(),
                    Type::Function { parameters: parameters.clone(),
                                     ret:        Box::new(ret.clone()), });
        self.functions.insert(def.name.clone(), (parameters, ret));
    }

    /// Records a diagnostic without stopping the walk.
    pub(super) fn add_error(&mut self, error: TypeError) {
        self.errors.push(error);
    }

    /// Opens a child scope.
    pub(super) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Closes the innermost scope.
    pub(super) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Defines a binding in the innermost scope.
    pub(super) fn define(&mut self, name: String, ty: Type) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, ty);
        }
    }

    /// Looks a binding up through the scope stack, innermost first.
    pub(super) fn lookup(&self, name: &str) -> Option<Type> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
    }

    /// Looks up a declared struct's field table.
    pub(super) fn struct_fields(&self, name: &str) -> Option<&HashMap<String, Type>> {
        self.structs.get(name)
    }

    /// Looks up a collected function signature.
    pub(super) fn function_signature(&self, name: &str) -> Option<&(Vec<Type>, Type)> {
        self.functions.get(name)
    }

    /// Reads the enclosing function's declared return type.
    pub(super) fn current_return(&self) -> Option<Type> {
        self.current_return.clone()
    }

    /// Swaps the enclosing declared return type, returning the previous one
    /// for restoration.
    pub(super) fn swap_current_return(&mut self, next: Option<Type>) -> Option<Type> {
        std::mem::replace(&mut self.current_return, next)
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}
