use crate::{ast::{Block, FunctionDef, Statement},
            error::TypeError,
            interpreter::{checker::Checker, types::Type}};

impl Checker {
    /// Verifies a single statement and reports the type it produces.
    pub(super) fn check_statement(&mut self, statement: &Statement) -> Type {
        match statement {
            Statement::Def { name,
                             type_hint,
                             value,
                             line, } => {
                self.check_def(name, type_hint.as_ref(), value, *line)
            },
            Statement::Function(def) => self.check_function(def, None),
            Statement::Return { value, line } => self.check_return(value.as_ref(), *line),
            Statement::Expression { expr, .. } => self.check_expression(expr),
            Statement::While { condition, body, line } => {
                let condition_type = self.check_expression(condition);
                if !condition_type.is_boolean_compatible() {
                    self.add_error(TypeError::WhileConditionNotBoolean { line: *line });
                }

                self.push_scope();
                self.check_block(body);
                self.pop_scope();

                Type::Null
            },
            Statement::For { variable,
                             iterable,
                             body,
                             line, } => {
                let iterable_type = self.check_expression(iterable);

                let element = match iterable_type.unwrap_mutable() {
                    Type::List(element) => (**element).clone(),
                    Type::Any => Type::Any,
                    other => {
                        self.add_error(TypeError::NotIterable { iterable: other.clone(),
                                                                line:     *line, });
                        return Type::Null;
                    },
                };

                self.push_scope();
                self.define(variable.clone(), element);
                self.check_block(body);
                self.pop_scope();

                Type::Null
            },
            Statement::Struct { name, .. } => Type::Struct(name.clone()),
            Statement::Extend { type_name, methods, .. } => {
                self.check_extend(type_name, methods);
                Type::Null
            },
            Statement::Import { .. } | Statement::Break { .. } | Statement::Continue { .. } => {
                Type::Null
            },
        }
    }

    /// Verifies a `def` binding against its optional type hint and registers
    /// the resulting binding type.
    fn check_def(&mut self,
                 name: &str,
                 type_hint: Option<&crate::ast::TypeAnnotation>,
                 value: &crate::ast::Expr,
                 line: usize)
                 -> Type {
        let value_type = self.check_expression(value);

        if type_hint.is_some() {
            let expected = Type::from_annotation(type_hint);
            if !Type::assignable(&expected, &value_type) {
                self.add_error(TypeError::DefMismatch { value: value_type,
                                                        target: expected.clone(),
                                                        line });
            }
            self.define(name.to_string(), expected.clone());
            return expected;
        }

        self.define(name.to_string(), value_type.clone());
        value_type
    }

    /// Verifies a function declaration's body against its signature.
    ///
    /// The declared return type must not be `Mutable[...]`; that check is
    /// independent of the per-`return` verification, which runs for every
    /// return statement anywhere in the body, however deeply nested.
    pub(super) fn check_function(&mut self, def: &FunctionDef, this: Option<Type>) -> Type {
        let (parameters, ret) = match self.function_signature(&def.name) {
            Some((parameters, ret)) => (parameters.clone(), ret.clone()),
            None => {
                // A function declared inside a body was never collected;
                // derive its signature from the annotations on the spot.
                let parameters: Vec<Type> =
                    def.parameters
                       .iter()
                       .map(|p| Type::from_annotation(p.type_hint.as_ref()))
                       .collect();
                (parameters, Type::from_annotation(def.return_type.as_ref()))
            },
        };

        if matches!(ret, Type::Mutable(_)) {
            self.add_error(TypeError::MutableReturn { name: def.name.clone(),
                                                      line: def.line, });
        }

        self.push_scope();
        if let Some(this_type) = this {
            self.define("this".to_string(), this_type);
        }
        for (parameter, parameter_type) in def.parameters.iter().zip(&parameters) {
            self.define(parameter.name.clone(), parameter_type.clone());
        }

        let previous = self.swap_current_return(Some(ret.clone()));
        self.check_block(&def.body);
        self.swap_current_return(previous);
        self.pop_scope();

        Type::Function { parameters,
                         ret: Box::new(ret) }
    }

    /// Verifies a `return` statement against the enclosing function's
    /// declared return type.
    fn check_return(&mut self, value: Option<&crate::ast::Expr>, line: usize) -> Type {
        let actual = match value {
            Some(value) => self.check_expression(value),
            None => Type::Null,
        };

        if let Some(expected) = self.current_return()
           && !Type::assignable(&expected, &actual)
        {
            self.add_error(TypeError::ReturnMismatch { actual: actual.clone(),
                                                       expected,
                                                       line });
        }

        actual
    }

    /// Verifies the methods of an `extend` block with `this` bound to the
    /// extended type.
    ///
    /// Extending a type with no struct declaration is allowed, since
    /// built-in type names dispatch at run time; `this` falls back to `Any`.
    fn check_extend(&mut self, type_name: &str, methods: &[FunctionDef]) {
        let this_type = if self.struct_fields(type_name).is_some() {
            Type::Struct(type_name.to_string())
        } else {
            Type::Any
        };

        for method in methods {
            self.check_function(method, Some(this_type.clone()));
        }
    }

    /// Verifies the statements of a block in order and reports the last
    /// statement's type. The caller owns the surrounding scope.
    pub(super) fn check_block(&mut self, block: &Block) -> Type {
        let mut last = Type::Null;
        for statement in &block.statements {
            last = self.check_statement(statement);
        }
        last
    }
}
