use crate::{ast::{Expr, InfixOperator, MatchCase, Pattern, PrefixOperator},
            error::TypeError,
            interpreter::{checker::Checker, types::Type}};

impl Checker {
    /// Infers or verifies the type of an expression.
    ///
    /// Unresolvable constructs (lambda parameters, member access on
    /// non-structs, calls through `Any`) deliberately come out as
    /// [`Type::Any`] rather than diagnostics; the checker is strict about
    /// declared structure and permissive about everything it cannot see.
    pub(super) fn check_expression(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Integer { .. } => Type::Integer,
            Expr::Float { .. } => Type::Float,
            Expr::Str { .. } => Type::String,
            Expr::Boolean { .. } => Type::Boolean,
            Expr::Identifier { name, line } => self.check_identifier(name, *line),
            Expr::Prefix { op, right, line } => self.check_prefix(*op, right, *line),
            Expr::Infix { left, op, right, line } => self.check_infix(left, *op, right, *line),
            Expr::Rebind { name, value, line } => self.check_rebind(name, value, *line),
            Expr::If { condition,
                       consequence,
                       alternative,
                       line, } => {
                self.check_if(condition, consequence, alternative.as_ref(), *line)
            },
            Expr::Lambda { parameters, .. } => {
                // Lambda parameters are not inferred; the whole signature is
                // the Any escape hatch.
                Type::Function { parameters: vec![Type::Any; parameters.len()],
                                 ret:        Box::new(Type::Any), }
            },
            Expr::Call { function, arguments, .. } => self.check_call(function, arguments),
            Expr::Member { object, member, .. } => self.check_member(object, member),
            Expr::Index { object, index, line } => self.check_index(object, index, *line),
            Expr::List { elements, line } => self.check_list(elements, *line),
            Expr::Map { pairs, .. } => self.check_map(pairs),
            Expr::StructLiteral { name, fields, line } => {
                self.check_struct_literal(name, fields, *line)
            },
            Expr::With { object, updates, line } => self.check_with(object, updates, *line),
            Expr::OptionLiteral { value, .. } => {
                let element = match value {
                    Some(value) => self.check_expression(value),
                    None => Type::Any,
                };
                Type::Option(Box::new(element))
            },
            Expr::ResultLiteral { is_ok, value, .. } => {
                let value_type = self.check_expression(value);
                if *is_ok {
                    Type::Result(Box::new(value_type), Box::new(Type::String))
                } else {
                    Type::Result(Box::new(Type::Any), Box::new(value_type))
                }
            },
            Expr::Match { value, cases, .. } => self.check_match(value, cases),
            Expr::Mutable { type_hint, value, .. } => {
                let inferred = self.check_expression(value);
                let element = if type_hint.is_some() {
                    Type::from_annotation(type_hint.as_ref())
                } else {
                    inferred
                };
                Type::Mutable(Box::new(element))
            },
        }
    }

    fn check_identifier(&mut self, name: &str, line: usize) -> Type {
        match self.lookup(name) {
            Some(ty) => ty,
            None => {
                self.add_error(TypeError::Undefined { name: name.to_string(),
                                                      line });
                Type::Any
            },
        }
    }

    fn check_prefix(&mut self, op: PrefixOperator, right: &Expr, line: usize) -> Type {
        let right_type = self.check_expression(right);

        match op {
            PrefixOperator::Negate => {
                if !right_type.is_numeric() {
                    self.add_error(TypeError::NegateUndefined { operand: right_type.clone(),
                                                                line });
                }
                right_type
            },
            PrefixOperator::Not => Type::Boolean,
        }
    }

    /// Verifies a binary operation.
    ///
    /// Arithmetic needs numeric operands on both sides, except `+` which
    /// also concatenates two strings; a Float on either side widens the
    /// result. Comparisons need two numbers or two strings. `and`, `or`,
    /// and `is` accept anything and type as Boolean; the runtime decides
    /// truthiness and equality.
    fn check_infix(&mut self, left: &Expr, op: InfixOperator, right: &Expr, line: usize) -> Type {
        let left_type = self.check_expression(left);
        let right_type = self.check_expression(right);

        match op {
            InfixOperator::Add
            | InfixOperator::Sub
            | InfixOperator::Mul
            | InfixOperator::Div
            | InfixOperator::Mod => {
                if !left_type.is_numeric() || !right_type.is_numeric() {
                    if op == InfixOperator::Add
                       && left_type.is_string()
                       && right_type.is_string()
                    {
                        return Type::String;
                    }
                    self.add_error(TypeError::OperatorUndefined { op,
                                                                  left: left_type.clone(),
                                                                  right: right_type.clone(),
                                                                  line });
                }
                if matches!(left_type, Type::Float) || matches!(right_type, Type::Float) {
                    return Type::Float;
                }
                Type::Integer
            },

            InfixOperator::Greater
            | InfixOperator::Less
            | InfixOperator::GreaterEqual
            | InfixOperator::LessEqual => {
                if !Type::comparable(&left_type, &right_type) {
                    self.add_error(TypeError::NotComparable { left: left_type,
                                                              right: right_type,
                                                              line });
                }
                Type::Boolean
            },

            InfixOperator::And | InfixOperator::Or | InfixOperator::Is => Type::Boolean,
        }
    }

    /// Verifies a `==` rebind: the target must already be registered as
    /// `Mutable[T]` and the stored value must fit `T`.
    fn check_rebind(&mut self, name: &str, value: &Expr, line: usize) -> Type {
        let Some(target) = self.lookup(name) else {
            self.add_error(TypeError::Undefined { name: name.to_string(),
                                                  line });
            return Type::Any;
        };

        let Type::Mutable(element) = target else {
            self.add_error(TypeError::NotMutable { name: name.to_string(),
                                                   line });
            return Type::Any;
        };

        let value_type = self.check_expression(value);
        if !Type::assignable(&element, &value_type) {
            self.add_error(TypeError::RebindMismatch { value: value_type,
                                                       element: (*element).clone(),
                                                       line });
        }

        (*element).clone()
    }

    fn check_if(&mut self,
                condition: &Expr,
                consequence: &crate::ast::Block,
                alternative: Option<&crate::ast::Block>,
                line: usize)
                -> Type {
        let condition_type = self.check_expression(condition);
        if !condition_type.is_boolean_compatible() {
            self.add_error(TypeError::IfConditionNotBoolean { line });
        }

        self.push_scope();
        let consequence_type = self.check_block(consequence);
        self.pop_scope();

        if let Some(alternative) = alternative {
            self.push_scope();
            self.check_block(alternative);
            self.pop_scope();
        }

        consequence_type
    }

    /// Verifies a call expression.
    ///
    /// Calls whose callee type is unresolved (`Any`) or a struct
    /// constructor pass through under-checked: arguments are still walked
    /// for their own diagnostics, but arity and argument types are
    /// deliberately not enforced.
    fn check_call(&mut self, function: &Expr, arguments: &[Expr]) -> Type {
        let function_type = self.check_expression(function);

        for argument in arguments {
            self.check_expression(argument);
        }

        match function_type {
            Type::Function { ret, .. } => *ret,
            Type::Struct(name) => Type::Struct(name),
            _ => Type::Any,
        }
    }

    /// Verifies member access. Struct fields resolve to their declared
    /// types; anything else, method names included, is `Any`.
    fn check_member(&mut self, object: &Expr, member: &str) -> Type {
        let object_type = self.check_expression(object);

        if let Type::Struct(name) = object_type.unwrap_mutable()
           && let Some(fields) = self.struct_fields(name)
        {
            if let Some(field_type) = fields.get(member) {
                return field_type.clone();
            }
            // No declared field by that name; it may be a method reference.
            return Type::Any;
        }

        Type::Any
    }

    fn check_index(&mut self, object: &Expr, index: &Expr, line: usize) -> Type {
        let object_type = self.check_expression(object);
        let index_type = self.check_expression(index);

        match object_type.unwrap_mutable() {
            Type::List(element) => {
                if !index_type.is_integer() {
                    self.add_error(TypeError::ListIndexNotInteger { line });
                }
                (**element).clone()
            },
            Type::Map(_, value) => {
                if !index_type.is_string() {
                    self.add_error(TypeError::MapKeyNotString { line });
                }
                (**value).clone()
            },
            Type::String => {
                if !index_type.is_integer() {
                    self.add_error(TypeError::StringIndexNotInteger { line });
                }
                Type::String
            },
            _ => Type::Any,
        }
    }

    /// Infers a list literal's element type from its first element; later
    /// elements must be assignable to it unless it is `Any`.
    fn check_list(&mut self, elements: &[Expr], line: usize) -> Type {
        let Some(first) = elements.first() else {
            return Type::List(Box::new(Type::Any));
        };

        let element_type = self.check_expression(first);
        for element in &elements[1..] {
            let t = self.check_expression(element);
            if !Type::assignable(&element_type, &t) && !matches!(element_type, Type::Any) {
                self.add_error(TypeError::ListElementMismatch { line });
            }
        }

        Type::List(Box::new(element_type))
    }

    /// Infers a map literal's value type from its first pair.
    fn check_map(&mut self, pairs: &[(Expr, Expr)]) -> Type {
        let value_type = match pairs.first() {
            Some((_, value)) => self.check_expression(value),
            None => Type::Any,
        };

        Type::Map(Box::new(Type::String), Box::new(value_type))
    }

    fn check_struct_literal(&mut self,
                            name: &str,
                            fields: &[(String, Expr)],
                            line: usize)
                            -> Type {
        if self.struct_fields(name).is_none() {
            self.add_error(TypeError::UndefinedStruct { name: name.to_string(),
                                                        line });
            return Type::Any;
        }

        for (field, value) in fields {
            let Some(expected) = self.struct_fields(name).and_then(|f| f.get(field)).cloned()
            else {
                self.add_error(TypeError::UndefinedField { field:       field.clone(),
                                                           struct_name: name.to_string(),
                                                           line });
                continue;
            };

            let actual = self.check_expression(value);
            if !Type::assignable(&expected, &actual) {
                self.add_error(TypeError::FieldMismatch { value: actual,
                                                          field: field.clone(),
                                                          expected,
                                                          line });
            }
        }

        Type::Struct(name.to_string())
    }

    /// Verifies a `.with { ... }` update field-by-field against the struct's
    /// declared field types.
    fn check_with(&mut self, object: &Expr, updates: &[(String, Expr)], line: usize) -> Type {
        let object_type = self.check_expression(object);

        let Type::Struct(name) = object_type.unwrap_mutable().clone() else {
            self.add_error(TypeError::WithOnNonStruct { line });
            return Type::Any;
        };

        for (field, value) in updates {
            let Some(expected) = self.struct_fields(&name).and_then(|f| f.get(field)).cloned()
            else {
                self.add_error(TypeError::UndefinedField { field:       field.clone(),
                                                           struct_name: name.clone(),
                                                           line });
                continue;
            };

            let actual = self.check_expression(value);
            if !Type::assignable(&expected, &actual) {
                self.add_error(TypeError::FieldMismatch { value: actual,
                                                          field: field.clone(),
                                                          expected,
                                                          line });
            }
        }

        Type::Struct(name)
    }

    /// Verifies a `match` expression. Pattern bindings enter each case's
    /// scope as `Any`; wrapper payload types are not modeled.
    fn check_match(&mut self, value: &Expr, cases: &[MatchCase]) -> Type {
        self.check_expression(value);

        let mut result = Type::Null;
        for case in cases {
            self.push_scope();

            let binding = match &case.pattern {
                Pattern::Some(binding) | Pattern::Ok(binding) | Pattern::Err(binding) => {
                    binding.clone()
                },
                Pattern::Binding(name) => Some(name.clone()),
                Pattern::None => None,
            };
            if let Some(name) = binding {
                self.define(name, Type::Any);
            }

            result = self.check_block(&case.body);
            self.pop_scope();
        }

        result
    }
}
