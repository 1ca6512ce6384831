use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{ast::{Expr, InfixOperator, MatchCase, Parameter, Pattern, PrefixOperator},
            interpreter::{environment::Environment,
                          evaluator::{EvalResult, Evaluator, Signal},
                          value::{ErrorValue, FunctionBody, FunctionValue, ResultValue,
                                  StructValue, Value}}};

impl Evaluator {
    /// Evaluates a single expression to a value.
    pub(super) fn eval_expression(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Value> {
        match expr {
            Expr::Integer { value, .. } => Ok(Value::Integer(*value)),
            Expr::Float { value, .. } => Ok(Value::Float(*value)),
            Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expr::Boolean { value, .. } => Ok(Value::Boolean(*value)),

            Expr::Identifier { name, .. } => {
                env.get(name)
                   .ok_or_else(|| Signal::fail(format!("undefined: {name}")))
            },

            Expr::Prefix { op, right, .. } => {
                let right = self.eval_expression(right, env)?.unwrapped();
                eval_prefix(*op, &right)
            },

            Expr::Infix { left, op, right, .. } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                eval_infix(*op, &left.unwrapped(), &right.unwrapped())
            },

            Expr::Rebind { name, value, .. } => self.eval_rebind(name, value, env),

            Expr::If { condition,
                       consequence,
                       alternative,
                       .. } => {
                let condition = self.eval_expression(condition, env)?;

                if condition.is_truthy() {
                    self.eval_block(consequence, &Environment::enclosed(env))
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, &Environment::enclosed(env))
                } else {
                    Ok(Value::Null)
                }
            },

            Expr::Lambda { parameters, body, .. } => {
                let parameters = parameters.iter()
                                           .map(|name| Parameter { name:      name.clone(),
                                                                   type_hint: None, })
                                           .collect();
                Ok(Value::Function(Rc::new(FunctionValue { name: String::new(),
                                                           parameters,
                                                           body:
                                                               FunctionBody::Lambda(Rc::clone(body)),
                                                           env: env.clone() })))
            },

            Expr::Call { function, arguments, .. } => self.eval_call(function, arguments, env),

            Expr::Member { object, member, .. } => self.eval_member(object, member, env),

            Expr::Index { object, index, .. } => {
                let object = self.eval_expression(object, env)?.unwrapped();
                let index = self.eval_expression(index, env)?.unwrapped();
                eval_index(&object, &index)
            },

            Expr::List { elements, .. } => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Value::List(Rc::new(elements)))
            },

            Expr::Map { pairs, .. } => self.eval_map_literal(pairs, env),

            Expr::StructLiteral { name, fields, .. } => {
                self.eval_struct_literal(name, fields, env)
            },

            Expr::With { object, updates, .. } => self.eval_with(object, updates, env),

            Expr::OptionLiteral { value, .. } => match value {
                Some(value) => {
                    let inner = self.eval_expression(value, env)?;
                    Ok(Value::Option(Some(Box::new(inner))))
                },
                None => Ok(Value::Option(None)),
            },

            Expr::ResultLiteral { is_ok, value, .. } => {
                let inner = self.eval_expression(value, env)?;

                if *is_ok {
                    return Ok(ResultValue::Ok(inner).into());
                }

                // A freshly built error captures the function it was born
                // in; enrichment later fills the receiver, never overwrites.
                let message = match &inner {
                    Value::Str(message) => message.clone(),
                    other => other.to_string(),
                };
                Ok(ResultValue::Err(ErrorValue::in_method(self.current_fn.clone(), message)).into())
            },

            Expr::Match { value, cases, .. } => self.eval_match(value, cases, env),

            Expr::Mutable { value, .. } => {
                let inner = self.eval_expression(value, env)?;
                Ok(Value::Mutable(Rc::new(RefCell::new(inner.unwrapped()))))
            },
        }
    }

    /// Evaluates a list of expressions in order.
    pub(super) fn eval_expressions(&mut self,
                                   exprs: &[Expr],
                                   env: &Environment)
                                   -> EvalResult<Vec<Value>> {
        exprs.iter()
             .map(|expr| self.eval_expression(expr, env))
             .collect()
    }

    /// Evaluates a `==` rebind of a `Mutable` binding.
    ///
    /// The stored value is read through `Mutable` before it goes into the
    /// cell, so a cell never nests another cell. The rebind's value is what
    /// was stored.
    fn eval_rebind(&mut self, name: &str, value: &Expr, env: &Environment) -> EvalResult<Value> {
        let value = self.eval_expression(value, env)?;

        let existing = env.get(name)
                          .ok_or_else(|| Signal::fail(format!("undefined: {name}")))?;

        let Value::Mutable(cell) = existing else {
            return Err(Signal::fail(format!("{name} is not mutable")));
        };

        let stored = value.unwrapped();
        *cell.borrow_mut() = stored.clone();
        Ok(stored)
    }

    /// Evaluates member access: struct fields and module exports.
    fn eval_member(&mut self, object: &Expr, member: &str, env: &Environment) -> EvalResult<Value> {
        let object = self.eval_expression(object, env)?;

        if let Value::Struct(instance) = object.unwrapped() {
            return instance.fields
                           .get(member)
                           .cloned()
                           .ok_or_else(|| {
                               Signal::fail(format!("undefined field {member} on {}",
                                                    instance.definition.name))
                           });
        }

        if let Value::Module(module) = &object {
            // Names with the reserved private prefix are not exported.
            if !member.starts_with('_')
               && let Some(value) = module.exports.get(member)
            {
                return Ok(value);
            }
            return Err(Signal::fail(format!("undefined export {member} in module {}",
                                            module.name)));
        }

        Err(Signal::fail(format!("cannot access member of {}", object.type_name())))
    }

    /// Evaluates a map literal; keys must evaluate to strings.
    fn eval_map_literal(&mut self,
                        pairs: &[(Expr, Expr)],
                        env: &Environment)
                        -> EvalResult<Value> {
        let mut map = HashMap::new();

        for (key_expr, value_expr) in pairs {
            let key = self.eval_expression(key_expr, env)?;

            let Value::Str(key) = key.unwrapped() else {
                return Err(Signal::fail("map key must be a string"));
            };

            let value = self.eval_expression(value_expr, env)?;
            map.insert(key, value);
        }

        Ok(Value::Map(Rc::new(map)))
    }

    /// Evaluates a struct literal against its registered definition.
    fn eval_struct_literal(&mut self,
                           name: &str,
                           fields: &[(String, Expr)],
                           env: &Environment)
                           -> EvalResult<Value> {
        let Some(definition) = self.structs.get(name).cloned() else {
            return Err(Signal::fail(format!("undefined struct: {name}")));
        };

        let mut field_values = HashMap::new();
        for (field, value_expr) in fields {
            let value = self.eval_expression(value_expr, env)?;
            field_values.insert(field.clone(), value);
        }

        Ok(Value::Struct(Rc::new(StructValue { definition,
                                               fields: field_values })))
    }

    /// Evaluates `.with { ... }`: a new struct sharing the definition, with
    /// the given fields overlaid. The original is untouched.
    fn eval_with(&mut self,
                 object: &Expr,
                 updates: &[(String, Expr)],
                 env: &Environment)
                 -> EvalResult<Value> {
        let object = self.eval_expression(object, env)?;

        let Value::Struct(instance) = object.unwrapped() else {
            return Err(Signal::fail(format!("with can only be used on structs, got {}",
                                            object.type_name())));
        };

        let mut update_values = HashMap::new();
        for (field, value_expr) in updates {
            let value = self.eval_expression(value_expr, env)?;
            update_values.insert(field.clone(), value);
        }

        Ok(Value::Struct(Rc::new(instance.with(update_values))))
    }

    /// Evaluates a `match`: the first case whose pattern matches runs in a
    /// child environment holding the pattern's bindings; no match is null.
    fn eval_match(&mut self,
                  value: &Expr,
                  cases: &[MatchCase],
                  env: &Environment)
                  -> EvalResult<Value> {
        let value = self.eval_expression(value, env)?;

        for case in cases {
            if let Some(bindings) = match_pattern(&value, &case.pattern) {
                let case_env = Environment::enclosed(env);
                for (name, bound) in bindings {
                    case_env.set(name, bound);
                }
                return self.eval_block(&case.body, &case_env);
            }
        }

        Ok(Value::Null)
    }
}

/// Tests a value against a pattern, producing the case's bindings on match.
///
/// Wrapper patterns compare shape only; payloads written as identifiers bind
/// the inner value (the error side binds the error value itself). A bare
/// identifier matches anything and binds the whole value.
fn match_pattern(value: &Value, pattern: &Pattern) -> Option<Vec<(String, Value)>> {
    match pattern {
        Pattern::Some(binding) => match value {
            Value::Option(Some(inner)) => {
                let mut bindings = Vec::new();
                if let Some(name) = binding {
                    bindings.push((name.clone(), (**inner).clone()));
                }
                Some(bindings)
            },
            _ => None,
        },

        Pattern::None => match value {
            Value::Option(None) => Some(Vec::new()),
            _ => None,
        },

        Pattern::Ok(binding) => match value {
            Value::Result(result) => match result.as_ref() {
                ResultValue::Ok(inner) => {
                    let mut bindings = Vec::new();
                    if let Some(name) = binding {
                        bindings.push((name.clone(), inner.clone()));
                    }
                    Some(bindings)
                },
                ResultValue::Err(_) => None,
            },
            _ => None,
        },

        Pattern::Err(binding) => match value {
            Value::Result(result) => match result.as_ref() {
                ResultValue::Err(error) => {
                    let mut bindings = Vec::new();
                    if let Some(name) = binding {
                        bindings.push((name.clone(), Value::Error(error.clone())));
                    }
                    Some(bindings)
                },
                ResultValue::Ok(_) => None,
            },
            _ => None,
        },

        Pattern::Binding(name) => Some(vec![(name.clone(), value.clone())]),
    }
}

/// Indexes an already-unwrapped receiver with an already-unwrapped index.
///
/// Lists and strings take integer indexes with bounds checks; maps take
/// string keys and answer a missing key with `None` rather than an error.
fn eval_index(object: &Value, index: &Value) -> EvalResult<Value> {
    match object {
        Value::List(elements) => {
            let Value::Integer(position) = index else {
                return Err(Signal::fail("list index must be an integer"));
            };
            usize::try_from(*position)
                .ok()
                .and_then(|position| elements.get(position).cloned())
                .ok_or_else(|| Signal::fail("index out of bounds"))
        },

        Value::Map(pairs) => {
            let Value::Str(key) = index else {
                return Err(Signal::fail("map key must be a string"));
            };
            match pairs.get(key) {
                Some(value) => Ok(value.clone()),
                None => Ok(Value::Option(None)),
            }
        },

        Value::Str(text) => {
            let Value::Integer(position) = index else {
                return Err(Signal::fail("string index must be an integer"));
            };
            usize::try_from(*position)
                .ok()
                .and_then(|position| text.as_bytes().get(position).copied())
                .map(|byte| Value::Str((byte as char).to_string()))
                .ok_or_else(|| Signal::fail("index out of bounds"))
        },

        other => Err(Signal::fail(format!("cannot index {}", other.type_name()))),
    }
}

/// Applies a prefix operator to an already-unwrapped operand.
fn eval_prefix(op: PrefixOperator, right: &Value) -> EvalResult<Value> {
    match op {
        PrefixOperator::Negate => match right {
            Value::Integer(n) => Ok(Value::Integer(-n)),
            Value::Float(n) => Ok(Value::Float(-n)),
            other => Err(Signal::fail(format!("unknown operator: -{}", other.type_name()))),
        },
        PrefixOperator::Not => Ok(Value::Boolean(!right.is_truthy())),
    }
}

/// Applies a binary operator to already-unwrapped operands.
///
/// `and` and `or` combine truthiness; both sides are already evaluated, so
/// there is no short-circuit. `is` is deep value equality. Arithmetic and
/// comparisons dispatch on the operand tags, widening to float when the
/// sides mix.
fn eval_infix(op: InfixOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    match op {
        InfixOperator::And => return Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
        InfixOperator::Or => return Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
        InfixOperator::Is => return Ok(Value::Boolean(Value::equals(left, right))),
        _ => {},
    }

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_infix(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => eval_float_infix(op, *a, *b),
        (Value::Integer(a), Value::Float(b)) => eval_float_infix(op, *a as f64, *b),
        (Value::Float(a), Value::Integer(b)) => eval_float_infix(op, *a, *b as f64),
        (Value::Str(a), Value::Str(b)) => eval_string_infix(op, a, b),
        _ => Err(Signal::fail(format!("type mismatch: {} {op} {}",
                                      left.type_name(),
                                      right.type_name()))),
    }
}

fn eval_integer_infix(op: InfixOperator, left: i64, right: i64) -> EvalResult<Value> {
    match op {
        InfixOperator::Add => Ok(Value::Integer(left.wrapping_add(right))),
        InfixOperator::Sub => Ok(Value::Integer(left.wrapping_sub(right))),
        InfixOperator::Mul => Ok(Value::Integer(left.wrapping_mul(right))),
        InfixOperator::Div => {
            if right == 0 {
                return Err(Signal::fail("division by zero"));
            }
            Ok(Value::Integer(left.wrapping_div(right)))
        },
        InfixOperator::Mod => {
            if right == 0 {
                return Err(Signal::fail("division by zero"));
            }
            Ok(Value::Integer(left.wrapping_rem(right)))
        },
        InfixOperator::Greater => Ok(Value::Boolean(left > right)),
        InfixOperator::Less => Ok(Value::Boolean(left < right)),
        InfixOperator::GreaterEqual => Ok(Value::Boolean(left >= right)),
        InfixOperator::LessEqual => Ok(Value::Boolean(left <= right)),
        _ => Err(Signal::fail(format!("unknown operator: Integer {op} Integer"))),
    }
}

fn eval_float_infix(op: InfixOperator, left: f64, right: f64) -> EvalResult<Value> {
    match op {
        InfixOperator::Add => Ok(Value::Float(left + right)),
        InfixOperator::Sub => Ok(Value::Float(left - right)),
        InfixOperator::Mul => Ok(Value::Float(left * right)),
        InfixOperator::Div => {
            if right == 0.0 {
                return Err(Signal::fail("division by zero"));
            }
            Ok(Value::Float(left / right))
        },
        InfixOperator::Greater => Ok(Value::Boolean(left > right)),
        InfixOperator::Less => Ok(Value::Boolean(left < right)),
        InfixOperator::GreaterEqual => Ok(Value::Boolean(left >= right)),
        InfixOperator::LessEqual => Ok(Value::Boolean(left <= right)),
        _ => Err(Signal::fail(format!("unknown operator: Float {op} Float"))),
    }
}

fn eval_string_infix(op: InfixOperator, left: &str, right: &str) -> EvalResult<Value> {
    match op {
        InfixOperator::Add => Ok(Value::Str(format!("{left}{right}"))),
        InfixOperator::Greater => Ok(Value::Boolean(left > right)),
        InfixOperator::Less => Ok(Value::Boolean(left < right)),
        InfixOperator::GreaterEqual => Ok(Value::Boolean(left >= right)),
        InfixOperator::LessEqual => Ok(Value::Boolean(left <= right)),
        _ => Err(Signal::fail(format!("unknown operator: String {op} String"))),
    }
}
