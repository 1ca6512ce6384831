use std::rc::Rc;

use crate::{ast::{Block, Expr, Statement},
            interpreter::{environment::Environment,
                          evaluator::{EvalResult, Evaluator, Signal},
                          value::{FunctionBody, FunctionValue, StructDefinition, Value}}};

impl Evaluator {
    /// Evaluates a single statement.
    ///
    /// Statements yield the value they produce: a `def` yields what it
    /// bound, an expression statement its value, declarations their declared
    /// value. That is what makes "last statement value" the natural result
    /// of blocks and programs.
    pub(super) fn eval_statement(&mut self,
                                 statement: &Statement,
                                 env: &Environment)
                                 -> EvalResult<Value> {
        match statement {
            Statement::Def { name, value, .. } => {
                // A failed evaluation escapes, but an error *value* produced
                // by the initializer is data and binds like anything else.
                let value = self.eval_expression(value, env)?;
                env.set(name.clone(), value.clone());
                Ok(value)
            },

            Statement::Function(def) => {
                let function =
                    Value::Function(Rc::new(FunctionValue { name:       def.name.clone(),
                                                            parameters: def.parameters.clone(),
                                                            body:
                                                                FunctionBody::Block(Rc::clone(&def.body)),
                                                            env:        env.clone(), }));
                env.set(def.name.clone(), function.clone());
                Ok(function)
            },

            Statement::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.eval_expression(value, env)?,
                    None => Value::Null,
                };
                Err(Signal::Return(value))
            },

            Statement::Expression { expr, .. } => self.eval_expression(expr, env),

            Statement::While { condition, body, .. } => self.eval_while(condition, body, env),

            Statement::For { variable,
                             iterable,
                             body,
                             .. } => self.eval_for(variable, iterable, body, env),

            Statement::Break { .. } => Err(Signal::Break),
            Statement::Continue { .. } => Err(Signal::Continue),

            Statement::Struct { name, fields, .. } => {
                let definition = Rc::new(StructDefinition { name:   name.clone(),
                                                            fields: fields.clone(), });
                self.structs.insert(name.clone(), Rc::clone(&definition));

                let value = Value::StructDef(definition);
                env.set(name.clone(), value.clone());
                Ok(value)
            },

            Statement::Extend { type_name, methods, .. } => {
                let table = self.extensions.entry(type_name.clone()).or_default();
                for method in methods {
                    let function =
                        Rc::new(FunctionValue { name:       method.name.clone(),
                                                parameters: method.parameters.clone(),
                                                body:       FunctionBody::Block(Rc::clone(&method.body)),
                                                env:        env.clone(), });
                    table.insert(method.name.clone(), function);
                }
                Ok(Value::Null)
            },

            Statement::Import { path, .. } => self.eval_import(path, env),
        }
    }

    /// Evaluates the statements of a block in order.
    ///
    /// Any signal (return, break, continue, or error) short-circuits the
    /// remaining statements and propagates unchanged; the block itself
    /// intercepts nothing.
    pub(super) fn eval_block(&mut self, block: &Block, env: &Environment) -> EvalResult<Value> {
        let mut result = Value::Null;
        for statement in &block.statements {
            result = self.eval_statement(statement, env)?;
        }
        Ok(result)
    }

    /// Evaluates a `while` loop.
    ///
    /// Each iteration runs in a fresh child environment. `break` ends the
    /// loop with null, `continue` moves to the next condition check, and a
    /// `return` or error aborts the loop and keeps propagating.
    fn eval_while(&mut self, condition: &Expr, body: &Block, env: &Environment) -> EvalResult<Value> {
        loop {
            let condition_value = self.eval_expression(condition, env)?;
            if !condition_value.is_truthy() {
                break;
            }

            match self.eval_block(body, &Environment::enclosed(env)) {
                Ok(_) | Err(Signal::Continue) => {},
                Err(Signal::Break) => break,
                Err(signal) => return Err(signal),
            }
        }

        Ok(Value::Null)
    }

    /// Evaluates a `for x in list` loop over the elements of a list,
    /// reading the iterable through `Mutable` if needed.
    fn eval_for(&mut self,
                variable: &str,
                iterable: &Expr,
                body: &Block,
                env: &Environment)
                -> EvalResult<Value> {
        let iterable_value = self.eval_expression(iterable, env)?;

        let Value::List(elements) = iterable_value.unwrapped() else {
            return Err(Signal::fail(format!("cannot iterate over {}",
                                            iterable_value.type_name())));
        };

        for element in elements.iter() {
            let loop_env = Environment::enclosed(env);
            loop_env.set(variable, element.clone());

            match self.eval_block(body, &loop_env) {
                Ok(_) | Err(Signal::Continue) => {},
                Err(Signal::Break) => return Ok(Value::Null),
                Err(signal) => return Err(signal),
            }
        }

        Ok(Value::Null)
    }
}
