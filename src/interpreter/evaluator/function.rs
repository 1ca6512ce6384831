use std::mem;

use crate::{ast::Expr,
            interpreter::{environment::Environment,
                          evaluator::{EvalResult, Evaluator, Signal},
                          value::{FunctionBody, FunctionValue, Value}}};

impl Evaluator {
    /// Evaluates a call expression.
    ///
    /// A call whose callee is written as member access is a method call and
    /// goes through dispatch; everything else evaluates the callee and
    /// applies it directly.
    pub(super) fn eval_call(&mut self,
                            function: &Expr,
                            arguments: &[Expr],
                            env: &Environment)
                            -> EvalResult<Value> {
        if let Expr::Member { object, member, .. } = function {
            return self.eval_method_call(object, member, arguments, env);
        }

        let function = self.eval_expression(function, env)?;
        let args = self.eval_expressions(arguments, env)?;
        self.apply_function(&function, &args)
    }

    /// Applies a callable value to already-evaluated arguments.
    ///
    /// User functions run their body in a child of the environment captured
    /// at the definition site, with the current-function name swapped in for
    /// error attribution and a trailing `Return` unwrapped into its value.
    /// Builtins apply directly. Anything else is not callable.
    pub(super) fn apply_function(&mut self, function: &Value, args: &[Value]) -> EvalResult<Value> {
        match function {
            Value::Function(function) => {
                let call_env = bind_parameters(function, args);

                let previous = mem::replace(&mut self.current_fn, function.name.clone());
                let result = match &function.body {
                    FunctionBody::Block(block) => self.eval_block(block, &call_env),
                    FunctionBody::Lambda(body) => self.eval_expression(body, &call_env),
                };
                self.current_fn = previous;

                match result {
                    Err(Signal::Return(value)) => Ok(value),
                    other => other,
                }
            },

            Value::Builtin(_, builtin) => builtin(args).map_err(Signal::Error),

            Value::StructDef(_) => {
                Err(Signal::fail(format!("{} is not callable", function.type_name())))
            },

            other => Err(Signal::fail(format!("not a function: {}", other.type_name()))),
        }
    }
}

/// Builds the call environment: a child of the captured environment with
/// parameters bound positionally.
///
/// Arity is deliberately unenforced: extra arguments are dropped and
/// missing parameters stay unbound until the body references them.
pub(super) fn bind_parameters(function: &FunctionValue, args: &[Value]) -> Environment {
    let env = Environment::enclosed(&function.env);
    for (parameter, arg) in function.parameters.iter().zip(args) {
        env.set(parameter.name.clone(), arg.clone());
    }
    env
}
