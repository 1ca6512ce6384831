/// Built-in methods on lists.
mod list;

/// Built-in methods on maps.
mod map;

/// Built-in methods on strings.
mod string;

/// Built-in methods on results, including the chaining combinators.
mod result;

/// Built-in methods on options.
mod option;

use std::mem;

use crate::{ast::Expr,
            interpreter::{environment::Environment,
                          evaluator::{EvalResult, Evaluator, Signal, function::bind_parameters},
                          value::{FunctionBody, ResultValue, Value}}};

impl Evaluator {
    /// Dispatches `receiver.method(args)`.
    ///
    /// Built-in methods keyed by the receiver's runtime type are tried
    /// first; extension methods registered against the type's name come
    /// second. An unknown method on both paths is a runtime error.
    pub(super) fn eval_method_call(&mut self,
                                   object: &Expr,
                                   method: &str,
                                   arguments: &[Expr],
                                   env: &Environment)
                                   -> EvalResult<Value> {
        let receiver = self.eval_expression(object, env)?;
        let args = self.eval_expressions(arguments, env)?;

        if let Some(result) = self.eval_builtin_method(&receiver, method, &args)? {
            return Ok(result);
        }

        self.eval_extension_method(&receiver, method, &args)
    }

    /// Tries the closed set of built-in methods for the receiver's runtime
    /// type, reading the receiver through `Mutable`.
    ///
    /// # Returns
    /// `Ok(None)` when the receiver's type has no built-in method by that
    /// name, leaving the extension registry as the fallback.
    fn eval_builtin_method(&mut self,
                           receiver: &Value,
                           method: &str,
                           args: &[Value])
                           -> EvalResult<Option<Value>> {
        match receiver.unwrapped() {
            Value::List(elements) => self.list_method(&elements, method, args),
            Value::Map(pairs) => map::map_method(&pairs, method, args),
            Value::Str(text) => string::string_method(&text, method, args),
            Value::Result(result) => self.result_method(&result, method, args),
            Value::Option(inner) => self.option_method(inner.as_deref(), method, args),
            Value::Module(module) => {
                // A module "method" is one of its exports, applied in place.
                if method.starts_with('_') {
                    return Ok(None);
                }
                let Some(export) = module.exports.get(method) else {
                    return Ok(None);
                };
                self.apply_function(&export, args).map(Some)
            },
            _ => Ok(None),
        }
    }

    /// Dispatches into the extension-method registry.
    ///
    /// The receiver unwraps through `Mutable`, and additionally through
    /// `Result`: an error receiver short-circuits without any lookup,
    /// while `Ok(x)` unwraps to `x` before the method runs. The method body
    /// executes with `this` bound to the unwrapped receiver. A failing
    /// `Result` coming back is enriched with the method name and the
    /// receiver's rendering, but only where not already set, so the first
    /// failure in a chain keeps its provenance.
    fn eval_extension_method(&mut self,
                             receiver: &Value,
                             method: &str,
                             args: &[Value])
                             -> EvalResult<Value> {
        let mut target = receiver.unwrapped();

        if let Value::Result(result) = &target {
            match result.as_ref() {
                ResultValue::Err(_) => return Ok(target.clone()),
                ResultValue::Ok(inner) => target = inner.clone(),
            }
        }

        let type_name = target.type_name().to_string();
        let Some(function) = self.extensions
                                 .get(&type_name)
                                 .and_then(|table| table.get(method))
                                 .cloned()
        else {
            return Err(Signal::fail(format!("undefined method {method} on {type_name}")));
        };

        let call_env = bind_parameters(&function, args);
        call_env.set("this", target.clone());

        let previous = mem::replace(&mut self.current_fn, method.to_string());
        let result = match &function.body {
            FunctionBody::Block(block) => self.eval_block(block, &call_env),
            FunctionBody::Lambda(body) => self.eval_expression(body, &call_env),
        };
        self.current_fn = previous;

        let value = match result {
            Err(Signal::Return(value)) => value,
            other => other?,
        };

        if let Value::Result(result) = &value
           && let ResultValue::Err(error) = result.as_ref()
        {
            let mut enriched = error.clone();
            enriched.enrich(method, &target);
            return Ok(ResultValue::Err(enriched).into());
        }

        Ok(value)
    }
}
