use crate::interpreter::{evaluator::{EvalResult, Evaluator, Signal,
                                     method::list::expect_function},
                         value::{ResultValue, Value}};

impl Evaluator {
    /// Built-in methods on results: the short-circuit chaining combinators
    /// and the unwrappers.
    ///
    /// `then` and `map` never invoke their closure once the receiver is an
    /// error; the error passes through untouched. `then` flattens a
    /// `Result` returned by its closure; `map` always re-wraps in `Ok`.
    pub(super) fn result_method(&mut self,
                                result: &ResultValue,
                                method: &str,
                                args: &[Value])
                                -> EvalResult<Option<Value>> {
        match method {
            "then" => {
                if args.len() != 1 {
                    return Err(Signal::fail("then() requires 1 argument"));
                }
                let ResultValue::Ok(inner) = result else {
                    return Ok(Some(result.clone().into()));
                };
                let function = expect_function(&args[0], "then() argument must be a function")?;

                let outcome = self.apply_function(function, &[inner.clone()])?;
                if matches!(outcome, Value::Result(_)) {
                    return Ok(Some(outcome));
                }
                Ok(Some(ResultValue::Ok(outcome).into()))
            },

            "map" => {
                if args.len() != 1 {
                    return Err(Signal::fail("map() requires 1 argument"));
                }
                let ResultValue::Ok(inner) = result else {
                    return Ok(Some(result.clone().into()));
                };
                let function = expect_function(&args[0], "map() argument must be a function")?;

                let outcome = self.apply_function(function, &[inner.clone()])?;
                Ok(Some(ResultValue::Ok(outcome).into()))
            },

            "unwrap" => match result {
                ResultValue::Ok(inner) => Ok(Some(inner.clone())),
                // The stored error comes out as a first-class value; it can
                // be bound, rendered, or matched like any other.
                ResultValue::Err(error) => Ok(Some(Value::Error(error.clone()))),
            },

            "unwrapOr" => {
                if args.len() != 1 {
                    return Err(Signal::fail("unwrapOr() requires 1 argument"));
                }
                match result {
                    ResultValue::Ok(inner) => Ok(Some(inner.clone())),
                    ResultValue::Err(_) => Ok(Some(args[0].clone())),
                }
            },

            _ => Ok(None),
        }
    }
}
