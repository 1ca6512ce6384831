use crate::interpreter::{evaluator::{EvalResult, Evaluator, Signal,
                                     method::list::expect_function},
                         value::Value};

impl Evaluator {
    /// Built-in methods on options.
    ///
    /// `unwrap` on `None` is an immediate runtime failure, not a value that
    /// can be chained past; `unwrapOr` is the non-failing form.
    pub(super) fn option_method(&mut self,
                                inner: Option<&Value>,
                                method: &str,
                                args: &[Value])
                                -> EvalResult<Option<Value>> {
        match method {
            "unwrap" => match inner {
                Some(value) => Ok(Some(value.clone())),
                None => Err(Signal::fail("called unwrap on None")),
            },

            "unwrapOr" => {
                if args.len() != 1 {
                    return Err(Signal::fail("unwrapOr() requires 1 argument"));
                }
                match inner {
                    Some(value) => Ok(Some(value.clone())),
                    None => Ok(Some(args[0].clone())),
                }
            },

            "map" => {
                if args.len() != 1 {
                    return Err(Signal::fail("map() requires 1 argument"));
                }
                let Some(value) = inner else {
                    return Ok(Some(Value::Option(None)));
                };
                let function = expect_function(&args[0], "map() argument must be a function")?;

                let outcome = self.apply_function(function, &[value.clone()])?;
                Ok(Some(Value::Option(Some(Box::new(outcome)))))
            },

            "isSome" => Ok(Some(Value::Boolean(inner.is_some()))),
            "isNone" => Ok(Some(Value::Boolean(inner.is_none()))),

            _ => Ok(None),
        }
    }
}
