use std::rc::Rc;

use crate::interpreter::{evaluator::{EvalResult, Evaluator, Signal},
                         value::Value};

impl Evaluator {
    /// Built-in methods on lists.
    ///
    /// All "mutating" operations are persistent: `append` hands back a new
    /// list and leaves the receiver's elements and length untouched.
    pub(super) fn list_method(&mut self,
                              elements: &Rc<Vec<Value>>,
                              method: &str,
                              args: &[Value])
                              -> EvalResult<Option<Value>> {
        match method {
            "length" => Ok(Some(Value::Integer(elements.len() as i64))),

            "get" => {
                if args.len() != 1 {
                    return Err(Signal::fail("get() requires 1 argument"));
                }
                let Value::Integer(position) = args[0].unwrapped() else {
                    return Err(Signal::fail("get() argument must be an integer"));
                };
                let found = usize::try_from(position)
                    .ok()
                    .and_then(|position| elements.get(position))
                    .map(|element| Box::new(element.clone()));
                Ok(Some(Value::Option(found)))
            },

            "append" => {
                if args.len() != 1 {
                    return Err(Signal::fail("append() requires 1 argument"));
                }
                let mut extended = Vec::with_capacity(elements.len() + 1);
                extended.extend(elements.iter().cloned());
                extended.push(args[0].clone());
                Ok(Some(Value::List(Rc::new(extended))))
            },

            "map" => {
                if args.len() != 1 {
                    return Err(Signal::fail("map() requires 1 argument"));
                }
                let function = expect_function(&args[0], "map() argument must be a function")?;
                let mut mapped = Vec::with_capacity(elements.len());
                for element in elements.iter() {
                    mapped.push(self.apply_function(function, &[element.clone()])?);
                }
                Ok(Some(Value::List(Rc::new(mapped))))
            },

            "filter" => {
                if args.len() != 1 {
                    return Err(Signal::fail("filter() requires 1 argument"));
                }
                let function = expect_function(&args[0], "filter() argument must be a function")?;
                let mut kept = Vec::new();
                for element in elements.iter() {
                    if self.apply_function(function, &[element.clone()])?.is_truthy() {
                        kept.push(element.clone());
                    }
                }
                Ok(Some(Value::List(Rc::new(kept))))
            },

            "reduce" => {
                if args.len() != 2 {
                    return Err(Signal::fail("reduce() requires 2 arguments"));
                }
                let function =
                    expect_function(&args[0], "reduce() first argument must be a function")?;
                let mut accumulator = args[1].clone();
                for element in elements.iter() {
                    accumulator =
                        self.apply_function(function, &[accumulator, element.clone()])?;
                }
                Ok(Some(accumulator))
            },

            "find" => {
                if args.len() != 1 {
                    return Err(Signal::fail("find() requires 1 argument"));
                }
                let function = expect_function(&args[0], "find() argument must be a function")?;
                for element in elements.iter() {
                    if self.apply_function(function, &[element.clone()])?.is_truthy() {
                        return Ok(Some(Value::Option(Some(Box::new(element.clone())))));
                    }
                }
                Ok(Some(Value::Option(None)))
            },

            "contains" => {
                if args.len() != 1 {
                    return Err(Signal::fail("contains() requires 1 argument"));
                }
                let found = elements.iter().any(|element| Value::equals(element, &args[0]));
                Ok(Some(Value::Boolean(found)))
            },

            _ => Ok(None),
        }
    }
}

/// Requires a callable argument for the higher-order list methods.
pub(super) fn expect_function<'a>(value: &'a Value, message: &str) -> EvalResult<&'a Value> {
    match value {
        Value::Function(_) => Ok(value),
        _ => Err(Signal::fail(message)),
    }
}
