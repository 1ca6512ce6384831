use std::rc::Rc;

use crate::interpreter::{evaluator::{EvalResult, Signal},
                         value::Value};

/// Built-in methods on strings. Lengths and indexes are byte-based.
pub(super) fn string_method(text: &str, method: &str, args: &[Value]) -> EvalResult<Option<Value>> {
    match method {
        "length" => Ok(Some(Value::Integer(text.len() as i64))),

        "split" => {
            if args.len() != 1 {
                return Err(Signal::fail("split() requires 1 argument"));
            }
            let Value::Str(separator) = args[0].unwrapped() else {
                return Err(Signal::fail("split() argument must be a string"));
            };

            let parts: Vec<Value> = if separator.is_empty() {
                text.chars().map(|c| Value::Str(c.to_string())).collect()
            } else {
                text.split(separator.as_str())
                    .map(|part| Value::Str(part.to_string()))
                    .collect()
            };
            Ok(Some(Value::List(Rc::new(parts))))
        },

        "contains" => {
            if args.len() != 1 {
                return Err(Signal::fail("contains() requires 1 argument"));
            }
            let Value::Str(needle) = args[0].unwrapped() else {
                return Err(Signal::fail("contains() argument must be a string"));
            };
            Ok(Some(Value::Boolean(text.contains(needle.as_str()))))
        },

        "trim" => Ok(Some(Value::Str(text.trim().to_string()))),
        "upper" => Ok(Some(Value::Str(text.to_uppercase()))),
        "lower" => Ok(Some(Value::Str(text.to_lowercase()))),

        _ => Ok(None),
    }
}
