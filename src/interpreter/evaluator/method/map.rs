use std::{collections::HashMap, rc::Rc};

use crate::interpreter::{evaluator::{EvalResult, Signal},
                         value::Value};

/// Built-in methods on maps. Keys are always strings; `insert` and `remove`
/// are persistent and hand back a new map.
pub(super) fn map_method(pairs: &Rc<HashMap<String, Value>>,
                         method: &str,
                         args: &[Value])
                         -> EvalResult<Option<Value>> {
    match method {
        "get" => {
            if args.len() != 1 {
                return Err(Signal::fail("get() requires 1 argument"));
            }
            let Value::Str(key) = args[0].unwrapped() else {
                return Err(Signal::fail("get() argument must be a string"));
            };
            let found = pairs.get(&key).map(|value| Box::new(value.clone()));
            Ok(Some(Value::Option(found)))
        },

        "insert" => {
            if args.len() != 2 {
                return Err(Signal::fail("insert() requires 2 arguments"));
            }
            let Value::Str(key) = args[0].unwrapped() else {
                return Err(Signal::fail("insert() first argument must be a string"));
            };
            let mut extended = (**pairs).clone();
            extended.insert(key, args[1].clone());
            Ok(Some(Value::Map(Rc::new(extended))))
        },

        "remove" => {
            if args.len() != 1 {
                return Err(Signal::fail("remove() requires 1 argument"));
            }
            let Value::Str(key) = args[0].unwrapped() else {
                return Err(Signal::fail("remove() argument must be a string"));
            };
            let mut reduced = (**pairs).clone();
            reduced.remove(&key);
            Ok(Some(Value::Map(Rc::new(reduced))))
        },

        "keys" => {
            let mut keys: Vec<&String> = pairs.keys().collect();
            keys.sort();
            let keys = keys.into_iter()
                           .map(|key| Value::Str(key.clone()))
                           .collect();
            Ok(Some(Value::List(Rc::new(keys))))
        },

        "values" => {
            let mut keys: Vec<&String> = pairs.keys().collect();
            keys.sort();
            let values = keys.into_iter()
                             .map(|key| pairs[key].clone())
                             .collect();
            Ok(Some(Value::List(Rc::new(values))))
        },

        "contains" => {
            if args.len() != 1 {
                return Err(Signal::fail("contains() requires 1 argument"));
            }
            let Value::Str(key) = args[0].unwrapped() else {
                return Err(Signal::fail("contains() argument must be a string"));
            };
            Ok(Some(Value::Boolean(pairs.contains_key(&key))))
        },

        _ => Ok(None),
    }
}
