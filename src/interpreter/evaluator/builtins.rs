use std::{io::Write, rc::Rc};

use crate::interpreter::{environment::Environment,
                         value::{BuiltinFn, ErrorValue, Value}};

/// The built-in free functions, by name.
///
/// Builtins are registered into every top-level environment as first-class
/// values, so they resolve like any other binding and module environments
/// get their own copies. Each builtin validates its own arity and argument
/// types with a message of its own.
const BUILTINS: &[(&str, BuiltinFn)] = &[("print", print),
                                         ("println", println),
                                         ("range", range),
                                         ("len", len),
                                         ("type", type_name),
                                         ("str", to_str),
                                         ("int", to_int),
                                         ("float", to_float)];

/// Registers every built-in function into the given environment.
pub fn register_builtins(env: &Environment) {
    for &(name, function) in BUILTINS {
        env.set(name, Value::Builtin(name, function));
    }
}

/// Renders arguments separated by spaces, reading through `Mutable`.
fn render(args: &[Value]) -> String {
    args.iter()
        .map(|arg| arg.unwrapped().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `print(...)`: writes the rendered arguments to stdout without a newline.
fn print(args: &[Value]) -> Result<Value, ErrorValue> {
    print!("{}", render(args));
    let _ = std::io::stdout().flush();
    Ok(Value::Null)
}

/// `println(...)`: writes the rendered arguments to stdout with a newline.
fn println(args: &[Value]) -> Result<Value, ErrorValue> {
    println!("{}", render(args));
    Ok(Value::Null)
}

/// `range(end)` / `range(start, end)`: a half-open list of integers.
fn range(args: &[Value]) -> Result<Value, ErrorValue> {
    if args.is_empty() || args.len() > 2 {
        return Err(ErrorValue::plain("range() requires 1 or 2 arguments"));
    }

    let (start, end) = if args.len() == 1 {
        let Value::Integer(end) = args[0].unwrapped() else {
            return Err(ErrorValue::plain("range() argument must be an integer"));
        };
        (0, end)
    } else {
        let Value::Integer(start) = args[0].unwrapped() else {
            return Err(ErrorValue::plain("range() start must be an integer"));
        };
        let Value::Integer(end) = args[1].unwrapped() else {
            return Err(ErrorValue::plain("range() end must be an integer"));
        };
        (start, end)
    };

    let elements: Vec<Value> = (start..end).map(Value::Integer).collect();
    Ok(Value::List(Rc::new(elements)))
}

/// `len(x)`: byte length of a string, element count of a list, entry count
/// of a map.
fn len(args: &[Value]) -> Result<Value, ErrorValue> {
    if args.len() != 1 {
        return Err(ErrorValue::plain("len() requires exactly 1 argument"));
    }

    match args[0].unwrapped() {
        Value::Str(s) => Ok(Value::Integer(s.len() as i64)),
        Value::List(elements) => Ok(Value::Integer(elements.len() as i64)),
        Value::Map(pairs) => Ok(Value::Integer(pairs.len() as i64)),
        other => Err(ErrorValue::plain(format!("len() not supported for {}",
                                               other.type_name()))),
    }
}

/// `type(x)`: the dynamic type name as a string.
fn type_name(args: &[Value]) -> Result<Value, ErrorValue> {
    if args.len() != 1 {
        return Err(ErrorValue::plain("type() requires exactly 1 argument"));
    }
    Ok(Value::Str(args[0].unwrapped().type_name().to_string()))
}

/// `str(x)`: the value's rendering as a string.
fn to_str(args: &[Value]) -> Result<Value, ErrorValue> {
    if args.len() != 1 {
        return Err(ErrorValue::plain("str() requires exactly 1 argument"));
    }
    Ok(Value::Str(args[0].unwrapped().to_string()))
}

/// `int(x)`: integer conversion from integers, floats (truncating), numeric
/// strings, and booleans.
fn to_int(args: &[Value]) -> Result<Value, ErrorValue> {
    if args.len() != 1 {
        return Err(ErrorValue::plain("int() requires exactly 1 argument"));
    }

    match args[0].unwrapped() {
        Value::Integer(n) => Ok(Value::Integer(n)),
        Value::Float(n) => Ok(Value::Integer(n as i64)),
        Value::Str(s) => s.trim()
                          .parse::<i64>()
                          .map(Value::Integer)
                          .map_err(|_| {
                              ErrorValue::plain(format!("cannot convert {s:?} to integer"))
                          }),
        Value::Boolean(b) => Ok(Value::Integer(i64::from(b))),
        other => Err(ErrorValue::plain(format!("cannot convert {} to integer",
                                               other.type_name()))),
    }
}

/// `float(x)`: float conversion from floats, integers, and numeric strings.
fn to_float(args: &[Value]) -> Result<Value, ErrorValue> {
    if args.len() != 1 {
        return Err(ErrorValue::plain("float() requires exactly 1 argument"));
    }

    match args[0].unwrapped() {
        Value::Float(n) => Ok(Value::Float(n)),
        Value::Integer(n) => Ok(Value::Float(n as f64)),
        Value::Str(s) => s.trim()
                          .parse::<f64>()
                          .map(Value::Float)
                          .map_err(|_| {
                              ErrorValue::plain(format!("cannot convert {s:?} to float"))
                          }),
        other => Err(ErrorValue::plain(format!("cannot convert {} to float",
                                               other.type_name()))),
    }
}
