use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{ast::{Block, Expr, Parameter, StructField},
            interpreter::environment::Environment};

/// Represents a runtime value in the interpreter.
///
/// This enum models every type that can appear in expressions, bindings,
/// function returns, and match scrutinees. Collections are persistent: every
/// "mutating" operation builds a new value and leaves the receiver untouched.
/// The single exception is [`Value::Mutable`], a shared cell rebindable
/// through the `==` operator.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit float.
    Float(f64),
    /// A string. Escapes survive from the source verbatim.
    Str(String),
    /// A boolean.
    Boolean(bool),
    /// The absence of a value.
    Null,
    /// An ordered list of values.
    List(Rc<Vec<Value>>),
    /// A string-keyed map. Insertion order is irrelevant; rendering sorts.
    Map(Rc<HashMap<String, Value>>),
    /// An instance of a declared struct.
    Struct(Rc<StructValue>),
    /// A struct declaration bound as a value by its `struct` statement.
    StructDef(Rc<StructDefinition>),
    /// A named function or lambda with its captured environment.
    Function(Rc<FunctionValue>),
    /// A built-in free function.
    Builtin(&'static str, BuiltinFn),
    /// `Some(x)` or `None`.
    Option(Option<Box<Value>>),
    /// `Ok(x)` or `Error(e)`.
    Result(Box<ResultValue>),
    /// A destructively updatable cell, rebound only via `==`.
    Mutable(Rc<RefCell<Value>>),
    /// A first-class error with optional provenance.
    Error(ErrorValue),
    /// An imported module exposing its top-level bindings.
    Module(Rc<ModuleValue>),
}

/// The signature shared by all built-in free functions.
///
/// Builtins receive their already-evaluated arguments and either produce a
/// value or fail with an error that propagates like any other runtime
/// failure.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, ErrorValue>;

/// A struct declaration: its name and declared fields.
///
/// Shared by reference between the evaluator's registry and every instance,
/// so instances can render and dispatch by their declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinition {
    /// The declared struct name.
    pub name:   String,
    /// The declared fields with their optional type hints.
    pub fields: Vec<StructField>,
}

/// An instance of a struct: a shared definition plus a field map.
///
/// Field maps contain exactly the fields the definition specifies.
#[derive(Debug, Clone)]
pub struct StructValue {
    /// The shared declaration this instance belongs to.
    pub definition: Rc<StructDefinition>,
    /// The instance's field values.
    pub fields:     HashMap<String, Value>,
}

impl StructValue {
    /// Builds a new instance with the given fields overlaid on this one.
    /// The receiver is untouched.
    #[must_use]
    pub fn with(&self, updates: HashMap<String, Value>) -> Self {
        let mut fields = self.fields.clone();
        fields.extend(updates);
        Self { definition: Rc::clone(&self.definition),
               fields }
    }
}

/// A function value: parameters, body, and the environment captured at the
/// definition site (lexical closure).
#[derive(Debug)]
pub struct FunctionValue {
    /// The declared name; empty for lambdas.
    pub name:       String,
    /// Declared parameters in order.
    pub parameters: Vec<Parameter>,
    /// The function body.
    pub body:       FunctionBody,
    /// The environment the function closes over.
    pub env:        Environment,
}

/// The two body shapes a function value can carry.
#[derive(Debug, Clone)]
pub enum FunctionBody {
    /// A declared function's statement block.
    Block(Rc<Block>),
    /// A lambda's single expression.
    Lambda(Rc<Expr>),
}

/// `Ok(x)` or `Error(e)`: the payload of [`Value::Result`].
#[derive(Debug, Clone)]
pub enum ResultValue {
    /// A successful result carrying its value.
    Ok(Value),
    /// A failed result carrying its error.
    Err(ErrorValue),
}

/// An imported module: its name and the environment its top-level bindings
/// were evaluated into.
#[derive(Debug)]
pub struct ModuleValue {
    /// The binding name (the import path's final segment).
    pub name:    String,
    /// The module's top-level bindings.
    pub exports: Environment,
}

/// An error with provenance context.
///
/// Errors are ordinary values: they flow through the same channel as every
/// other value and are never host-language panics. The `method` and `input`
/// fields are filled in by enrichment the first time the error surfaces
/// through an extension-method call; once set they are never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    /// The method the error first surfaced through; empty until enriched.
    pub method:  String,
    /// The rendering of that method's receiver; empty until enriched.
    pub input:   String,
    /// The failure description.
    pub message: String,
}

impl ErrorValue {
    /// Creates an error with no method context.
    #[must_use]
    pub fn plain(message: impl Into<String>) -> Self {
        Self { method:  String::new(),
               input:   String::new(),
               message: message.into(), }
    }

    /// Creates an error already attributed to a method.
    #[must_use]
    pub fn in_method(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self { method:  method.into(),
               input:   String::new(),
               message: message.into(), }
    }

    /// Attaches method and input context where not already present.
    ///
    /// The first enrichment wins: a chain of failing calls keeps the method
    /// name and receiver rendering captured at the point of first failure.
    pub fn enrich(&mut self, method: &str, input: &Value) {
        if self.method.is_empty() {
            self.method = method.to_string();
        }
        if self.input.is_empty() {
            self.input = input.to_string();
        }
    }
}

impl std::fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.method.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "Error in {}", self.method)?;
        if !self.input.is_empty() {
            write!(f, "\nInput: {}", self.input)?;
        }
        write!(f, "\nReason: {}", self.message)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(Rc::new(v))
    }
}

impl From<ResultValue> for Value {
    fn from(v: ResultValue) -> Self {
        Self::Result(Box::new(v))
    }
}

impl Value {
    /// Returns the dynamic type name used for dispatch and diagnostics.
    ///
    /// Struct instances answer with their declared struct name, which is what
    /// keys the extension-method registry.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Str(_) => "String",
            Self::Boolean(_) => "Boolean",
            Self::Null => "Null",
            Self::List(_) => "List",
            Self::Map(_) => "Map",
            Self::Struct(instance) => &instance.definition.name,
            Self::StructDef(_) => "StructDef",
            Self::Function(_) => "Function",
            Self::Builtin(..) => "Builtin",
            Self::Option(_) => "Option",
            Self::Result(_) => "Result",
            Self::Mutable(_) => "Mutable",
            Self::Error(_) => "Error",
            Self::Module(_) => "Module",
        }
    }

    /// Reads a `Mutable` cell's current content; any other value is returned
    /// as-is.
    #[must_use]
    pub fn unwrapped(&self) -> Self {
        match self {
            Self::Mutable(cell) => cell.borrow().clone(),
            other => other.clone(),
        }
    }

    /// Judges the value as a condition.
    ///
    /// Booleans answer for themselves; null, `None`, and the empty list are
    /// false; integers and strings are true when nonzero/nonempty; a
    /// `Mutable` answers with its content; everything else defaults to true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Null => false,
            Self::Integer(n) => *n != 0,
            Self::Str(s) => !s.is_empty(),
            Self::List(elements) => !elements.is_empty(),
            Self::Option(inner) => inner.is_some(),
            Self::Mutable(cell) => cell.borrow().is_truthy(),
            _ => true,
        }
    }

    /// Deep value equality, as exposed by the `is` operator.
    ///
    /// Both sides read through `Mutable` first. Only integers, floats,
    /// strings, booleans, and null compare by content; any other pairing,
    /// two identical lists included, is `false`. There is no
    /// coercion across tags.
    #[must_use]
    pub fn equals(left: &Self, right: &Self) -> bool {
        let left = left.unwrapped();
        let right = right.unwrapped();

        match (&left, &right) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
            Self::List(elements) => {
                write!(f, "[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            },
            Self::Map(pairs) => {
                let mut keys: Vec<&String> = pairs.keys().collect();
                keys.sort();

                write!(f, "{{")?;
                for (index, key) in keys.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {}", pairs[*key])?;
                }
                write!(f, "}}")
            },
            Self::Struct(instance) => {
                let mut keys: Vec<&String> = instance.fields.keys().collect();
                keys.sort();

                write!(f, "{}{{", instance.definition.name)?;
                for (index, key) in keys.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {}", instance.fields[*key])?;
                }
                write!(f, "}}")
            },
            Self::StructDef(definition) => write!(f, "<struct {}>", definition.name),
            Self::Function(function) => {
                if function.name.is_empty() {
                    write!(f, "<lambda>")
                } else {
                    write!(f, "<function {}>", function.name)
                }
            },
            Self::Builtin(name, _) => write!(f, "<builtin {name}>"),
            Self::Option(inner) => match inner {
                Some(value) => write!(f, "Some({value})"),
                None => write!(f, "None"),
            },
            Self::Result(result) => match result.as_ref() {
                ResultValue::Ok(value) => write!(f, "Ok({value})"),
                ResultValue::Err(error) => write!(f, "Error({error})"),
            },
            Self::Mutable(cell) => write!(f, "{}", cell.borrow()),
            Self::Error(error) => write!(f, "{error}"),
            Self::Module(module) => write!(f, "<module {}>", module.name),
        }
    }
}
