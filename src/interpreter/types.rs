use crate::ast::TypeAnnotation;

/// A structural type in the static type system.
///
/// Types are compared by shape, with two exceptions: [`Type::Struct`] is
/// compared nominally by name, and [`Type::Any`] is compatible with
/// everything in both directions. `Any` is the deliberate escape hatch used
/// wherever inference is not attempted (lambda parameters, unresolved
/// method receivers) and is unsound by design.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A 64-bit signed integer.
    Integer,
    /// A 64-bit float.
    Float,
    /// A string.
    String,
    /// A boolean.
    Boolean,
    /// The absence of a value.
    Null,
    /// `List[T]`.
    List(Box<Type>),
    /// `Map[K, V]`; keys are always strings.
    Map(Box<Type>, Box<Type>),
    /// `Option[T]`.
    Option(Box<Type>),
    /// `Result[T, E]`.
    Result(Box<Type>, Box<Type>),
    /// `Mutable[T]`, the only destructively updatable type.
    Mutable(Box<Type>),
    /// A function type: parameter types and return type.
    Function {
        /// Parameter types in order.
        parameters: Vec<Type>,
        /// The return type.
        ret:        Box<Type>,
    },
    /// A declared struct, identified by name alone.
    Struct(String),
    /// The universal-compatibility placeholder for unresolved types.
    Any,
}

impl Type {
    /// Structural equality with `Any` acting as a wildcard on the expected
    /// (`self`) side only.
    ///
    /// [`Type::assignable`] handles top-level `Any` on either side before
    /// falling back to this, so the asymmetry is only observable for `Any`
    /// nested inside a composite actual type.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Any, _) => true,
            (Self::Integer, Self::Integer)
            | (Self::Float, Self::Float)
            | (Self::String, Self::String)
            | (Self::Boolean, Self::Boolean)
            | (Self::Null, Self::Null) => true,
            (Self::List(a), Self::List(b)) | (Self::Option(a), Self::Option(b)) => a.equals(b),
            (Self::Map(ak, av), Self::Map(bk, bv)) => ak.equals(bk) && av.equals(bv),
            (Self::Result(av, ae), Self::Result(bv, be)) => av.equals(bv) && ae.equals(be),
            (Self::Mutable(a), Self::Mutable(b)) => a.equals(b),
            (Self::Function { parameters: ap, ret: ar },
             Self::Function { parameters: bp, ret: br }) => {
                ap.len() == bp.len()
                && ap.iter().zip(bp).all(|(a, b)| a.equals(b))
                && ar.equals(br)
            },
            (Self::Struct(a), Self::Struct(b)) => a == b,
            _ => false,
        }
    }

    /// Tests whether a value of type `actual` may flow into a slot expecting
    /// `expected`.
    ///
    /// `Any` on either side is always compatible. A `Mutable[T]` actual reads
    /// as its element type (implicit unwrap). `Option` and `Result` compare
    /// leniently on their success sides only, so a `Result` built by
    /// `Error(x)`, whose value side is unknown, still satisfies any
    /// declared `Result` type.
    #[must_use]
    pub fn assignable(expected: &Self, actual: &Self) -> bool {
        if matches!(expected, Self::Any) || matches!(actual, Self::Any) {
            return true;
        }

        if let Self::Mutable(element) = actual {
            return Self::assignable(expected, element);
        }

        if let (Self::Option(expected_elem), Self::Option(actual_elem)) = (expected, actual) {
            return Self::assignable(expected_elem, actual_elem);
        }

        if let (Self::Result(expected_ok, _), Self::Result(actual_ok, _)) = (expected, actual) {
            return Self::assignable(expected_ok, actual_ok);
        }

        expected.equals(actual)
    }

    /// Returns `true` for `Integer`, `Float`, `Any`, or a `Mutable` of one.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Any | Self::Integer | Self::Float => true,
            Self::Mutable(element) => element.is_numeric(),
            _ => false,
        }
    }

    /// Returns `true` for `Integer`, `Any`, or a `Mutable` of one.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        match self {
            Self::Any | Self::Integer => true,
            Self::Mutable(element) => element.is_integer(),
            _ => false,
        }
    }

    /// Returns `true` for `String`, `Any`, or a `Mutable` of one.
    #[must_use]
    pub fn is_string(&self) -> bool {
        match self {
            Self::Any | Self::String => true,
            Self::Mutable(element) => element.is_string(),
            _ => false,
        }
    }

    /// Returns `true` for `Boolean`, `Any`, or a `Mutable` of one.
    ///
    /// The checker requires conditions to satisfy this even though the
    /// evaluator judges any value by truthiness; only unresolved (`Any`)
    /// conditions slip through.
    #[must_use]
    pub fn is_boolean_compatible(&self) -> bool {
        match self {
            Self::Any | Self::Boolean => true,
            Self::Mutable(element) => element.is_boolean_compatible(),
            _ => false,
        }
    }

    /// Tests whether ordering comparisons are defined between two types:
    /// both numeric, or both strings, with `Mutable` reading as its element.
    #[must_use]
    pub fn comparable(left: &Self, right: &Self) -> bool {
        if matches!(left, Self::Any) || matches!(right, Self::Any) {
            return true;
        }

        let left = left.unwrap_mutable();
        let right = right.unwrap_mutable();

        (left.is_numeric() && right.is_numeric()) || (left.is_string() && right.is_string())
    }

    /// Reads `Mutable[T]` as `T`; any other type is returned as-is.
    #[must_use]
    pub fn unwrap_mutable(&self) -> &Self {
        match self {
            Self::Mutable(element) => element,
            other => other,
        }
    }

    /// Converts a parsed annotation into a structural type.
    ///
    /// Unknown names become struct types (they may be declared elsewhere in
    /// the program; the checker validates usage sites). Missing type
    /// parameters default to `Any`, a `Result`'s error side defaults to
    /// `String`, and map keys are always `String` regardless of what the
    /// annotation says.
    #[must_use]
    pub fn from_annotation(annotation: Option<&TypeAnnotation>) -> Self {
        let Some(annotation) = annotation else {
            return Self::Any;
        };

        let param = |index: usize| Self::from_annotation(annotation.params.get(index));

        match annotation.name.as_str() {
            "Integer" => Self::Integer,
            "Float" => Self::Float,
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "Null" => Self::Null,
            "List" => Self::List(Box::new(param(0))),
            "Map" => Self::Map(Box::new(Self::String), Box::new(param(1))),
            "Option" => Self::Option(Box::new(param(0))),
            "Result" => {
                let error = if annotation.params.len() > 1 {
                    param(1)
                } else {
                    Self::String
                };
                Self::Result(Box::new(param(0)), Box::new(error))
            },
            "Mutable" => Self::Mutable(Box::new(param(0))),
            "Any" => Self::Any,
            name => Self::Struct(name.to_string()),
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "Integer"),
            Self::Float => write!(f, "Float"),
            Self::String => write!(f, "String"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Null => write!(f, "Null"),
            Self::List(element) => write!(f, "List[{element}]"),
            Self::Map(key, value) => write!(f, "Map[{key}, {value}]"),
            Self::Option(element) => write!(f, "Option[{element}]"),
            Self::Result(value, error) => write!(f, "Result[{value}, {error}]"),
            Self::Mutable(element) => write!(f, "Mutable[{element}]"),
            Self::Function { parameters, ret } => {
                write!(f, "(")?;
                for (index, parameter) in parameters.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") -> {ret}")
            },
            Self::Struct(name) => write!(f, "{name}"),
            Self::Any => write!(f, "Any"),
        }
    }
}
