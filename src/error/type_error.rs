use crate::{ast::InfixOperator, interpreter::types::Type};

#[derive(Debug, Clone, PartialEq)]
/// Represents all diagnostics the static type checker can produce.
pub enum TypeError {
    /// Referenced a name with no visible binding.
    Undefined {
        /// The undefined name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to rebind a name whose type is not `Mutable[T]`.
    NotMutable {
        /// The name of the binding.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `def` initializer did not match the declared type.
    DefMismatch {
        /// The initializer's type.
        value:  Type,
        /// The declared binding type.
        target: Type,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A rebind stored a value incompatible with the cell's element type.
    RebindMismatch {
        /// The stored value's type.
        value:   Type,
        /// The cell's element type.
        element: Type,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An arithmetic operator was applied to non-numeric operands.
    OperatorUndefined {
        /// The operator.
        op:    InfixOperator,
        /// The left operand's type.
        left:  Type,
        /// The right operand's type.
        right: Type,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Unary minus was applied to a non-numeric operand.
    NegateUndefined {
        /// The operand's type.
        operand: Type,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A comparison was applied to operands that cannot be ordered together.
    NotComparable {
        /// The left operand's type.
        left:  Type,
        /// The right operand's type.
        right: Type,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An `if` condition was not a boolean expression.
    IfConditionNotBoolean {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `while` condition was not a boolean expression.
    WhileConditionNotBoolean {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `for` loop iterated over a non-list value.
    NotIterable {
        /// The iterable's type.
        iterable: Type,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A struct literal named an undeclared struct.
    UndefinedStruct {
        /// The struct name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A struct literal or update named a field the struct does not declare.
    UndefinedField {
        /// The field name.
        field:       String,
        /// The struct name.
        struct_name: String,
        /// The source line where the error occurred.
        line:        usize,
    },
    /// A struct field was initialized with an incompatible type.
    FieldMismatch {
        /// The initializer's type.
        value:    Type,
        /// The field name.
        field:    String,
        /// The declared field type.
        expected: Type,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A list literal mixed element types.
    ListElementMismatch {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A list was indexed with a non-integer.
    ListIndexNotInteger {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A map was keyed with a non-string.
    MapKeyNotString {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A string was indexed with a non-integer.
    StringIndexNotInteger {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `return` value did not match the declared return type.
    ReturnMismatch {
        /// The returned expression's type.
        actual:   Type,
        /// The declared return type.
        expected: Type,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A function declared a `Mutable[...]` return type.
    MutableReturn {
        /// The function name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// `.with { ... }` was applied to a non-struct value.
    WithOnNonStruct {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined { name, line } => write!(f, "line {line}: undefined: {name}"),

            Self::NotMutable { name, line } => write!(f, "line {line}: {name} is not mutable"),

            Self::DefMismatch { value, target, line } => write!(f,
                                                                "line {line}: cannot assign {value} to variable of type {target}"),

            Self::RebindMismatch { value, element, line } => write!(f,
                                                                    "line {line}: cannot assign {value} to Mutable[{element}]"),

            Self::OperatorUndefined { op, left, right, line } => write!(f,
                                                                        "line {line}: operator {op} not defined for {left} and {right}"),

            Self::NegateUndefined { operand, line } => {
                write!(f, "line {line}: operator - not defined for {operand}")
            },

            Self::NotComparable { left, right, line } => {
                write!(f, "line {line}: cannot compare {left} and {right}")
            },

            Self::IfConditionNotBoolean { line } => {
                write!(f, "line {line}: if condition must be a boolean expression")
            },

            Self::WhileConditionNotBoolean { line } => {
                write!(f, "line {line}: while condition must be a boolean expression")
            },

            Self::NotIterable { iterable, line } => {
                write!(f, "line {line}: cannot iterate over {iterable}")
            },

            Self::UndefinedStruct { name, line } => {
                write!(f, "line {line}: undefined struct: {name}")
            },

            Self::UndefinedField { field,
                                   struct_name,
                                   line, } => {
                write!(f, "line {line}: undefined field {field} on {struct_name}")
            },

            Self::FieldMismatch { value,
                                  field,
                                  expected,
                                  line, } => write!(f,
                                                    "line {line}: cannot assign {value} to field {field} of type {expected}"),

            Self::ListElementMismatch { line } => {
                write!(f, "line {line}: list elements must have the same type")
            },

            Self::ListIndexNotInteger { line } => {
                write!(f, "line {line}: list index must be an integer")
            },

            Self::MapKeyNotString { line } => write!(f, "line {line}: map key must be a string"),

            Self::StringIndexNotInteger { line } => {
                write!(f, "line {line}: string index must be an integer")
            },

            Self::ReturnMismatch { actual,
                                   expected,
                                   line, } => write!(f,
                                                     "line {line}: cannot return {actual} from function expecting {expected}"),

            Self::MutableReturn { name, line } => {
                write!(f, "line {line}: function {name} cannot return a Mutable type")
            },

            Self::WithOnNonStruct { line } => {
                write!(f, "line {line}: with can only be used on structs")
            },
        }
    }
}

impl std::error::Error for TypeError {}
