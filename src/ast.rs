use std::{fmt, rc::Rc};

/// The root node of a parsed source file.
///
/// A program is an ordered sequence of top-level statements. Modules loaded
/// through `import` are programs of their own, parsed once and cached by the
/// module loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

/// An abstract syntax tree node representing a statement.
///
/// Statements are the units the parser dispatches on: bindings, function and
/// struct declarations, extension blocks, control flow, imports, and plain
/// expressions used for their value or effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An immutable binding: `def x = 5` or `def x: Integer = 5`.
    Def {
        /// The bound name.
        name:      String,
        /// Optional declared type of the binding.
        type_hint: Option<TypeAnnotation>,
        /// The initializer expression.
        value:     Expr,
        /// Line number in the source code.
        line:      usize,
    },
    /// A named function declaration: `fun add(a: Integer, b: Integer) -> Integer { ... }`.
    Function(FunctionDef),
    /// A struct declaration: `struct User { name: String, age: Integer }`.
    Struct {
        /// The struct name; compared nominally by the type checker.
        name:   String,
        /// Declared fields in source order.
        fields: Vec<StructField>,
        /// Line number in the source code.
        line:   usize,
    },
    /// An extension block attaching methods to a type name:
    /// `extend User { fun greet() { ... } }`.
    Extend {
        /// The type name the methods dispatch on.
        type_name: String,
        /// The methods declared inside the block.
        methods:   Vec<FunctionDef>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A `return` statement, with or without a value.
    Return {
        /// The returned expression; `None` returns null.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A `while` loop.
    While {
        /// The loop condition, re-evaluated before each iteration.
        condition: Expr,
        /// The loop body.
        body:      Block,
        /// Line number in the source code.
        line:      usize,
    },
    /// A `for x in iterable { ... }` loop.
    For {
        /// The per-iteration binding.
        variable: String,
        /// The expression producing the iterated list.
        iterable: Expr,
        /// The loop body.
        body:     Block,
        /// Line number in the source code.
        line:     usize,
    },
    /// A `break` statement.
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// A `continue` statement.
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// An `import a.b.c` statement.
    Import {
        /// Dotted path segments in order.
        path: Vec<String>,
        /// Line number in the source code.
        line: usize,
    },
    /// An expression evaluated in statement position.
    Expression {
        /// The wrapped expression.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Def { line, .. }
            | Self::Struct { line, .. }
            | Self::Extend { line, .. }
            | Self::Return { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Break { line }
            | Self::Continue { line }
            | Self::Import { line, .. }
            | Self::Expression { line, .. } => *line,
            Self::Function(def) => def.line,
        }
    }
}

/// A named function declaration, used both for top-level `fun` statements and
/// for methods inside `extend` blocks.
///
/// The body is reference-counted so closures created at evaluation time can
/// share it without cloning the tree on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The function name.
    pub name:        String,
    /// Declared parameters in order.
    pub parameters:  Vec<Parameter>,
    /// Optional declared return type.
    pub return_type: Option<TypeAnnotation>,
    /// The function body.
    pub body:        Rc<Block>,
    /// Line number in the source code.
    pub line:        usize,
}

/// A single function parameter with an optional type hint.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The parameter name.
    pub name:      String,
    /// Optional declared parameter type.
    pub type_hint: Option<TypeAnnotation>,
}

/// A single declared struct field with an optional type hint.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    /// The field name.
    pub name:      String,
    /// Optional declared field type.
    pub type_hint: Option<TypeAnnotation>,
}

/// A brace-delimited sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements in source order.
    pub statements: Vec<Statement>,
    /// Line number of the opening brace.
    pub line:       usize,
}

/// A parsed type annotation such as `Integer`, `List[Integer]` or
/// `Result[Integer, String]`.
///
/// Annotations are purely syntactic; conversion into the structural type
/// model happens in the checker.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    /// The head type name.
    pub name:   String,
    /// Bracketed type parameters, empty for plain names.
    pub params: Vec<TypeAnnotation>,
    /// Line number in the source code.
    pub line:   usize,
}

/// An abstract syntax tree node representing an expression.
///
/// `Expr` covers literals, identifiers, operator applications, control-flow
/// expressions, collection and struct literals, wrapper constructors, and
/// calls. Each variant records the source line of its first token.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An integer literal.
    Integer {
        /// The literal value.
        value: i64,
        /// Line number in the source code.
        line:  usize,
    },
    /// A floating-point literal.
    Float {
        /// The literal value.
        value: f64,
        /// Line number in the source code.
        line:  usize,
    },
    /// A string literal. Backslash escapes are retained verbatim.
    Str {
        /// The literal text between the quotes.
        value: String,
        /// Line number in the source code.
        line:  usize,
    },
    /// A boolean literal: `true` or `false`.
    Boolean {
        /// The literal value.
        value: bool,
        /// Line number in the source code.
        line:  usize,
    },
    /// A reference to a binding by name.
    Identifier {
        /// The referenced name.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A prefix operation: `-x` or `not x`.
    Prefix {
        /// The prefix operator.
        op:    PrefixOperator,
        /// The operand.
        right: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A binary operation: `a + b`, `a is b`, `a and b`, ...
    Infix {
        /// Left operand.
        left:  Box<Expr>,
        /// The operator.
        op:    InfixOperator,
        /// Right operand.
        right: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A destructive rebind of a `Mutable` binding: `counter == counter + 1`.
    Rebind {
        /// The rebound name; must resolve to a `Mutable` value.
        name:  String,
        /// The stored expression.
        value: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// An `if`/`else` expression.
    If {
        /// The condition, judged by truthiness at run time.
        condition:   Box<Expr>,
        /// Branch taken when the condition holds.
        consequence: Block,
        /// Optional `else` branch.
        alternative: Option<Block>,
        /// Line number in the source code.
        line:        usize,
    },
    /// An anonymous function: `{ x -> x * 2 }` or `{ a, b -> a + b }`.
    Lambda {
        /// Parameter names; lambda parameters carry no type hints.
        parameters: Vec<String>,
        /// The single body expression.
        body:       Rc<Expr>,
        /// Line number in the source code.
        line:       usize,
    },
    /// A call: `f(a, b)` or `obj.method(a)`.
    Call {
        /// The callee expression.
        function:  Box<Expr>,
        /// Argument expressions in order.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A member access: `obj.field`.
    Member {
        /// The accessed object.
        object: Box<Expr>,
        /// The member name.
        member: String,
        /// Line number in the source code.
        line:   usize,
    },
    /// An index access: `list[0]`, `map["key"]`, `text[1]`.
    Index {
        /// The indexed object.
        object: Box<Expr>,
        /// The index expression.
        index:  Box<Expr>,
        /// Line number in the source code.
        line:   usize,
    },
    /// A list literal: `[1, 2, 3]`.
    List {
        /// Element expressions in order.
        elements: Vec<Expr>,
        /// Line number in the source code.
        line:     usize,
    },
    /// A map literal: `{"name": "Alice"}`. Keys must evaluate to strings.
    Map {
        /// Key/value expression pairs in source order.
        pairs: Vec<(Expr, Expr)>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A struct literal: `User { name: "Alice", age: 30 }`.
    StructLiteral {
        /// The struct type name.
        name:   String,
        /// Field initializers in source order.
        fields: Vec<(String, Expr)>,
        /// Line number in the source code.
        line:   usize,
    },
    /// An immutable struct update: `user.with { age: 31 }`.
    With {
        /// The struct being copied.
        object:  Box<Expr>,
        /// Field overrides in source order.
        updates: Vec<(String, Expr)>,
        /// Line number in the source code.
        line:    usize,
    },
    /// An option constructor: `Some(x)` or `None`.
    OptionLiteral {
        /// The wrapped expression; `None` when absent.
        value: Option<Box<Expr>>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A result constructor: `Ok(x)` or `Error(x)`.
    ResultLiteral {
        /// `true` for `Ok`, `false` for `Error`.
        is_ok: bool,
        /// The wrapped expression.
        value: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A pattern match over wrapper shapes.
    Match {
        /// The scrutinee expression.
        value: Box<Expr>,
        /// Cases tried in order; the first matching case wins.
        cases: Vec<MatchCase>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A mutable cell constructor: `Mutable[Integer](0)`.
    Mutable {
        /// Optional declared element type.
        type_hint: Option<TypeAnnotation>,
        /// The initial value.
        value:     Box<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Integer { line, .. }
            | Self::Float { line, .. }
            | Self::Str { line, .. }
            | Self::Boolean { line, .. }
            | Self::Identifier { line, .. }
            | Self::Prefix { line, .. }
            | Self::Infix { line, .. }
            | Self::Rebind { line, .. }
            | Self::If { line, .. }
            | Self::Lambda { line, .. }
            | Self::Call { line, .. }
            | Self::Member { line, .. }
            | Self::Index { line, .. }
            | Self::List { line, .. }
            | Self::Map { line, .. }
            | Self::StructLiteral { line, .. }
            | Self::With { line, .. }
            | Self::OptionLiteral { line, .. }
            | Self::ResultLiteral { line, .. }
            | Self::Match { line, .. }
            | Self::Mutable { line, .. } => *line,
        }
    }
}

/// A single `match` case: a wrapper pattern and the block it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    /// The matched shape.
    pub pattern: Pattern,
    /// The case body.
    pub body:    Block,
    /// Line number in the source code.
    pub line:    usize,
}

/// The shapes recognized in `match` cases.
///
/// Wrapper patterns bind their payload only when it was written as a plain
/// identifier; `Some(5)` matches any present option without binding. A bare
/// identifier matches unconditionally and binds the whole value.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `Some(x)`: matches a present option.
    Some(Option<String>),
    /// `None`: matches an absent option.
    None,
    /// `Ok(x)`: matches a successful result.
    Ok(Option<String>),
    /// `Error(e)`: matches a failed result, binding its error value.
    Err(Option<String>),
    /// A bare identifier: matches anything and binds it.
    Binding(String),
}

/// Represents a prefix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrefixOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical negation by truthiness (`not x`).
    Not,
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InfixOperator {
    /// Addition, and string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Greater than (`>`)
    Greater,
    /// Less than (`<`)
    Less,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
    /// Value equality (`is`)
    Is,
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Not => "not ",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use InfixOperator::{Add, And, Div, Greater, GreaterEqual, Is, Less, LessEqual, Mod, Mul,
                            Or, Sub};
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Greater => ">",
            Less => "<",
            GreaterEqual => ">=",
            LessEqual => "<=",
            And => "and",
            Or => "or",
            Is => "is",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Def { name,
                        type_hint,
                        value,
                        .. } => {
                write!(f, "def {name}")?;
                if let Some(hint) = type_hint {
                    write!(f, ": {hint}")?;
                }
                write!(f, " = {value}")
            },
            Self::Function(def) => write!(f, "{def}"),
            Self::Struct { name, fields, .. } => {
                write!(f, "struct {name} {{ ")?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field.name)?;
                    if let Some(hint) = &field.type_hint {
                        write!(f, ": {hint}")?;
                    }
                }
                write!(f, " }}")
            },
            Self::Extend { type_name, methods, .. } => {
                write!(f, "extend {type_name} {{ ")?;
                for method in methods {
                    write!(f, "{method} ")?;
                }
                write!(f, "}}")
            },
            Self::Return { value, .. } => match value {
                Some(value) => write!(f, "return {value}"),
                None => write!(f, "return"),
            },
            Self::While { condition, body, .. } => write!(f, "while {condition} {body}"),
            Self::For { variable,
                        iterable,
                        body,
                        .. } => write!(f, "for {variable} in {iterable} {body}"),
            Self::Break { .. } => write!(f, "break"),
            Self::Continue { .. } => write!(f, "continue"),
            Self::Import { path, .. } => write!(f, "import {}", path.join(".")),
            Self::Expression { expr, .. } => write!(f, "{expr}"),
        }
    }
}

impl fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fun {}(", self.name)?;
        for (index, param) in self.parameters.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.name)?;
            if let Some(hint) = &param.type_hint {
                write!(f, ": {hint}")?;
            }
        }
        write!(f, ")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {ret}")?;
        }
        write!(f, " {}", self.body)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "[")?;
            for (index, param) in self.params.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{param}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer { value, .. } => write!(f, "{value}"),
            Self::Float { value, .. } => write!(f, "{value}"),
            Self::Str { value, .. } => write!(f, "\"{value}\""),
            Self::Boolean { value, .. } => write!(f, "{value}"),
            Self::Identifier { name, .. } => write!(f, "{name}"),
            Self::Prefix { op, right, .. } => write!(f, "({op}{right})"),
            Self::Infix { left, op, right, .. } => write!(f, "({left} {op} {right})"),
            Self::Rebind { name, value, .. } => write!(f, "{name} == {value}"),
            Self::If { condition,
                       consequence,
                       alternative,
                       .. } => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            },
            Self::Lambda { parameters, body, .. } => {
                write!(f, "{{ {} -> {body} }}", parameters.join(", "))
            },
            Self::Call { function, arguments, .. } => {
                write!(f, "{function}(")?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            },
            Self::Member { object, member, .. } => write!(f, "{object}.{member}"),
            Self::Index { object, index, .. } => write!(f, "({object}[{index}])"),
            Self::List { elements, .. } => {
                write!(f, "[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            },
            Self::Map { pairs, .. } => {
                write!(f, "{{")?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            },
            Self::StructLiteral { name, fields, .. } => {
                write!(f, "{name} {{ ")?;
                for (index, (field, value)) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}: {value}")?;
                }
                write!(f, " }}")
            },
            Self::With { object, updates, .. } => {
                write!(f, "{object}.with {{ ")?;
                for (index, (field, value)) in updates.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}: {value}")?;
                }
                write!(f, " }}")
            },
            Self::OptionLiteral { value, .. } => match value {
                Some(value) => write!(f, "Some({value})"),
                None => write!(f, "None"),
            },
            Self::ResultLiteral { is_ok, value, .. } => {
                if *is_ok {
                    write!(f, "Ok({value})")
                } else {
                    write!(f, "Error({value})")
                }
            },
            Self::Match { value, cases, .. } => {
                write!(f, "match {value} {{ ")?;
                for case in cases {
                    write!(f, "{} -> {} ", case.pattern, case.body)?;
                }
                write!(f, "}}")
            },
            Self::Mutable { type_hint, value, .. } => {
                write!(f, "Mutable")?;
                if let Some(hint) = type_hint {
                    write!(f, "[{hint}]")?;
                }
                write!(f, "({value})")
            },
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Some(binding) => write!(f, "Some({})", binding.as_deref().unwrap_or("_")),
            Self::None => write!(f, "None"),
            Self::Ok(binding) => write!(f, "Ok({})", binding.as_deref().unwrap_or("_")),
            Self::Err(binding) => write!(f, "Error({})", binding.as_deref().unwrap_or("_")),
            Self::Binding(name) => write!(f, "{name}"),
        }
    }
}
