use crate::interpreter::lexer::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while parsing a token stream.
pub enum ParseError {
    /// The parser required a specific token and found another one.
    UnexpectedToken {
        /// The token kind the parser required.
        expected: TokenKind,
        /// The token kind actually found.
        found:    TokenKind,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// No expression can start with the found token.
    NoPrefixParse {
        /// The token kind that cannot begin an expression.
        found: TokenKind,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An integer literal did not fit a 64-bit signed integer.
    InvalidInteger {
        /// The literal text as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A float literal could not be converted to a 64-bit float.
    InvalidFloat {
        /// The literal text as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The left side of a `==` rebind was not a plain identifier.
    InvalidRebindTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `match` case used a pattern outside the recognized shapes.
    InvalidMatchPattern {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::NoPrefixParse { line, .. }
            | Self::InvalidInteger { line, .. }
            | Self::InvalidFloat { line, .. }
            | Self::InvalidRebindTarget { line }
            | Self::InvalidMatchPattern { line } => *line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { expected, found, line } => {
                write!(f,
                       "line {line}: expected next token to be {expected}, got {found} instead")
            },

            Self::NoPrefixParse { found, line } => {
                write!(f, "line {line}: no prefix parse function for {found} found")
            },

            Self::InvalidInteger { literal, line } => {
                write!(f, "line {line}: could not parse {literal:?} as integer")
            },

            Self::InvalidFloat { literal, line } => {
                write!(f, "line {line}: could not parse {literal:?} as float")
            },

            Self::InvalidRebindTarget { line } => {
                write!(f, "line {line}: left side of == must be an identifier")
            },

            Self::InvalidMatchPattern { line } => write!(f,
                                                         "line {line}: match patterns must be Some(x), None, Ok(x), Error(x) or an identifier"),
        }
    }
}

impl std::error::Error for ParseError {}
