use logos::Logos;

/// Classifies a lexical token.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized token kinds in the language; the literal
/// text and position travel alongside it in [`Token`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(extras = LexerExtras)]
pub enum TokenKind {
    /// `def`
    #[token("def")]
    Def,
    /// `fun`
    #[token("fun")]
    Fun,
    /// `struct`
    #[token("struct")]
    Struct,
    /// `extend`
    #[token("extend")]
    Extend,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `return`
    #[token("return")]
    Return,
    /// `match`
    #[token("match")]
    Match,
    /// `Some`
    #[token("Some")]
    Some,
    /// `None`
    #[token("None")]
    None,
    /// `Ok`
    #[token("Ok")]
    Ok,
    /// `Error`
    #[token("Error")]
    Error,
    /// `import`
    #[token("import")]
    Import,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// `is`
    #[token("is")]
    Is,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `Mutable`
    #[token("Mutable")]
    Mutable,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,

    /// Identifier tokens; variable, function, or type names such as `x` or
    /// `User`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    /// Integer literal tokens, such as `42`. No exponents, no underscores.
    #[regex(r"[0-9]+")]
    Integer,
    /// Float literal tokens, such as `3.14`. A digit is required on both
    /// sides of the dot.
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    /// String literal tokens. A backslash escapes the following character
    /// but the escape is kept verbatim; strings may span lines.
    #[regex(r#""([^"\\]|\\.)*""#, count_string_lines)]
    Str,

    /// `==`, the destructive rebind operator. Checked before `=`.
    #[token("==")]
    AssignMut,
    /// `=`
    #[token("=")]
    Assign,
    /// `->`. Checked before `-`.
    #[token("->")]
    Arrow,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `>=`. Checked before `>`.
    #[token(">=")]
    GreaterEqual,
    /// `<=`. Checked before `<`.
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `<`
    #[token("<")]
    Less,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,

    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// Spaces, tabs, carriage returns, and form feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// A statement separator. Significant to the parser, silently skippable
    /// inside braces.
    #[token("\n", count_newline)]
    Newline,

    /// End of input; produced once the source is exhausted.
    Eof,
    /// An unrecognized character. Never dropped, so the parser can report it.
    Illegal,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset where that line began,
/// so every token can report a 1-based line and column.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Advances the line accounting past a newline token.
fn count_newline(lex: &mut logos::Lexer<TokenKind>) {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
}

/// Advances the line accounting past any newlines embedded in a string
/// literal, keeping positions correct for the tokens that follow it.
fn count_string_lines(lex: &mut logos::Lexer<TokenKind>) {
    let slice = lex.slice();
    let newlines = slice.chars().filter(|&c| c == '\n').count();
    if newlines > 0 {
        lex.extras.line += newlines;
        let last = slice.rfind('\n').unwrap_or(0);
        lex.extras.line_start = lex.span().start + last + 1;
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Def => "DEF",
            Self::Fun => "FUN",
            Self::Struct => "STRUCT",
            Self::Extend => "EXTEND",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::For => "FOR",
            Self::In => "IN",
            Self::Return => "RETURN",
            Self::Match => "MATCH",
            Self::Some => "SOME",
            Self::None => "NONE",
            Self::Ok => "OK",
            Self::Error => "ERROR",
            Self::Import => "IMPORT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Is => "IS",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
            Self::Mutable => "MUTABLE",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Ident => "IDENT",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Str => "STRING",
            Self::AssignMut => "==",
            Self::Assign => "=",
            Self::Arrow => "->",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Comment | Self::Ignored => "COMMENT",
            Self::Newline => "NEWLINE",
            Self::Eof => "EOF",
            Self::Illegal => "ILLEGAL",
        };
        write!(f, "{name}")
    }
}

/// A lexical token: its kind, raw text, and 1-based source position.
///
/// Tokens are produced transiently and consumed by the parser; they carry no
/// identity beyond their position. String literals hold the text between the
/// quotes with escapes untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind:    TokenKind,
    /// The raw matched text (quotes stripped for strings).
    pub literal: String,
    /// 1-based line of the token's first character.
    pub line:    usize,
    /// 1-based column of the token's first character.
    pub column:  usize,
}

impl Token {
    /// Builds the synthetic end-of-input token at the given position.
    const fn eof(line: usize, column: usize) -> Self {
        Self { kind: TokenKind::Eof,
               literal: String::new(),
               line,
               column }
    }
}

/// A stateful, forward-only tokenizer over a source string.
///
/// Wraps the generated token rules with position bookkeeping and exposes the
/// one-call contract the parser consumes: [`Lexer::next_token`] until a token
/// of kind [`TokenKind::Eof`] comes back. There is no backtracking; each call
/// advances the input.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { inner: TokenKind::lexer(source) }
    }

    /// Produces the next token.
    ///
    /// Whitespace and comments are skipped; newlines are significant and come
    /// back as [`TokenKind::Newline`]. Unrecognized characters come back as
    /// [`TokenKind::Illegal`] carrying the offending text. Once the input is
    /// exhausted, every further call returns an [`TokenKind::Eof`] token.
    ///
    /// # Returns
    /// The next token with its 1-based line and column.
    pub fn next_token(&mut self) -> Token {
        // Snapshot before advancing: only newline-bearing tokens move the
        // counters, and they do so after their own start position.
        let line = self.inner.extras.line;
        let line_start = self.inner.extras.line_start;

        let Some(result) = self.inner.next() else {
            let column = self.inner.span().end.saturating_sub(line_start) + 1;
            return Token::eof(line, column);
        };

        let span = self.inner.span();
        let column = span.start - line_start + 1;

        match result {
            Ok(kind) => {
                let literal = if kind == TokenKind::Str {
                    let slice = self.inner.slice();
                    slice[1..slice.len() - 1].to_string()
                } else {
                    self.inner.slice().to_string()
                };
                Token { kind,
                        literal,
                        line,
                        column }
            },
            Err(()) => Token { kind: TokenKind::Illegal,
                               literal: self.inner.slice().to_string(),
                               line,
                               column },
        }
    }
}
