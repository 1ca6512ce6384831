/// Statement-level productions: bindings, declarations, loops, imports.
mod statement;

/// The layered infix-precedence chain for expressions.
mod expression;

/// Prefix, postfix, and primary productions: literals, braces, wrappers.
mod primary;

/// Type-annotation parsing (`List[Integer]`, `Result[Integer, String]`, ...).
mod types;

use std::mem;

use crate::{ast::{Expr, Program},
            error::ParseError,
            interpreter::lexer::{Lexer, Token, TokenKind}};

/// Result type used by every parser production.
pub type ParseResult<T> = Result<T, ParseError>;

/// A recursive-descent parser over a lazily pulled token stream.
///
/// The parser keeps exactly two tokens of lookahead (`cur` and `peek`);
/// [`Parser::advance`] shifts the peek token into the current slot and pulls
/// a fresh one from the lexer. It never panics on malformed input: an error
/// in a statement is recorded and parsing resumes at the next statement
/// boundary.
pub struct Parser<'src> {
    lexer:  Lexer<'src>,
    cur:    Token,
    peek:   Token,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    /// Creates a parser and primes the two-token lookahead window.
    #[must_use]
    pub fn new(mut lexer: Lexer<'src>) -> Self {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self { lexer,
               cur,
               peek,
               errors: Vec::new() }
    }

    /// Parses the entire input into a program.
    ///
    /// Statements that fail to parse are skipped up to the next newline and
    /// the diagnostic is kept; parsing always runs to the end of the input.
    ///
    /// # Returns
    /// The parsed program together with every recorded diagnostic. A
    /// non-empty diagnostic list makes the program unusable for checking or
    /// evaluation.
    pub fn parse_program(mut self) -> (Program, Vec<ParseError>) {
        let mut statements = Vec::new();

        while !self.cur_is(TokenKind::Eof) {
            self.skip_newlines();
            if self.cur_is(TokenKind::Eof) {
                break;
            }
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize();
                },
            }
            self.advance();
        }

        (Program { statements }, self.errors)
    }

    /// Shifts `peek` into `cur` and pulls the next token from the lexer.
    fn advance(&mut self) {
        self.cur = mem::replace(&mut self.peek, self.lexer.next_token());
    }

    /// Skips any run of newline tokens at the current position.
    fn skip_newlines(&mut self) {
        while self.cur_is(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Skips forward to the next statement boundary after an error.
    ///
    /// Every error path either advances the current token or returns, so the
    /// parser cannot loop forever.
    fn synchronize(&mut self) {
        while !self.cur_is(TokenKind::Newline) && !self.cur_is(TokenKind::Eof) {
            self.advance();
        }
    }

    /// Tests the current token's kind.
    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    /// Tests the peek token's kind.
    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advances iff the peek token has the expected kind.
    ///
    /// # Errors
    /// `UnexpectedToken` naming the expected and found kinds, positioned at
    /// the peek token.
    fn expect_peek(&mut self, expected: TokenKind) -> ParseResult<()> {
        if self.peek_is(expected) {
            self.advance();
            return Ok(());
        }
        Err(ParseError::UnexpectedToken { expected,
                                          found: self.peek.kind,
                                          line: self.peek.line })
    }

    /// Parses a comma-separated expression list up to a closing token.
    ///
    /// Shared by call arguments and list literals. An immediately closing
    /// token yields an empty list.
    fn parse_expression_list(&mut self, end: TokenKind) -> ParseResult<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.advance();
            return Ok(list);
        }

        self.advance();
        list.push(self.parse_expression()?);

        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression()?);
        }

        self.expect_peek(end)?;

        Ok(list)
    }
}
