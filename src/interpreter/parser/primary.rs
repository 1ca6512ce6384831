use crate::{ast::{Block, Expr, MatchCase, Pattern, PrefixOperator, Statement},
            error::ParseError,
            interpreter::{lexer::TokenKind,
                          parser::{ParseResult, Parser}}};

impl Parser<'_> {
    /// Parses prefix operators.
    ///
    /// A prefix operand is itself a unary production, so chains like
    /// `- -x` nest and calls bind tighter than the operator: `-f(x)` reads
    /// as `-(f(x))`.
    ///
    /// Grammar: `unary := ("-" | "not") unary | postfix`
    pub(super) fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.cur.kind {
            TokenKind::Minus => PrefixOperator::Negate,
            TokenKind::Not => PrefixOperator::Not,
            _ => return self.parse_postfix(),
        };

        let line = self.cur.line;
        self.advance();
        let right = self.parse_unary()?;

        Ok(Expr::Prefix { op,
                          right: Box::new(right),
                          line })
    }

    /// Parses the postfix chain: calls, member access, and indexing.
    ///
    /// All three are left-associative and extend whatever primary expression
    /// came before them, so `a.b(c)[0].d` works without special cases.
    ///
    /// Grammar: `postfix := primary ("(" args ")" | "." IDENT | "[" expr "]")*`
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek.kind {
                TokenKind::LParen => {
                    let line = self.peek.line;
                    self.advance();
                    let arguments = self.parse_expression_list(TokenKind::RParen)?;
                    expr = Expr::Call { function: Box::new(expr),
                                        arguments,
                                        line };
                },
                TokenKind::Dot => {
                    self.advance();
                    let line = self.cur.line;
                    self.expect_peek(TokenKind::Ident)?;
                    let member = self.cur.literal.clone();

                    if member == "with" && self.peek_is(TokenKind::LBrace) {
                        expr = self.parse_with_expression(expr, line)?;
                    } else {
                        expr = Expr::Member { object: Box::new(expr),
                                              member,
                                              line };
                    }
                },
                TokenKind::LBracket => {
                    self.advance();
                    let line = self.cur.line;
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect_peek(TokenKind::RBracket)?;
                    expr = Expr::Index { object: Box::new(expr),
                                         index: Box::new(index),
                                         line };
                },
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parses a primary expression from the current token.
    ///
    /// # Errors
    /// `NoPrefixParse` when no expression can begin with the current token.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let line = self.cur.line;

        match self.cur.kind {
            TokenKind::Integer => {
                let literal = self.cur.literal.clone();
                literal.parse::<i64>()
                       .map(|value| Expr::Integer { value, line })
                       .map_err(|_| ParseError::InvalidInteger { literal, line })
            },
            TokenKind::Float => {
                let literal = self.cur.literal.clone();
                literal.parse::<f64>()
                       .map(|value| Expr::Float { value, line })
                       .map_err(|_| ParseError::InvalidFloat { literal, line })
            },
            TokenKind::Str => Ok(Expr::Str { value: self.cur.literal.clone(),
                                             line }),
            TokenKind::True => Ok(Expr::Boolean { value: true, line }),
            TokenKind::False => Ok(Expr::Boolean { value: false, line }),
            TokenKind::Ident => self.parse_identifier(),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_peek(TokenKind::RParen)?;
                Ok(expr)
            },
            TokenKind::LBracket => {
                let elements = self.parse_expression_list(TokenKind::RBracket)?;
                Ok(Expr::List { elements, line })
            },
            TokenKind::LBrace => self.parse_brace_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Match => self.parse_match_expression(),
            TokenKind::Some | TokenKind::None => self.parse_option_literal(),
            TokenKind::Ok | TokenKind::Error => self.parse_result_literal(),
            TokenKind::Mutable => self.parse_mutable_expression(),
            found => Err(ParseError::NoPrefixParse { found, line }),
        }
    }

    /// Parses an identifier, promoting it to a struct literal when it is
    /// immediately followed by `{` and starts with an uppercase ASCII
    /// letter.
    ///
    /// The case test is a syntactic heuristic, not a symbol lookup; it is
    /// what keeps `User { ... }` distinct from a variable followed by a
    /// block.
    fn parse_identifier(&mut self) -> ParseResult<Expr> {
        let line = self.cur.line;
        let name = self.cur.literal.clone();

        let uppercase = name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        if uppercase && self.peek_is(TokenKind::LBrace) {
            self.advance();
            return self.parse_struct_literal_body(name, line);
        }

        Ok(Expr::Identifier { name, line })
    }

    /// Parses the field initializers of a struct literal, with the current
    /// token on the opening brace.
    fn parse_struct_literal_body(&mut self, name: String, line: usize) -> ParseResult<Expr> {
        let mut fields = Vec::new();

        self.advance();
        self.skip_newlines();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            let field = self.cur.literal.clone();

            self.expect_peek(TokenKind::Colon)?;
            self.advance();
            fields.push((field, self.parse_expression()?));

            self.advance();
            if self.cur_is(TokenKind::Comma) || self.cur_is(TokenKind::Newline) {
                self.advance();
            }
            self.skip_newlines();
        }

        Ok(Expr::StructLiteral { name, fields, line })
    }

    /// Disambiguates a `{` expression.
    ///
    /// A lambda starts with an identifier followed by `->` (one parameter)
    /// or `,` (several); an immediately closing brace is an empty map;
    /// everything else is a map literal.
    fn parse_brace_expression(&mut self) -> ParseResult<Expr> {
        let line = self.cur.line;

        self.advance();
        self.skip_newlines();

        if self.cur_is(TokenKind::RBrace) {
            return Ok(Expr::Map { pairs: Vec::new(),
                                  line });
        }

        if self.cur_is(TokenKind::Ident) && self.peek_is(TokenKind::Arrow) {
            return self.parse_lambda(vec![self.cur.literal.clone()], line);
        }

        if self.cur_is(TokenKind::Ident) && self.peek_is(TokenKind::Comma) {
            let mut parameters = vec![self.cur.literal.clone()];
            while self.peek_is(TokenKind::Comma) {
                self.advance();
                self.advance();
                parameters.push(self.cur.literal.clone());
            }
            self.expect_peek(TokenKind::Arrow)?;
            self.advance();
            let body = self.parse_expression()?;
            self.expect_peek(TokenKind::RBrace)?;
            return Ok(Expr::Lambda { parameters,
                                     body: body.into(),
                                     line });
        }

        self.parse_map_literal_body(line)
    }

    /// Parses a single-parameter lambda with the current token on the
    /// parameter and the arrow in peek position.
    fn parse_lambda(&mut self, parameters: Vec<String>, line: usize) -> ParseResult<Expr> {
        self.advance();
        self.advance();

        let body = self.parse_expression()?;
        self.expect_peek(TokenKind::RBrace)?;

        Ok(Expr::Lambda { parameters,
                          body: body.into(),
                          line })
    }

    /// Parses the pairs of a map literal, with the current token on the
    /// first key.
    fn parse_map_literal_body(&mut self, line: usize) -> ParseResult<Expr> {
        let mut pairs = Vec::new();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            let key = self.parse_expression()?;

            self.expect_peek(TokenKind::Colon)?;
            self.advance();
            let value = self.parse_expression()?;

            pairs.push((key, value));

            self.advance();
            if self.cur_is(TokenKind::Comma) || self.cur_is(TokenKind::Newline) {
                self.advance();
            }
            self.skip_newlines();
        }

        Ok(Expr::Map { pairs, line })
    }

    /// Parses `if <condition> { ... } [else { ... }]` as an expression.
    pub(super) fn parse_if_expression(&mut self) -> ParseResult<Expr> {
        let line = self.cur.line;

        self.advance();
        let condition = self.parse_expression()?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.advance();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expr::If { condition: Box::new(condition),
                      consequence,
                      alternative,
                      line })
    }

    /// Parses `match <value> { <pattern> -> <body> ... }`.
    fn parse_match_expression(&mut self) -> ParseResult<Expr> {
        let line = self.cur.line;

        self.advance();
        let value = self.parse_expression()?;

        self.expect_peek(TokenKind::LBrace)?;
        self.advance();
        self.skip_newlines();

        let mut cases = Vec::new();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            cases.push(self.parse_match_case()?);
            self.advance();
            self.skip_newlines();
        }

        Ok(Expr::Match { value: Box::new(value),
                         cases,
                         line })
    }

    /// Parses one match case.
    ///
    /// The pattern is parsed as a general expression and then narrowed to
    /// the recognized shapes. The body is either a block or, without braces,
    /// a single expression wrapped into one.
    fn parse_match_case(&mut self) -> ParseResult<MatchCase> {
        let line = self.cur.line;

        let pattern_expr = self.parse_expression()?;
        let pattern = pattern_from_expr(pattern_expr, line)?;

        self.expect_peek(TokenKind::Arrow)?;

        let body = if self.peek_is(TokenKind::LBrace) {
            self.advance();
            self.parse_block()?
        } else {
            self.advance();
            let body_line = self.cur.line;
            let expr = self.parse_expression()?;
            Block { statements: vec![Statement::Expression { expr, line: body_line }],
                    line:       body_line, }
        };

        Ok(MatchCase { pattern, body, line })
    }

    /// Parses `Some(<expr>)` or `None`.
    fn parse_option_literal(&mut self) -> ParseResult<Expr> {
        let line = self.cur.line;

        if self.cur_is(TokenKind::None) {
            return Ok(Expr::OptionLiteral { value: None, line });
        }

        self.expect_peek(TokenKind::LParen)?;
        self.advance();
        let value = self.parse_expression()?;
        self.expect_peek(TokenKind::RParen)?;

        Ok(Expr::OptionLiteral { value: Some(Box::new(value)),
                                 line })
    }

    /// Parses `Ok(<expr>)` or `Error(<expr>)`.
    fn parse_result_literal(&mut self) -> ParseResult<Expr> {
        let line = self.cur.line;
        let is_ok = self.cur_is(TokenKind::Ok);

        self.expect_peek(TokenKind::LParen)?;
        self.advance();
        let value = self.parse_expression()?;
        self.expect_peek(TokenKind::RParen)?;

        Ok(Expr::ResultLiteral { is_ok,
                                 value: Box::new(value),
                                 line })
    }

    /// Parses `Mutable[T](<expr>)`; the bracketed element type is optional.
    fn parse_mutable_expression(&mut self) -> ParseResult<Expr> {
        let line = self.cur.line;

        let type_hint = if self.peek_is(TokenKind::LBracket) {
            self.advance();
            self.advance();
            let hint = self.parse_type_annotation()?;
            self.expect_peek(TokenKind::RBracket)?;
            Some(hint)
        } else {
            None
        };

        self.expect_peek(TokenKind::LParen)?;
        self.advance();
        let value = self.parse_expression()?;
        self.expect_peek(TokenKind::RParen)?;

        Ok(Expr::Mutable { type_hint,
                           value: Box::new(value),
                           line })
    }

    /// Parses `.with { field: value, ... }` into a struct-update node, with
    /// the current token on `with`.
    fn parse_with_expression(&mut self, object: Expr, line: usize) -> ParseResult<Expr> {
        let mut updates = Vec::new();

        self.advance();
        self.advance();
        self.skip_newlines();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            let field = self.cur.literal.clone();

            self.expect_peek(TokenKind::Colon)?;
            self.advance();
            updates.push((field, self.parse_expression()?));

            self.advance();
            if self.cur_is(TokenKind::Comma) || self.cur_is(TokenKind::Newline) {
                self.advance();
            }
            self.skip_newlines();
        }

        Ok(Expr::With { object: Box::new(object),
                        updates,
                        line })
    }
}

/// Narrows a parsed pattern expression to the recognized match shapes.
///
/// Wrapper payloads written as plain identifiers become bindings; any other
/// payload matches the shape without binding. Everything outside the five
/// shapes is rejected.
fn pattern_from_expr(expr: Expr, line: usize) -> ParseResult<Pattern> {
    let binding = |value: &Expr| match value {
        Expr::Identifier { name, .. } => Some(name.clone()),
        _ => Option::None,
    };

    match &expr {
        Expr::OptionLiteral { value: Option::None, .. } => Ok(Pattern::None),
        Expr::OptionLiteral { value: Option::Some(value), .. } => {
            Ok(Pattern::Some(binding(value)))
        },
        Expr::ResultLiteral { is_ok: true, value, .. } => Ok(Pattern::Ok(binding(value))),
        Expr::ResultLiteral { is_ok: false, value, .. } => Ok(Pattern::Err(binding(value))),
        Expr::Identifier { name, .. } => Ok(Pattern::Binding(name.clone())),
        _ => Err(ParseError::InvalidMatchPattern { line }),
    }
}
