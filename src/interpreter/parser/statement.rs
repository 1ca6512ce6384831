use crate::{ast::{Block, FunctionDef, Parameter, Statement, StructField},
            interpreter::{lexer::TokenKind,
                          parser::{ParseResult, Parser}}};

impl Parser<'_> {
    /// Parses a single statement, dispatching on the current token.
    ///
    /// Keyword-led statements each have a dedicated production; anything
    /// else, `match` included, parses as an expression statement.
    ///
    /// # Returns
    /// A parsed [`Statement`] node with the current token left on the
    /// statement's last token.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.cur.kind {
            TokenKind::Def => self.parse_def_statement(),
            TokenKind::Fun => Ok(Statement::Function(self.parse_function_def()?)),
            TokenKind::Struct => self.parse_struct_statement(),
            TokenKind::Extend => self.parse_extend_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::If => {
                let line = self.cur.line;
                let expr = self.parse_if_expression()?;
                Ok(Statement::Expression { expr, line })
            },
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Break => Ok(Statement::Break { line: self.cur.line }),
            TokenKind::Continue => Ok(Statement::Continue { line: self.cur.line }),
            TokenKind::Import => self.parse_import_statement(),
            _ => {
                let line = self.cur.line;
                let expr = self.parse_expression()?;
                Ok(Statement::Expression { expr, line })
            },
        }
    }

    /// Parses a binding: `def <name> = <expr>` or `def <name>: <type> = <expr>`.
    fn parse_def_statement(&mut self) -> ParseResult<Statement> {
        let line = self.cur.line;

        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur.literal.clone();

        let type_hint = if self.peek_is(TokenKind::Colon) {
            self.advance();
            self.advance();
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        self.expect_peek(TokenKind::Assign)?;
        self.advance();
        let value = self.parse_expression()?;

        Ok(Statement::Def { name,
                            type_hint,
                            value,
                            line })
    }

    /// Parses a function declaration:
    /// `fun <name>(<params>) [-> <type>] { <body> }`.
    ///
    /// Used for top-level `fun` statements and for methods inside `extend`
    /// blocks.
    pub(super) fn parse_function_def(&mut self) -> ParseResult<FunctionDef> {
        let line = self.cur.line;

        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur.literal.clone();

        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;

        let return_type = if self.peek_is(TokenKind::Arrow) {
            self.advance();
            self.advance();
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(FunctionDef { name,
                         parameters,
                         return_type,
                         body: body.into(),
                         line })
    }

    /// Parses a parenthesized parameter list, each parameter optionally
    /// typed: `(a, b: Integer)`.
    fn parse_function_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Ok(parameters);
        }

        self.advance();
        parameters.push(self.parse_function_parameter()?);

        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            parameters.push(self.parse_function_parameter()?);
        }

        self.expect_peek(TokenKind::RParen)?;

        Ok(parameters)
    }

    fn parse_function_parameter(&mut self) -> ParseResult<Parameter> {
        let name = self.cur.literal.clone();

        let type_hint = if self.peek_is(TokenKind::Colon) {
            self.advance();
            self.advance();
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        Ok(Parameter { name, type_hint })
    }

    /// Parses `return` with an optional value; a newline, closing brace, or
    /// end of input directly after the keyword means a bare return.
    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let line = self.cur.line;
        self.advance();

        let value = if self.cur_is(TokenKind::Newline)
                       || self.cur_is(TokenKind::RBrace)
                       || self.cur_is(TokenKind::Eof)
        {
            None
        } else {
            Some(self.parse_expression()?)
        };

        Ok(Statement::Return { value, line })
    }

    /// Parses `while <condition> { <body> }`.
    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        let line = self.cur.line;

        self.advance();
        let condition = self.parse_expression()?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Statement::While { condition, body, line })
    }

    /// Parses `for <name> in <iterable> { <body> }`.
    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        let line = self.cur.line;

        self.expect_peek(TokenKind::Ident)?;
        let variable = self.cur.literal.clone();

        self.expect_peek(TokenKind::In)?;
        self.advance();
        let iterable = self.parse_expression()?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Statement::For { variable,
                            iterable,
                            body,
                            line })
    }

    /// Parses `struct <Name> { <field>[: <type>], ... }`.
    fn parse_struct_statement(&mut self) -> ParseResult<Statement> {
        let line = self.cur.line;

        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur.literal.clone();

        self.expect_peek(TokenKind::LBrace)?;
        let fields = self.parse_struct_fields()?;

        Ok(Statement::Struct { name, fields, line })
    }

    /// Parses the field list of a struct declaration; fields may be
    /// separated by commas, newlines, or both.
    fn parse_struct_fields(&mut self) -> ParseResult<Vec<StructField>> {
        let mut fields = Vec::new();

        self.advance();
        self.skip_newlines();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            let name = self.cur.literal.clone();

            let type_hint = if self.peek_is(TokenKind::Colon) {
                self.advance();
                self.advance();
                Some(self.parse_type_annotation()?)
            } else {
                None
            };

            fields.push(StructField { name, type_hint });

            self.advance();
            if self.cur_is(TokenKind::Comma) || self.cur_is(TokenKind::Newline) {
                self.advance();
            }
            self.skip_newlines();
        }

        Ok(fields)
    }

    /// Parses `extend <TypeName> { fun ... }`, collecting the method
    /// declarations inside the block.
    fn parse_extend_statement(&mut self) -> ParseResult<Statement> {
        let line = self.cur.line;

        self.expect_peek(TokenKind::Ident)?;
        let type_name = self.cur.literal.clone();

        self.expect_peek(TokenKind::LBrace)?;
        self.advance();
        self.skip_newlines();

        let mut methods = Vec::new();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if self.cur_is(TokenKind::Fun) {
                methods.push(self.parse_function_def()?);
            }
            self.advance();
            self.skip_newlines();
        }

        Ok(Statement::Extend { type_name,
                               methods,
                               line })
    }

    /// Parses `import a.b.c` into its dotted path segments.
    fn parse_import_statement(&mut self) -> ParseResult<Statement> {
        let line = self.cur.line;

        self.advance();
        let mut path = vec![self.cur.literal.clone()];

        while self.peek_is(TokenKind::Dot) {
            self.advance();
            self.advance();
            path.push(self.cur.literal.clone());
        }

        Ok(Statement::Import { path, line })
    }

    /// Parses a brace-delimited statement block, with the current token on
    /// the opening brace. Newlines between statements are skipped.
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let line = self.cur.line;
        let mut statements = Vec::new();

        self.advance();
        self.skip_newlines();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.advance();
            self.skip_newlines();
        }

        Ok(Block { statements, line })
    }
}
