use crate::{ast::{Expr, InfixOperator},
            error::ParseError,
            interpreter::{lexer::TokenKind,
                          parser::{ParseResult, Parser}}};

/// Maps a token to its corresponding infix operator.
///
/// Returns `None` for every token that is not a binary operator; the layered
/// precedence chain uses this together with a per-level `matches!` guard to
/// decide whether to keep extending the expression. Newlines map to `None`,
/// which is what makes them expression terminators.
#[must_use]
pub const fn token_to_infix_operator(kind: TokenKind) -> Option<InfixOperator> {
    match kind {
        TokenKind::Plus => Some(InfixOperator::Add),
        TokenKind::Minus => Some(InfixOperator::Sub),
        TokenKind::Star => Some(InfixOperator::Mul),
        TokenKind::Slash => Some(InfixOperator::Div),
        TokenKind::Percent => Some(InfixOperator::Mod),
        TokenKind::Greater => Some(InfixOperator::Greater),
        TokenKind::Less => Some(InfixOperator::Less),
        TokenKind::GreaterEqual => Some(InfixOperator::GreaterEqual),
        TokenKind::LessEqual => Some(InfixOperator::LessEqual),
        TokenKind::And => Some(InfixOperator::And),
        TokenKind::Or => Some(InfixOperator::Or),
        TokenKind::Is => Some(InfixOperator::Is),
        _ => None,
    }
}

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. It begins at the
    /// lowest-precedence level, the `==` rebind, and descends through the
    /// precedence hierarchy:
    ///
    /// ```text
    /// rebind < or < and < is < comparison < sum < product < prefix < call/member < index
    /// ```
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_rebind()
    }

    /// Parses a `==` rebind expression.
    ///
    /// The left side must be a plain identifier bound to a `Mutable` value;
    /// the right side restarts at the lowest precedence, so `c == c + 1`
    /// stores the whole sum.
    ///
    /// Grammar: `rebind := or ("==" rebind)?`
    fn parse_rebind(&mut self) -> ParseResult<Expr> {
        let left = self.parse_or()?;

        if self.peek_is(TokenKind::AssignMut) {
            let line = self.peek.line;
            let Expr::Identifier { name, .. } = left else {
                return Err(ParseError::InvalidRebindTarget { line });
            };

            self.advance();
            self.advance();
            let value = self.parse_rebind()?;

            return Ok(Expr::Rebind { name,
                                     value: Box::new(value),
                                     line });
        }

        Ok(left)
    }

    /// Parses left-associative chains of `or`.
    ///
    /// Grammar: `or := and ("or" and)*`
    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;

        loop {
            if let Some(op) = token_to_infix_operator(self.peek.kind)
               && matches!(op, InfixOperator::Or)
            {
                let line = self.peek.line;
                self.advance();
                self.advance();

                let right = self.parse_and()?;
                left = Expr::Infix { left: Box::new(left),
                                     op,
                                     right: Box::new(right),
                                     line };
                continue;
            }
            break;
        }

        Ok(left)
    }

    /// Parses left-associative chains of `and`.
    ///
    /// Grammar: `and := is ("and" is)*`
    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_is()?;

        loop {
            if let Some(op) = token_to_infix_operator(self.peek.kind)
               && matches!(op, InfixOperator::And)
            {
                let line = self.peek.line;
                self.advance();
                self.advance();

                let right = self.parse_is()?;
                left = Expr::Infix { left: Box::new(left),
                                     op,
                                     right: Box::new(right),
                                     line };
                continue;
            }
            break;
        }

        Ok(left)
    }

    /// Parses left-associative chains of the `is` equality operator.
    ///
    /// `is not` needs no special handling: `not` binds tighter, so
    /// `a is not b` reads as `a is (not b)`.
    ///
    /// Grammar: `is := comparison ("is" comparison)*`
    fn parse_is(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;

        loop {
            if let Some(op) = token_to_infix_operator(self.peek.kind)
               && matches!(op, InfixOperator::Is)
            {
                let line = self.peek.line;
                self.advance();
                self.advance();

                let right = self.parse_comparison()?;
                left = Expr::Infix { left: Box::new(left),
                                     op,
                                     right: Box::new(right),
                                     line };
                continue;
            }
            break;
        }

        Ok(left)
    }

    /// Parses relational operators: `>`, `<`, `>=`, `<=`.
    ///
    /// Grammar: `comparison := sum ((">" | "<" | ">=" | "<=") sum)*`
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_sum()?;

        loop {
            if let Some(op) = token_to_infix_operator(self.peek.kind)
               && matches!(op,
                          InfixOperator::Greater
                          | InfixOperator::Less
                          | InfixOperator::GreaterEqual
                          | InfixOperator::LessEqual)
            {
                let line = self.peek.line;
                self.advance();
                self.advance();

                let right = self.parse_sum()?;
                left = Expr::Infix { left: Box::new(left),
                                     op,
                                     right: Box::new(right),
                                     line };
                continue;
            }
            break;
        }

        Ok(left)
    }

    /// Parses addition and subtraction.
    ///
    /// Grammar: `sum := product (("+" | "-") product)*`
    fn parse_sum(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_product()?;

        loop {
            if let Some(op) = token_to_infix_operator(self.peek.kind)
               && matches!(op, InfixOperator::Add | InfixOperator::Sub)
            {
                let line = self.peek.line;
                self.advance();
                self.advance();

                let right = self.parse_product()?;
                left = Expr::Infix { left: Box::new(left),
                                     op,
                                     right: Box::new(right),
                                     line };
                continue;
            }
            break;
        }

        Ok(left)
    }

    /// Parses multiplication, division, and modulo.
    ///
    /// Grammar: `product := unary (("*" | "/" | "%") unary)*`
    fn parse_product(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            if let Some(op) = token_to_infix_operator(self.peek.kind)
               && matches!(op, InfixOperator::Mul | InfixOperator::Div | InfixOperator::Mod)
            {
                let line = self.peek.line;
                self.advance();
                self.advance();

                let right = self.parse_unary()?;
                left = Expr::Infix { left: Box::new(left),
                                     op,
                                     right: Box::new(right),
                                     line };
                continue;
            }
            break;
        }

        Ok(left)
    }
}
