use crate::{ast::TypeAnnotation,
            interpreter::{lexer::TokenKind,
                          parser::{ParseResult, Parser}}};

impl Parser<'_> {
    /// Parses a type annotation, with the current token on the type name.
    ///
    /// A name may be followed by a bracketed type-parameter list, parsed
    /// recursively: `List[Integer]`, `Map[String, Integer]`,
    /// `Result[Integer, String]`, `List[List[Float]]`.
    ///
    /// # Returns
    /// The parsed annotation with the current token left on the last token
    /// of the annotation.
    pub(super) fn parse_type_annotation(&mut self) -> ParseResult<TypeAnnotation> {
        let line = self.cur.line;
        let name = self.cur.literal.clone();
        let mut params = Vec::new();

        if self.peek_is(TokenKind::LBracket) {
            self.advance();
            self.advance();

            while !self.cur_is(TokenKind::RBracket) {
                params.push(self.parse_type_annotation()?);

                if self.peek_is(TokenKind::Comma) {
                    self.advance();
                    self.advance();
                } else if self.peek_is(TokenKind::RBracket) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        Ok(TypeAnnotation { name, params, line })
    }
}
