//! String, typed literal and number scanning.

use super::{LiteralPrefix, Lexer, TokenKind};
use crate::ast::Span;
use crate::diagnostics::errors;

impl<'a> Lexer<'a> {
    /// Scan a string literal; the opening quote is already consumed.
    pub(super) fn scan_string(&mut self, start: usize, quote: char) {
        let content = self.scan_quoted(start, quote);
        self.add_token(TokenKind::String(content), start);
    }

    /// Scan `H'..'`, `D'..'`, `T'..'` or `U'..'`; only the prefix letter is consumed so far.
    pub(super) fn scan_typed_literal(&mut self, start: usize, prefix: char) {
        let Some(prefix) = LiteralPrefix::from_char(prefix) else {
            return;
        };
        let Some(quote) = self.advance() else {
            return;
        };
        let content = self.scan_quoted(start, quote);
        self.add_token(TokenKind::TypedLiteral(prefix, content), start);
    }

    /// Read up to the closing quote, collapsing doubled quotes. Strings never span lines.
    fn scan_quoted(&mut self, start: usize, quote: char) -> String {
        let mut content = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    if self.match_char(quote) {
                        content.push(quote);
                    } else {
                        return content;
                    }
                }
                None | Some('\n') => {
                    self.diagnostics
                        .push(errors::unterminated_string(Span::new(start, self.current_pos)));
                    return content;
                }
                Some(c) => {
                    self.advance();
                    content.push(c);
                }
            }
        }
    }

    /// Scan an integer or decimal; the first digit (or the leading `.`) is already consumed.
    pub(super) fn scan_number(&mut self, start: usize) {
        let mut is_decimal = self.source[start..self.current_pos].starts_with('.');

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if !is_decimal && self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_decimal = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = self.source[start..self.current_pos].to_string();
        if is_decimal {
            self.add_token(TokenKind::Decimal(text), start);
        } else {
            self.add_token(TokenKind::Integer(text), start);
        }
    }
}
