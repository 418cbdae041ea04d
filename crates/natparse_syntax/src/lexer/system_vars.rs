//! System variable and system function scanning.
//!
//! Registered spellings overlap (`*LINE`, `*LINE-COUNT`, `*LINEX`), so the scanner looks at the whole run of name
//! characters after the `*` and picks the longest registered prefix that is not followed by a letter or digit.

use super::{Lexer, TokenKind};
use crate::ast::Span;
use crate::diagnostics::errors;
use natparse_core::lang::system_vars;

impl<'a> Lexer<'a> {
    /// Scan a system variable; the `*` is already consumed.
    pub(super) fn scan_system_variable(&mut self, start: usize) {
        let rest = &self.source[self.current_pos..];
        let run_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        let run = &rest[..run_len];
        let max_len = run_len.min(system_vars::max_spelling_len());

        // Name characters are ASCII, so byte offsets are char offsets.
        let matched = (1..=max_len)
            .rev()
            .filter(|&len| !run[len..].starts_with(|c: char| c.is_ascii_alphanumeric()))
            .find_map(|len| system_vars::from_str(&self.source[start..self.current_pos + len]).map(|id| (id, len)));

        match matched {
            Some((id, len)) => {
                for _ in 0..len {
                    self.advance();
                }
                self.add_token(TokenKind::SystemVar(id), start);
            }
            None => {
                for _ in 0..run_len {
                    self.advance();
                }
                let spelling = self.source[start..self.current_pos].to_string();
                let span = Span::new(start, self.current_pos);
                tracing::debug!(%spelling, "unknown system variable");
                self.diagnostics.push(errors::unknown_system_variable(&spelling, span));
                self.add_token(TokenKind::Error(spelling), start);
            }
        }
    }
}
