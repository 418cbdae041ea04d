//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers keep the parser's lookahead checks short: `self.peek().is_keyword(KeywordId::Giving)` instead of a
//! `matches!` per call site.

use crate::lexer::{Token, TokenKind};
use natparse_core::lang::keywords::{self, KeywordId};
use natparse_core::lang::operators::OperatorId;
use natparse_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the operator id, if this is an operator token.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for keywords that begin a statement or close a block.
    pub fn is_statement_boundary(&self) -> bool {
        match self {
            TokenKind::Keyword(id) => {
                keywords::starts_statement(*id) || keywords::category(*id) == keywords::KeywordCategory::Terminator
            }
            TokenKind::Label(_) | TokenKind::Eof => true,
            _ => false,
        }
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.operator_id()`.
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }

    /// Name usable as a variable: identifiers, and keywords the grammar also accepts as names (in source spelling).
    pub fn identifier_name(&self) -> Option<String> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name.clone()),
            TokenKind::Keyword(id) if keywords::can_be_identifier(*id) => Some(self.text.to_ascii_uppercase()),
            _ => None,
        }
    }
}
