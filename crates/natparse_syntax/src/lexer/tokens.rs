//! Token types for the Natural lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for keywords (including those that may also name variables)
//! - `Operator(OperatorId)` for symbolic and word operators (`=`, `EQ`, `:=`)
//! - `Punctuation(PunctuationId)` for punctuation tokens
//! - `SystemVar(SystemVarId)` for `*`-prefixed system variables and functions
//!
//! ## Notes
//! - Every token keeps its raw source text; kinds carry normalized values (upper-cased identifiers, unescaped strings).
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use natparse_core::lang::keywords::{self, KeywordId};
use natparse_core::lang::operators::OperatorId;
use natparse_core::lang::punctuation::PunctuationId;
use natparse_core::lang::system_vars::{self, SystemVarId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Identity of the source a token was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceId(pub u32);

/// Prefix of a typed literal (`H'..'`, `D'..'`, `T'..'`, `U'..'`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralPrefix {
    Hex,
    Date,
    Time,
    Unicode,
}

impl LiteralPrefix {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'H' => Some(LiteralPrefix::Hex),
            'D' => Some(LiteralPrefix::Date),
            'T' => Some(LiteralPrefix::Time),
            'U' => Some(LiteralPrefix::Unicode),
            _ => None,
        }
    }
}

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation / system variable (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),
    SystemVar(SystemVarId),

    // ========== Identifiers and Literals ==========
    /// Upper-cased identifier, possibly qualified (`#GRP.#FIELD`).
    Ident(String),
    /// Statement label without its trailing dot (`R1.` is `Label("R1")`).
    Label(String),
    Integer(String),
    Decimal(String),
    /// String literal content with doubled quotes collapsed.
    String(String),
    TypedLiteral(LiteralPrefix, String),

    // ========== Special ==========
    /// Text no rule matched; a lex diagnostic was recorded for it.
    Error(String),
    Eof,
}

/// A token with its kind, raw text and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// 1-based line.
    pub line: u32,
    /// 1-based column (in bytes).
    pub column: u32,
    pub source: SourceId,
}

impl Token {
    /// Construct a token at line 1/column 1 of the default source; mostly useful in tests.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line: 1,
            column: 1,
            source: SourceId::default(),
        }
    }
}

impl TokenKind {
    /// Stable syntax-kind name (`SV_TIMX`, `EXAMINE`, `IDENTIFIER`, ...).
    pub fn syntax_name(&self) -> &'static str {
        match self {
            TokenKind::Keyword(id) => keyword_syntax_name(*id),
            TokenKind::SystemVar(id) => system_vars::kind_name(*id),
            TokenKind::Operator(id) => match id {
                OperatorId::Plus => "PLUS",
                OperatorId::Minus => "MINUS",
                OperatorId::Star => "ASTERISK",
                OperatorId::Slash => "SLASH",
                OperatorId::StarStar => "EXPONENT",
                OperatorId::Assign => "COLON_EQUALS_SIGN",
                OperatorId::Eq => "EQUALS_SIGN",
                OperatorId::NotEq => "LESSER_GREATER",
                OperatorId::Lt => "LESSER_SIGN",
                OperatorId::LtEq => "LESSER_EQUALS_SIGN",
                OperatorId::Gt => "GREATER_SIGN",
                OperatorId::GtEq => "GREATER_EQUALS_SIGN",
            },
            TokenKind::Punctuation(id) => match id {
                PunctuationId::LParen => "LPAREN",
                PunctuationId::RParen => "RPAREN",
                PunctuationId::Comma => "COMMA",
                PunctuationId::Colon => "COLON",
            },
            TokenKind::Ident(_) => "IDENTIFIER",
            TokenKind::Label(_) => "LABEL_IDENTIFIER",
            TokenKind::Integer(_) | TokenKind::Decimal(_) => "NUMBER_LITERAL",
            TokenKind::String(_) => "STRING_LITERAL",
            TokenKind::TypedLiteral(prefix, _) => match prefix {
                LiteralPrefix::Hex => "HEX_LITERAL",
                LiteralPrefix::Date => "DATE_LITERAL",
                LiteralPrefix::Time => "TIME_LITERAL",
                LiteralPrefix::Unicode => "UNICODE_LITERAL",
            },
            TokenKind::Error(_) => "ERROR",
            TokenKind::Eof => "EOF",
        }
    }
}

/// Keyword kind names are the canonical spelling with `-` replaced by `_` (`END-IF` is `END_IF`).
fn keyword_syntax_name(id: KeywordId) -> &'static str {
    keywords::syntax_name(id)
}

/// Resolve an identifier spelling to a keyword id, if it is one.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
