//! Punctuation vocabulary.
//!
//! Natural uses very little punctuation: parentheses for type specifications, index lists and argument lists,
//! commas as separators and colons in array ranges (`1:10`).
//!
//! ## Examples
//! ```rust
//! use natparse_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str(":"), Some(PunctuationId::Colon));
//! assert_eq!(punctuation::as_str(PunctuationId::LParen), "(");
//! ```

use super::registry::LangItemInfo;

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    LParen,
    RParen,
    Comma,
    Colon,
}

/// Metadata for a punctuation token.
pub type PunctuationInfo = LangItemInfo<PunctuationId>;

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::LParen, "(", "Opens a type specification, index list or argument list."),
    info(PunctuationId::RParen, ")", "Closes a type specification, index list or argument list."),
    info(PunctuationId::Comma, ",", "Separates operands, dimensions and decimal digits in types."),
    info(PunctuationId::Colon, ":", "Separates lower and upper bound of an array range."),
];

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION.iter().find(|p| p.id == id).expect("punctuation info missing")
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

const fn info(id: PunctuationId, canonical: &'static str, description: &'static str) -> PunctuationInfo {
    LangItemInfo {
        id,
        canonical,
        aliases: &[],
        description,
    }
}
