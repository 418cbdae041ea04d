//! Define the operator vocabulary of Natural.
//!
//! Operators cover arithmetic (`+ - * / **`), assignment (`:=`) and comparisons. Comparisons have both a
//! symbolic and a word spelling (`=` / `EQ`, `<>` / `NE`, ...); both resolve to the same [`OperatorId`].
//!
//! ## Notes
//! - Symbol lookup is exact; word lookup via [`from_word`] ignores ASCII case.
//! - Logical connectives (`AND`, `OR`, `NOT`) are keywords, see [`crate::lang::keywords`].
//!
//! ## Examples
//! ```rust
//! use natparse_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("<>"), Some(OperatorId::NotEq));
//! assert_eq!(operators::from_word("ne"), Some(OperatorId::NotEq));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

/// Stable identifier for operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    StarStar,

    // Assignment
    Assign,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// Syntactic role of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Arithmetic,
    Assignment,
    Comparison,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `precedence` is relative; higher binds tighter.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub symbols: &'static [&'static str],
    pub words: &'static [&'static str],
    pub precedence: u8,
    pub kind: OperatorKind,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    op(OperatorId::Plus, &["+"], &[], 50, OperatorKind::Arithmetic),
    op(OperatorId::Minus, &["-"], &[], 50, OperatorKind::Arithmetic),
    op(OperatorId::Star, &["*"], &[], 60, OperatorKind::Arithmetic),
    op(OperatorId::Slash, &["/"], &[], 60, OperatorKind::Arithmetic),
    op(OperatorId::StarStar, &["**"], &[], 70, OperatorKind::Arithmetic),
    op(OperatorId::Assign, &[":="], &[], 0, OperatorKind::Assignment),
    op(OperatorId::Eq, &["="], &["EQ"], 20, OperatorKind::Comparison),
    op(OperatorId::NotEq, &["<>"], &["NE"], 20, OperatorKind::Comparison),
    op(OperatorId::Lt, &["<"], &["LT"], 20, OperatorKind::Comparison),
    op(OperatorId::LtEq, &["<="], &["LE"], 20, OperatorKind::Comparison),
    op(OperatorId::Gt, &[">"], &["GT"], 20, OperatorKind::Comparison),
    op(OperatorId::GtEq, &[">="], &["GE"], 20, OperatorKind::Comparison),
];

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Canonical (first symbolic) spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).symbols.first().copied().unwrap_or("")
}

/// Resolve a symbolic operator spelling.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.symbols.contains(&spelling)).map(|o| o.id)
}

/// Resolve a word operator spelling (`EQ`, `ne`, ...), ignoring ASCII case.
pub fn from_word(word: &str) -> Option<OperatorId> {
    OPERATORS
        .iter()
        .find(|o| o.words.iter().any(|w| w.eq_ignore_ascii_case(word)))
        .map(|o| o.id)
}

/// Return `true` for comparison operators.
pub fn is_comparison(id: OperatorId) -> bool {
    info_for(id).kind == OperatorKind::Comparison
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    symbols: &'static [&'static str],
    words: &'static [&'static str],
    precedence: u8,
    kind: OperatorKind,
) -> OperatorInfo {
    OperatorInfo {
        id,
        symbols,
        words,
        precedence,
        kind,
    }
}
