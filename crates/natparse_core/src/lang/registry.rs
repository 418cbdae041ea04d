//! Shareable metadata for `natparse_core::lang` registries.
//!
//! The `natparse_core::lang` module is a set of **registry-first** vocabularies: keywords,
//! operators, punctuation, system variables. This submodule provides the small,
//! dependency-free metadata types and spelling helpers reused across all registries.
//!
//! ## Notes
//! - These types are `Copy`-friendly so registries can live in `const` tables.
//! - Natural source is case-insensitive; every registry lookup goes through [`spelling_matches`].

/// Represent a small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use natparse_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "WRITE *TIMD(T1.)",
///     note: Some("Elapsed time since the labelled SET TIME."),
/// };
/// assert!(ex.code.contains("*TIMD"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}

/// Shared metadata shape for “registry-first” vocabulary items.
///
/// Registries that need extra per-item data (operator precedence, keyword flags) wrap the same fields in their own
/// info type instead.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

/// Compare a source spelling against a registry spelling, ignoring ASCII case.
///
/// ## Examples
/// ```rust
/// use natparse_core::lang::registry::spelling_matches;
///
/// assert!(spelling_matches("end-define", "END-DEFINE"));
/// assert!(!spelling_matches("END-DEFIN", "END-DEFINE"));
/// ```
#[inline]
pub fn spelling_matches(candidate: &str, spelling: &str) -> bool {
    candidate.eq_ignore_ascii_case(spelling)
}
