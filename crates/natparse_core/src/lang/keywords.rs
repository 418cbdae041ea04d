//! Define the keyword vocabulary of Natural.
//!
//! This module is the single source of truth for keywords: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, aliases, categories and whether the grammar also
//! accepts the word as a variable name.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-insensitive** (`examine`, `Examine` and `EXAMINE` are the same keyword).
//! - Many Natural keywords are only reserved inside the clause that uses them. Those carry
//!   `can_be_identifier: true`; the parser decides per position which reading applies.
//! - Word comparison operators (`EQ`, `NE`, ...) live in [`crate::lang::operators`].
//!
//! ## Examples
//! ```rust
//! use natparse_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("end-define"), Some(KeywordId::EndDefine));
//! assert_eq!(keywords::from_str("DELIMITERS"), Some(KeywordId::Delimiter)); // alias
//! assert!(keywords::can_be_identifier(KeywordId::Delimiter));
//! assert!(!keywords::can_be_identifier(KeywordId::Examine));
//! ```

/// Stable identifier for every keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeywordId {
    // Data definition
    Define,
    Data,
    EndDefine,
    Global,
    Parameter,
    Local,
    Independent,
    Using,
    Redefine,
    Filler,
    View,
    Init,
    Const,
    Dynamic,

    // Modules and callables
    Subroutine,
    EndSubroutine,
    Prototype,
    EndPrototype,
    Function,
    EndFunction,
    Returns,
    Variable,
    Perform,
    Callnat,
    Fetch,
    Include,
    Return,

    // EXAMINE
    Examine,
    Full,
    Value,
    Of,
    Pattern,
    Delimiter,
    Direction,
    Forward,
    Backward,
    Starting,
    Ending,
    Position,
    Replace,
    Delete,
    First,
    Number,
    Length,
    Index,
    Translate,
    Upper,
    Lower,
    Case,
    Inverted,
    Charposition,
    Charlength,
    In,

    // PARSE JSON/XML
    Parse,
    Json,
    Xml,
    Path,
    Name,
    Subcode,
    EndParse,

    // Control flow
    Decide,
    On,
    Every,
    Any,
    All,
    None,
    Condition,
    When,
    EndDecide,
    If,
    Then,
    Else,
    EndIf,
    For,
    Thru,
    Step,
    EndFor,
    Repeat,
    Until,
    While,
    EndRepeat,
    Escape,
    Top,
    Bottom,
    Routine,
    Module,
    Immediate,
    Reposition,
    Ignore,

    // Array statements
    Resize,
    Expand,
    Reduce,
    Array,

    // Data manipulation
    Assign,
    Compute,
    Rounded,
    Move,
    Reset,
    Initial,
    Add,
    Subtract,
    Multiply,
    Divide,
    By,
    Remainder,
    Compress,
    Numeric,
    Leaving,
    No,
    Space,
    Substr,

    // Output
    Write,
    Display,
    Print,
    Notitle,

    // Misc statements
    Set,
    Time,
    End,
    Stop,

    // Shared clause words
    And,
    Or,
    Not,
    To,
    From,
    At,
    With,
    Into,
    Giving,

    // Literals
    True,
    False,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - `Statement` keywords start a statement and end any open operand list.
/// - `Terminator` keywords close a block (`END-IF`, `END-DEFINE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Statement,
    Terminator,
    Clause,
    DataDefinition,
    Literal,
    Operator,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub category: KeywordCategory,
    /// The grammar accepts this word as a variable name outside the clause that reserves it.
    pub can_be_identifier: bool,
}

use KeywordCategory::{Clause, DataDefinition, Literal, Operator, Statement, Terminator};

/// Registry of all keywords.
///
/// ## Notes
/// - Ordering is grouped for readability only.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Data definition
    info(KeywordId::Define, "DEFINE", Statement),
    ident(KeywordId::Data, "DATA", DataDefinition),
    info(KeywordId::EndDefine, "END-DEFINE", Terminator),
    info(KeywordId::Global, "GLOBAL", DataDefinition),
    info(KeywordId::Parameter, "PARAMETER", DataDefinition),
    info(KeywordId::Local, "LOCAL", DataDefinition),
    info(KeywordId::Independent, "INDEPENDENT", DataDefinition),
    info(KeywordId::Using, "USING", DataDefinition),
    info(KeywordId::Redefine, "REDEFINE", DataDefinition),
    info(KeywordId::Filler, "FILLER", DataDefinition),
    info(KeywordId::View, "VIEW", DataDefinition),
    info(KeywordId::Init, "INIT", DataDefinition),
    aliased(KeywordId::Const, "CONST", &["CONSTANT"], DataDefinition, false),
    info(KeywordId::Dynamic, "DYNAMIC", DataDefinition),
    // Modules and callables
    ident(KeywordId::Subroutine, "SUBROUTINE", Clause),
    info(KeywordId::EndSubroutine, "END-SUBROUTINE", Terminator),
    ident(KeywordId::Prototype, "PROTOTYPE", Clause),
    info(KeywordId::EndPrototype, "END-PROTOTYPE", Terminator),
    ident(KeywordId::Function, "FUNCTION", Clause),
    info(KeywordId::EndFunction, "END-FUNCTION", Terminator),
    info(KeywordId::Returns, "RETURNS", Clause),
    ident(KeywordId::Variable, "VARIABLE", Clause),
    info(KeywordId::Perform, "PERFORM", Statement),
    info(KeywordId::Callnat, "CALLNAT", Statement),
    info(KeywordId::Fetch, "FETCH", Statement),
    info(KeywordId::Include, "INCLUDE", Statement),
    ident(KeywordId::Return, "RETURN", Clause),
    // EXAMINE
    info(KeywordId::Examine, "EXAMINE", Statement),
    ident(KeywordId::Full, "FULL", Clause),
    ident(KeywordId::Value, "VALUE", Clause),
    info(KeywordId::Of, "OF", Clause),
    ident(KeywordId::Pattern, "PATTERN", Clause),
    aliased(KeywordId::Delimiter, "DELIMITER", &["DELIMITERS"], Clause, true),
    ident(KeywordId::Direction, "DIRECTION", Clause),
    ident(KeywordId::Forward, "FORWARD", Clause),
    ident(KeywordId::Backward, "BACKWARD", Clause),
    ident(KeywordId::Starting, "STARTING", Clause),
    ident(KeywordId::Ending, "ENDING", Clause),
    ident(KeywordId::Position, "POSITION", Clause),
    ident(KeywordId::Replace, "REPLACE", Clause),
    ident(KeywordId::Delete, "DELETE", Clause),
    ident(KeywordId::First, "FIRST", Clause),
    ident(KeywordId::Number, "NUMBER", Clause),
    ident(KeywordId::Length, "LENGTH", Clause),
    ident(KeywordId::Index, "INDEX", Clause),
    ident(KeywordId::Translate, "TRANSLATE", Clause),
    ident(KeywordId::Upper, "UPPER", Clause),
    ident(KeywordId::Lower, "LOWER", Clause),
    ident(KeywordId::Case, "CASE", Clause),
    ident(KeywordId::Inverted, "INVERTED", Clause),
    info(KeywordId::Charposition, "CHARPOSITION", Clause),
    info(KeywordId::Charlength, "CHARLENGTH", Clause),
    info(KeywordId::In, "IN", Clause),
    // PARSE JSON/XML
    info(KeywordId::Parse, "PARSE", Statement),
    ident(KeywordId::Json, "JSON", Clause),
    ident(KeywordId::Xml, "XML", Clause),
    ident(KeywordId::Path, "PATH", Clause),
    ident(KeywordId::Name, "NAME", Clause),
    ident(KeywordId::Subcode, "SUBCODE", Clause),
    info(KeywordId::EndParse, "END-PARSE", Terminator),
    // Control flow
    info(KeywordId::Decide, "DECIDE", Statement),
    info(KeywordId::On, "ON", Clause),
    ident(KeywordId::Every, "EVERY", Clause),
    info(KeywordId::Any, "ANY", Clause),
    info(KeywordId::All, "ALL", Clause),
    info(KeywordId::None, "NONE", Clause),
    ident(KeywordId::Condition, "CONDITION", Clause),
    info(KeywordId::When, "WHEN", Clause),
    info(KeywordId::EndDecide, "END-DECIDE", Terminator),
    info(KeywordId::If, "IF", Statement),
    info(KeywordId::Then, "THEN", Clause),
    info(KeywordId::Else, "ELSE", Terminator),
    info(KeywordId::EndIf, "END-IF", Terminator),
    info(KeywordId::For, "FOR", Statement),
    info(KeywordId::Thru, "THRU", Clause),
    ident(KeywordId::Step, "STEP", Clause),
    info(KeywordId::EndFor, "END-FOR", Terminator),
    info(KeywordId::Repeat, "REPEAT", Statement),
    info(KeywordId::Until, "UNTIL", Clause),
    info(KeywordId::While, "WHILE", Clause),
    info(KeywordId::EndRepeat, "END-REPEAT", Terminator),
    info(KeywordId::Escape, "ESCAPE", Statement),
    ident(KeywordId::Top, "TOP", Clause),
    ident(KeywordId::Bottom, "BOTTOM", Clause),
    ident(KeywordId::Routine, "ROUTINE", Clause),
    ident(KeywordId::Module, "MODULE", Clause),
    ident(KeywordId::Immediate, "IMMEDIATE", Clause),
    ident(KeywordId::Reposition, "REPOSITION", Clause),
    info(KeywordId::Ignore, "IGNORE", Statement),
    // Array statements
    info(KeywordId::Resize, "RESIZE", Statement),
    info(KeywordId::Expand, "EXPAND", Statement),
    info(KeywordId::Reduce, "REDUCE", Statement),
    ident(KeywordId::Array, "ARRAY", Clause),
    // Data manipulation
    info(KeywordId::Assign, "ASSIGN", Statement),
    info(KeywordId::Compute, "COMPUTE", Statement),
    ident(KeywordId::Rounded, "ROUNDED", Clause),
    info(KeywordId::Move, "MOVE", Statement),
    info(KeywordId::Reset, "RESET", Statement),
    ident(KeywordId::Initial, "INITIAL", Clause),
    info(KeywordId::Add, "ADD", Statement),
    info(KeywordId::Subtract, "SUBTRACT", Statement),
    info(KeywordId::Multiply, "MULTIPLY", Statement),
    info(KeywordId::Divide, "DIVIDE", Statement),
    info(KeywordId::By, "BY", Clause),
    ident(KeywordId::Remainder, "REMAINDER", Clause),
    info(KeywordId::Compress, "COMPRESS", Statement),
    ident(KeywordId::Numeric, "NUMERIC", Clause),
    ident(KeywordId::Leaving, "LEAVING", Clause),
    info(KeywordId::No, "NO", Clause),
    ident(KeywordId::Space, "SPACE", Clause),
    aliased(KeywordId::Substr, "SUBSTR", &["SUBSTRING"], Clause, false),
    // Output
    info(KeywordId::Write, "WRITE", Statement),
    info(KeywordId::Display, "DISPLAY", Statement),
    info(KeywordId::Print, "PRINT", Statement),
    ident(KeywordId::Notitle, "NOTITLE", Clause),
    // Misc statements
    info(KeywordId::Set, "SET", Statement),
    ident(KeywordId::Time, "TIME", Clause),
    info(KeywordId::End, "END", Statement),
    info(KeywordId::Stop, "STOP", Statement),
    // Shared clause words
    info(KeywordId::And, "AND", Operator),
    info(KeywordId::Or, "OR", Operator),
    info(KeywordId::Not, "NOT", Operator),
    info(KeywordId::To, "TO", Clause),
    info(KeywordId::From, "FROM", Clause),
    info(KeywordId::At, "AT", Clause),
    info(KeywordId::With, "WITH", Clause),
    info(KeywordId::Into, "INTO", Clause),
    info(KeywordId::Giving, "GIVING", Clause),
    // Literals
    info(KeywordId::True, "TRUE", Literal),
    info(KeywordId::False, "FALSE", Literal),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Syntax-kind name: the canonical spelling with `-` replaced by `_`.
pub fn syntax_name(id: KeywordId) -> &'static str {
    match id {
        KeywordId::EndDefine => "END_DEFINE",
        KeywordId::EndSubroutine => "END_SUBROUTINE",
        KeywordId::EndPrototype => "END_PROTOTYPE",
        KeywordId::EndFunction => "END_FUNCTION",
        KeywordId::EndParse => "END_PARSE",
        KeywordId::EndDecide => "END_DECIDE",
        KeywordId::EndIf => "END_IF",
        KeywordId::EndFor => "END_FOR",
        KeywordId::EndRepeat => "END_REPEAT",
        other => as_str(other),
    }
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return `true` if the grammar also accepts the keyword as a variable name.
pub fn can_be_identifier(id: KeywordId) -> bool {
    info_for(id).can_be_identifier
}

/// Return `true` if the keyword begins a statement.
pub fn starts_statement(id: KeywordId) -> bool {
    category(id) == KeywordCategory::Statement
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling (canonical or alias), ignoring ASCII case.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS
        .iter()
        .find(|k| k.canonical.eq_ignore_ascii_case(s) || k.aliases.iter().any(|a| a.eq_ignore_ascii_case(s)))
        .map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    aliased(id, canonical, &[], category, false)
}

const fn ident(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    aliased(id, canonical, &[], category, true)
}

const fn aliased(
    id: KeywordId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    category: KeywordCategory,
    can_be_identifier: bool,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        aliases,
        category,
        can_be_identifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn spellings_are_unique_and_uppercase() {
        let mut seen = HashSet::new();
        for k in KEYWORDS {
            for spelling in std::iter::once(&k.canonical).chain(k.aliases.iter()) {
                assert_eq!(*spelling, spelling.to_ascii_uppercase(), "{spelling} must be upper case");
                assert!(seen.insert(*spelling), "duplicate keyword spelling {spelling}");
            }
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(from_str("Examine"), Some(KeywordId::Examine));
        assert_eq!(from_str("substring"), Some(KeywordId::Substr));
        assert_eq!(from_str("#EXAMINE"), None);
    }

    #[test]
    fn terminators_never_double_as_identifiers() {
        for k in KEYWORDS.iter().filter(|k| k.category == KeywordCategory::Terminator) {
            assert!(!k.can_be_identifier, "{} is a terminator", k.canonical);
        }
    }

    #[test]
    fn syntax_names_replace_dashes() {
        for k in KEYWORDS {
            assert_eq!(syntax_name(k.id), k.canonical.replace('-', "_"), "{}", k.canonical);
        }
    }
}
