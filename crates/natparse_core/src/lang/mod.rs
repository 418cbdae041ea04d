//! Natural language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords, operators,
//! punctuation, system variable spellings, and the builtin signature table.
//!
//! The design goal is to avoid stringly-typed checks scattered across the lexer/parser/checker.
//! Instead, callers work with **stable IDs** (e.g. `KeywordId`, `SystemVarId`) and look up
//! spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO.
//! - Natural is case-insensitive, so every spelling lookup here ignores ASCII case.
//!
//! ## Examples
//! ```rust
//! use natparse_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("examine"), Some(KeywordId::Examine));
//! assert_eq!(keywords::as_str(KeywordId::Examine), "EXAMINE");
//! ```

pub mod builtins;
pub mod keywords;
pub mod operand_definitions;
pub mod operators;
pub mod punctuation;
pub mod registry;
pub mod system_vars;
