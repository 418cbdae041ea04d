//! Syntax front end for Natural modules: lexer, arena AST, parser, diagnostics.
//!
//! This crate turns source text into a [`parser::ParsedModule`]: a syntax tree whose references are already bound
//! to their declarations, plus the queue of operand checks the semantic pass still has to run.
//!
//! ## Notes
//! - This crate stops at syntax and binding: type inference and the operand checks live in the `natparse` crate.
//! - Vocabulary identity (keywords/operators/punctuation/system variables) comes from `natparse_core::lang`.
//! - Other modules are only ever seen through the [`module_index::ModuleIndex`] trait; nothing here reads files.
//!
//! ## Examples
//! ```rust
//! use natparse_syntax::{lexer, parser};
//!
//! let lexed = lexer::lex("WRITE 'hello'\nEND\n");
//! assert!(lexed.diagnostics.is_empty());
//! let parsed = parser::parse(&lexed.tokens, &parser::ParseOptions::default(), None);
//! assert_eq!(parsed.statements().len(), 2);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod module_index;
pub mod operand_check;
pub mod parser;
pub mod token_helpers;
