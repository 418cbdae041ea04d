#![forbid(unsafe_code)]
//! natparse: a front end for the Natural 4GL
//!
//! This crate ties the shared crates together: `natparse_core` (vocabulary, data types, builtin registry) and
//! `natparse_syntax` (lexer, parser, AST, diagnostics). On top of them it provides type inference, the deferred
//! operand checker, the per-module pipeline, project indexes and the `natparse` CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Source problems are not errors**: anything wrong with the Natural source is a `Diagnostic`, never a `Result::Err`
//!   and never a panic. Every module parses to a tree.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a front end bug (logic error), use `.expect("INVARIANT: reason")` with
//!   a clear explanation.

pub mod cli;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;

pub use frontend::{FrontendConfig, Module, ModuleIdentity, parse_module};
