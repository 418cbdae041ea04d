//! Natural front end
//!
//! This module contains all front end components:
//! - `lexer`, `parser`, `ast`, `diagnostics`: syntax, provided by the shared `natparse_syntax` crate
//! - `type_inference`: the data type an operand evaluates to
//! - `operand_checker`: the deferred operand checks queued by the parser
//! - `module`: the lex, parse, check pipeline for one module
//! - `index`: project indexes resolving cross-module references

// Syntax components are provided by the shared natparse_syntax crate.
pub use natparse_syntax::{ast, diagnostics, lexer, module_index, operand_check, parser};

pub mod config;
pub mod index;
pub mod module;
pub mod operand_checker;
pub mod type_inference;

pub use config::FrontendConfig;
pub use module::{Module, ModuleIdentity, parse_module};
