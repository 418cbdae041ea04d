//! Provide the shared, pure vocabulary and data model of the Natural front end.
//!
//! This crate is intentionally small and dependency-light. It contains everything that both the syntax crate and the
//! semantic passes need to agree on:
//! - the keyword/operator/punctuation registries and the system variable spellings,
//! - the builtin registry (result types, mutability and parameter signatures of system variables/functions),
//! - the data type model (`DataFormat`, `DataType`, `Dimension`, `VariableScope`) and module file kinds,
//! - the operand definition flags used by the deferred operand checks.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no AST types, no diagnostics.
//! - The only process-wide state is the builtin table, which is built once and never mutated.

pub mod lang;
pub mod types;

pub use types::{Bound, DataFormat, DataType, Dimension, FileKind, FormatFamily, VariableScope};
