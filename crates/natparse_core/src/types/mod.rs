//! Data model shared by the parser, type inference and the operand checker.

pub mod compat;
mod data_type;
mod file_kind;
mod format;
mod scope;

pub use data_type::{Bound, DataType, Dimension, DimensionError, TypeParseError, occurrences_size};
pub use file_kind::{FileKind, UnknownExtension};
pub use format::{DataFormat, FormatFamily, UnknownFormat};
pub use scope::{UnknownScope, VariableScope};
