//! Cross-module lookup interface.
//!
//! The parser never reads files. Whatever owns the project (CLI, language server) supplies a [`ModuleIndex`] that
//! answers "what is module X?" with a [`ModuleSummary`]; the parser uses it to resolve `USING`, `CALLNAT`, `FETCH`,
//! `INCLUDE`, external `PERFORM`, prototypes and function calls.

use natparse_core::{DataType, FileKind, VariableScope};

use crate::ast::ModuleRef;

/// One variable a data area (or parameter list) exports.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredVariable {
    pub name: String,
    pub level: u32,
    pub scope: VariableScope,
    pub ty: DataType,
}

/// What the parser needs to know about another module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSummary {
    pub name: String,
    pub kind: FileKind,
    /// Top-level and nested declarations in source order, for data areas.
    pub variables: Vec<DeclaredVariable>,
    /// Declared return type, for functions.
    pub return_type: Option<DataType>,
}

impl ModuleSummary {
    pub fn new(name: impl Into<String>, kind: FileKind) -> Self {
        Self {
            name: name.into(),
            kind,
            variables: Vec::new(),
            return_type: None,
        }
    }

    pub fn to_ref(&self) -> ModuleRef {
        ModuleRef {
            name: self.name.clone(),
            kind: self.kind,
            return_type: self.return_type.clone(),
        }
    }
}

/// Resolves module names against a project.
///
/// Implementations must be cheap to query repeatedly; the parser may ask for the same name several times.
pub trait ModuleIndex {
    /// Look up a module by its (upper-case) name.
    fn find_module(&self, name: &str) -> Option<ModuleSummary>;
}
