//! Builtin registry: result types, mutability and signatures of system variables and functions.
//!
//! The table is keyed by [`SystemVarId`] and built once, on first use, by [`builtin_table`]. Everything per-symbol is
//! data in that function; callers never special-case individual system variables.
//!
//! ## Notes
//! - Untyped parameters (labels, arbitrary operands) carry the untyped format with length 1.
//! - `*OCC`/`*OCCURRENCE` and `*LBOUND`/`*UBOUND` take the array and an optional dimension (default 1).
//!
//! ## Examples
//! ```rust
//! use natparse_core::lang::builtins::{self, BuiltinDefinition};
//! use natparse_core::lang::system_vars::SystemVarId;
//!
//! let datx = builtins::lookup(SystemVarId::Datx).unwrap();
//! assert_eq!(datx.result_type().to_string(), "D");
//! assert!(!datx.is_modifiable());
//!
//! let occ = builtins::lookup(SystemVarId::Occ).unwrap();
//! assert!(matches!(occ, BuiltinDefinition::Function { params, .. } if params.len() == 2));
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use super::system_vars::SystemVarId;
use crate::types::{DataFormat as F, DataType};

/// One parameter of a system function.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinParameter {
    pub name: &'static str,
    pub ty: DataType,
    pub mandatory: bool,
}

/// Definition of one system variable or system function.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinDefinition {
    Variable {
        ty: DataType,
        modifiable: bool,
    },
    Function {
        ty: DataType,
        params: Vec<BuiltinParameter>,
    },
}

impl BuiltinDefinition {
    pub fn result_type(&self) -> &DataType {
        match self {
            BuiltinDefinition::Variable { ty, .. } | BuiltinDefinition::Function { ty, .. } => ty,
        }
    }

    /// Functions are never assignable.
    pub fn is_modifiable(&self) -> bool {
        matches!(self, BuiltinDefinition::Variable { modifiable: true, .. })
    }

    pub fn params(&self) -> &[BuiltinParameter] {
        match self {
            BuiltinDefinition::Variable { .. } => &[],
            BuiltinDefinition::Function { params, .. } => params,
        }
    }

    /// Number of parameters a call must supply.
    pub fn mandatory_params(&self) -> usize {
        self.params().iter().filter(|p| p.mandatory).count()
    }
}

static TABLE: LazyLock<HashMap<SystemVarId, BuiltinDefinition>> = LazyLock::new(builtin_table);

/// Look up the definition of a system variable or function.
pub fn lookup(id: SystemVarId) -> Option<&'static BuiltinDefinition> {
    TABLE.get(&id)
}

/// Number of registered builtins.
pub fn len() -> usize {
    TABLE.len()
}

/// Build the builtin table. Pure; called once by the process-wide registry.
pub fn builtin_table() -> HashMap<SystemVarId, BuiltinDefinition> {
    use SystemVarId as S;

    let entries = vec![
        // Environment
        unmodifiable(S::ApplicId, F::Alphanumeric, 8.0),
        unmodifiable(S::ApplicName, F::Alphanumeric, 32.0),
        unmodifiable(S::InitId, F::Alphanumeric, 8.0),
        unmodifiable(S::Linesize, F::Numeric, 7.0),
        unmodifiable(S::Pagesize, F::Numeric, 7.0),
        unmodifiable(S::NetUser, F::Alphanumeric, 253.0),
        unmodifiable(S::ParmUser, F::Alphanumeric, 253.0),
        unmodifiable(S::Natvers, F::Alphanumeric, 8.0),
        unmodifiable(S::PatchLevel, F::Alphanumeric, 8.0),
        unmodifiable(S::Hardware, F::Alphanumeric, 16.0),
        unmodifiable(S::Hostname, F::Alphanumeric, 64.0),
        unmodifiable(S::Locale, F::Alphanumeric, 8.0),
        unmodifiable(S::MachineClass, F::Alphanumeric, 16.0),
        unmodifiable(S::Steplib, F::Alphanumeric, 8.0),
        unmodifiable(S::LibraryId, F::Alphanumeric, 8.0),
        unmodifiable(S::Subroutine, F::Alphanumeric, 32.0),
        unmodifiable(S::Type, F::Alphanumeric, 32.0),
        unmodifiable(S::Linex, F::Alphanumeric, 100.0),
        unmodifiable(S::LoadLibraryId, F::Alphanumeric, 8.0),
        unmodifiable(S::CurrentUnit, F::Alphanumeric, 32.0),
        modifiable(S::Language, F::Integer, 1.0),
        modifiable(S::Startup, F::Alphanumeric, 8.0),
        // Date and time
        unmodifiable(S::Time, F::Alphanumeric, 10.0),
        unmodifiable(S::Timx, F::Time, 0.0),
        unmodifiable(S::Timestmp, F::Binary, 8.0),
        unmodifiable(S::Timestmpx, F::Binary, 16.0),
        unmodifiable(S::TimeOut, F::Numeric, 5.0),
        unmodifiable(S::Timn, F::Numeric, 7.0),
        function(S::Timd, DataType::new(F::Numeric, 7.0), vec![label(true)]),
        unmodifiable(S::Datd, F::Alphanumeric, 8.0),
        unmodifiable(S::Date, F::Alphanumeric, 8.0),
        unmodifiable(S::Dat4e, F::Alphanumeric, 10.0),
        unmodifiable(S::Datg, F::Alphanumeric, 15.0),
        unmodifiable(S::Dat4d, F::Alphanumeric, 10.0),
        unmodifiable(S::Dati, F::Alphanumeric, 8.0),
        unmodifiable(S::Dat4i, F::Alphanumeric, 10.0),
        unmodifiable(S::Datj, F::Alphanumeric, 5.0),
        unmodifiable(S::Dat4j, F::Alphanumeric, 7.0),
        unmodifiable(S::Datx, F::Date, 0.0),
        unmodifiable(S::Datn, F::Numeric, 8.0),
        unmodifiable(S::Datu, F::Alphanumeric, 8.0),
        unmodifiable(S::Dat4u, F::Alphanumeric, 10.0),
        unmodifiable(S::Datv, F::Alphanumeric, 11.0),
        unmodifiable(S::Datvs, F::Alphanumeric, 9.0),
        // Reports, windows and the cursor
        modifiable(S::PageNumber, F::Packed, 5.0),
        unmodifiable(S::LineCount, F::Packed, 5.0),
        unmodifiable(S::WindowLs, F::Numeric, 3.0),
        unmodifiable(S::WindowPs, F::Numeric, 3.0),
        unmodifiable(S::WindowPos, F::Numeric, 6.0),
        unmodifiable(S::Line, F::Integer, 4.0),
        unmodifiable(S::ErrorLine, F::Numeric, 4.0),
        unmodifiable(S::Cursor, F::Numeric, 6.0),
        unmodifiable(S::CursField, F::Integer, 4.0),
        modifiable(S::CursLine, F::Packed, 3.0),
        modifiable(S::CursCol, F::Packed, 3.0),
        unmodifiable(S::PfKey, F::Alphanumeric, 4.0),
        unmodifiable(S::PfName, F::Alphanumeric, 10.0),
        unmodifiable(S::ScreenIo, F::Logic, 1.0),
        unmodifiable_dynamic(S::PageEvent, F::Unicode),
        unmodifiable(S::PageLevel, F::Integer, 4.0),
        modifiable(S::Hardcopy, F::Alphanumeric, 8.0),
        modifiable(S::Com, F::Alphanumeric, 128.0),
        // Errors and statement state
        modifiable(S::Number, F::Packed, 10.0),
        modifiable(S::Length, F::Integer, 4.0),
        modifiable(S::Error, F::Numeric, 7.0),
        modifiable(S::ErrorNr, F::Numeric, 7.0),
        modifiable(S::ErrorTa, F::Alphanumeric, 8.0),
        unmodifiable(S::ThisObject, F::None, 0.0),
        unmodifiable(S::Data, F::Numeric, 3.0),
        unmodifiable(S::Editor, F::Logic, 1.0),
        unmodifiable(S::Level, F::Numeric, 2.0),
        modifiable(S::Convid, F::Integer, 4.0),
        // Device, system and user
        unmodifiable(S::BrowserIo, F::Alphanumeric, 8.0),
        unmodifiable(S::Device, F::Alphanumeric, 8.0),
        unmodifiable(S::CpuTime, F::Integer, 4.0),
        unmodifiable(S::Etid, F::Alphanumeric, 8.0),
        unmodifiable(S::InitProgram, F::Alphanumeric, 8.0),
        unmodifiable(S::ServerType, F::Alphanumeric, 32.0),
        unmodifiable(S::Tp, F::Alphanumeric, 8.0),
        unmodifiable(S::Tpsys, F::Alphanumeric, 8.0),
        unmodifiable(S::Opsys, F::Alphanumeric, 8.0),
        unmodifiable(S::Os, F::Alphanumeric, 32.0),
        unmodifiable(S::Osvers, F::Alphanumeric, 16.0),
        unmodifiable(S::Program, F::Alphanumeric, 8.0),
        unmodifiable(S::ReinputType, F::Alphanumeric, 16.0),
        unmodifiable(S::Rowcount, F::Alphanumeric, 16.0),
        unmodifiable(S::Group, F::Alphanumeric, 8.0),
        unmodifiable(S::UserName, F::Alphanumeric, 32.0),
        unmodifiable(S::Codepage, F::Alphanumeric, 64.0),
        unmodifiable(S::Ui, F::Alphanumeric, 16.0),
        unmodifiable(S::User, F::Alphanumeric, 8.0),
        unmodifiable(S::InitUser, F::Alphanumeric, 8.0),
        unmodifiable(S::Pid, F::Alphanumeric, 32.0),
        // XML/JSON parsing
        function(S::ParseCol, DataType::new(F::Integer, 4.0), vec![label(false)]),
        function(S::ParseRow, DataType::new(F::Integer, 4.0), vec![label(false)]),
        function(S::ParseLevel, DataType::new(F::Integer, 4.0), vec![label(false)]),
        function(S::ParseType, DataType::new(F::Alphanumeric, 1.0), vec![label(false)]),
        function(S::ParseIndex, DataType::new(F::Integer, 4.0), vec![label(false)]),
        function(S::ParseNamespaceUri, DataType::new(F::Alphanumeric, 255.0), vec![label(false)]),
        // Loops and arrays
        function(S::Isn, DataType::new(F::Packed, 10.0), vec![label(false)]),
        function(S::Counter, DataType::new(F::Packed, 10.0), vec![label(false)]),
        function(S::Occurrence, DataType::new(F::Integer, 4.0), array_params()),
        function(S::Occ, DataType::new(F::Integer, 4.0), array_params()),
        function(S::Lbound, DataType::new(F::Integer, 4.0), array_params()),
        function(S::Ubound, DataType::new(F::Integer, 4.0), array_params()),
        // Value functions
        function(S::Minval, DataType::new(F::Float, 8.0), operand_params()),
        function(S::Maxval, DataType::new(F::Float, 8.0), operand_params()),
        function(
            S::Trim,
            DataType::dynamic(F::Alphanumeric),
            vec![param("operand", DataType::dynamic(F::Alphanumeric), true)],
        ),
        function(
            S::Translate,
            DataType::dynamic(F::Alphanumeric),
            vec![
                param("operand", DataType::dynamic(F::Alphanumeric), true),
                param("mode", untyped(), true),
            ],
        ),
    ];

    let table: HashMap<_, _> = entries.into_iter().collect();
    tracing::debug!(entries = table.len(), "built builtin table");
    table
}

// --- helpers -----------------------------------------------------------------

fn unmodifiable(id: SystemVarId, format: F, length: f64) -> (SystemVarId, BuiltinDefinition) {
    variable(id, DataType::new(format, length), false)
}

fn unmodifiable_dynamic(id: SystemVarId, format: F) -> (SystemVarId, BuiltinDefinition) {
    variable(id, DataType::dynamic(format), false)
}

fn modifiable(id: SystemVarId, format: F, length: f64) -> (SystemVarId, BuiltinDefinition) {
    variable(id, DataType::new(format, length), true)
}

fn variable(id: SystemVarId, ty: DataType, modifiable: bool) -> (SystemVarId, BuiltinDefinition) {
    (id, BuiltinDefinition::Variable { ty, modifiable })
}

fn function(id: SystemVarId, ty: DataType, params: Vec<BuiltinParameter>) -> (SystemVarId, BuiltinDefinition) {
    (id, BuiltinDefinition::Function { ty, params })
}

fn param(name: &'static str, ty: DataType, mandatory: bool) -> BuiltinParameter {
    BuiltinParameter { name, ty, mandatory }
}

fn untyped() -> DataType {
    DataType {
        length: 1.0,
        ..DataType::none()
    }
}

fn label(mandatory: bool) -> BuiltinParameter {
    param("label", untyped(), mandatory)
}

fn array_params() -> Vec<BuiltinParameter> {
    vec![param("array", untyped(), true), param("dimension", untyped(), false)]
}

fn operand_params() -> Vec<BuiltinParameter> {
    vec![
        param("operand1", untyped(), true),
        param("operand2", untyped(), false),
        param("operand3", untyped(), false),
    ]
}
