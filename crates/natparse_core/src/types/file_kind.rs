//! Module kinds and their source file extensions.

use std::fmt;

use thiserror::Error;

/// Kind of compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Program,
    Subprogram,
    Subroutine,
    Function,
    Copycode,
    Lda,
    Gda,
    Pda,
    Map,
    Helproutine,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a known source file extension")]
pub struct UnknownExtension(pub String);

impl FileKind {
    pub const ALL: [FileKind; 10] = [
        FileKind::Program,
        FileKind::Subprogram,
        FileKind::Subroutine,
        FileKind::Function,
        FileKind::Copycode,
        FileKind::Lda,
        FileKind::Gda,
        FileKind::Pda,
        FileKind::Map,
        FileKind::Helproutine,
    ];

    /// Extension without the leading dot, upper case.
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Program => "NSP",
            FileKind::Subprogram => "NSN",
            FileKind::Subroutine => "NSS",
            FileKind::Function => "NS7",
            FileKind::Copycode => "NSC",
            FileKind::Lda => "NSL",
            FileKind::Gda => "NSG",
            FileKind::Pda => "NSA",
            FileKind::Map => "NSM",
            FileKind::Helproutine => "NSH",
        }
    }

    /// Resolve an extension, with or without the leading dot, ignoring case.
    pub fn from_extension(ext: &str) -> Result<Self, UnknownExtension> {
        let bare = ext.strip_prefix('.').unwrap_or(ext);
        FileKind::ALL
            .into_iter()
            .find(|k| k.extension().eq_ignore_ascii_case(bare))
            .ok_or_else(|| UnknownExtension(ext.to_string()))
    }

    /// Data areas only hold a DEFINE DATA block.
    pub fn is_data_area(self) -> bool {
        matches!(self, FileKind::Lda | FileKind::Gda | FileKind::Pda)
    }

    /// Modules whose body may declare parameters.
    pub fn can_have_parameters(self) -> bool {
        matches!(
            self,
            FileKind::Subprogram | FileKind::Subroutine | FileKind::Function | FileKind::Helproutine
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Program => "PROGRAM",
            FileKind::Subprogram => "SUBPROGRAM",
            FileKind::Subroutine => "SUBROUTINE",
            FileKind::Function => "FUNCTION",
            FileKind::Copycode => "COPYCODE",
            FileKind::Lda => "LDA",
            FileKind::Gda => "GDA",
            FileKind::Pda => "PDA",
            FileKind::Map => "MAP",
            FileKind::Helproutine => "HELPROUTINE",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
