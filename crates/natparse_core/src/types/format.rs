//! Data formats and their families.

use std::fmt;

use thiserror::Error;

/// The format tag of a Natural data type.
///
/// ## Notes
/// - `None` is the format of groups and of untyped parameters in builtin signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataFormat {
    Alphanumeric,
    Binary,
    Control,
    Date,
    Float,
    Integer,
    Logic,
    Numeric,
    Packed,
    Time,
    Unicode,
    None,
}

/// Coarse grouping of formats used for compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatFamily {
    Alphanumeric,
    Numeric,
    DateTime,
    Logical,
    Control,
    None,
}

/// Unknown single-letter format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown data format '{0}'")]
pub struct UnknownFormat(pub char);

impl DataFormat {
    /// All real formats, in the order diagnostics list them.
    pub const ALL: [DataFormat; 11] = [
        DataFormat::Alphanumeric,
        DataFormat::Binary,
        DataFormat::Control,
        DataFormat::Date,
        DataFormat::Float,
        DataFormat::Integer,
        DataFormat::Logic,
        DataFormat::Numeric,
        DataFormat::Packed,
        DataFormat::Time,
        DataFormat::Unicode,
    ];

    /// Single-letter source form (`A`, `N`, ...). `None` has no letter and renders as an empty string.
    pub fn shortform(self) -> &'static str {
        match self {
            DataFormat::Alphanumeric => "A",
            DataFormat::Binary => "B",
            DataFormat::Control => "C",
            DataFormat::Date => "D",
            DataFormat::Float => "F",
            DataFormat::Integer => "I",
            DataFormat::Logic => "L",
            DataFormat::Numeric => "N",
            DataFormat::Packed => "P",
            DataFormat::Time => "T",
            DataFormat::Unicode => "U",
            DataFormat::None => "",
        }
    }

    pub fn family(self) -> FormatFamily {
        match self {
            DataFormat::Alphanumeric | DataFormat::Unicode | DataFormat::Binary => FormatFamily::Alphanumeric,
            DataFormat::Numeric | DataFormat::Packed | DataFormat::Integer | DataFormat::Float => {
                FormatFamily::Numeric
            }
            DataFormat::Date | DataFormat::Time => FormatFamily::DateTime,
            DataFormat::Logic => FormatFamily::Logical,
            DataFormat::Control => FormatFamily::Control,
            DataFormat::None => FormatFamily::None,
        }
    }

    /// Formats whose length is implied and never written (`L`, `D`, `T`, `C`).
    pub fn has_implicit_length(self) -> bool {
        matches!(
            self,
            DataFormat::Logic | DataFormat::Date | DataFormat::Time | DataFormat::Control | DataFormat::None
        )
    }

    /// Formats whose length may carry decimal digits (`N7,2`, `P12,7`).
    pub fn allows_fraction(self) -> bool {
        matches!(self, DataFormat::Numeric | DataFormat::Packed)
    }

    /// Implied length of formats that never spell one out.
    pub fn implicit_length(self) -> f64 {
        match self {
            DataFormat::Logic => 1.0,
            DataFormat::Date => 4.0,
            DataFormat::Time => 7.0,
            DataFormat::Control => 2.0,
            _ => 0.0,
        }
    }
}

impl TryFrom<char> for DataFormat {
    type Error = UnknownFormat;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(DataFormat::Alphanumeric),
            'B' => Ok(DataFormat::Binary),
            'C' => Ok(DataFormat::Control),
            'D' => Ok(DataFormat::Date),
            'F' => Ok(DataFormat::Float),
            'I' => Ok(DataFormat::Integer),
            'L' => Ok(DataFormat::Logic),
            'N' => Ok(DataFormat::Numeric),
            'P' => Ok(DataFormat::Packed),
            'T' => Ok(DataFormat::Time),
            'U' => Ok(DataFormat::Unicode),
            other => Err(UnknownFormat(other)),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shortform())
    }
}
