//! Operand definition sets: what is legal at one operand position.
//!
//! A statement position is described by one [`OperandDefinitions`] value combining format flags (which data formats
//! are accepted) with structure flags (constant, scalar, array, group, system variable, arithmetic expression).
//! The parser attaches one set per constrained operand; the operand checker evaluates it after parsing.
//!
//! ## Examples
//! ```rust
//! use natparse_core::lang::operand_definitions::OperandDefinitions as D;
//!
//! let target = D::SCALAR | D::ARRAY | D::FORMAT_NUMERIC | D::FORMAT_PACKED | D::FORMAT_INTEGER;
//! assert_eq!(target.allowed_formats_text(), "I, N, P");
//! assert_eq!(target.allowed_structures_text(), "It must be one of: a scalar value, an array");
//! ```

use bitflags::bitflags;

use crate::types::DataFormat;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OperandDefinitions: u32 {
        const FORMAT_ALPHANUMERIC = 1 << 0;
        const FORMAT_BINARY = 1 << 1;
        const FORMAT_CONTROL = 1 << 2;
        const FORMAT_DATE = 1 << 3;
        const FORMAT_FLOAT = 1 << 4;
        const FORMAT_INTEGER = 1 << 5;
        const FORMAT_LOGIC = 1 << 6;
        const FORMAT_NUMERIC = 1 << 7;
        const FORMAT_PACKED = 1 << 8;
        const FORMAT_TIME = 1 << 9;
        const FORMAT_UNICODE = 1 << 10;
        /// Any format is accepted; format flags are not consulted.
        const ALL_FORMATS = 1 << 11;

        const CONSTANT = 1 << 16;
        const SCALAR = 1 << 17;
        const ARRAY = 1 << 18;
        const GROUP = 1 << 19;
        /// System variables that can only be read.
        const SYSTEM_VARIABLE = 1 << 20;
        const MODIFIABLE_SYSTEM_VARIABLE = 1 << 21;
        const ARITHMETIC = 1 << 22;

        /// `N`, `P`, `I`: positions that take a count, index or position.
        const NUMERIC_COUNTERS = Self::FORMAT_NUMERIC.bits() | Self::FORMAT_PACKED.bits() | Self::FORMAT_INTEGER.bits();
        /// `A`, `U`, `B`: positions that take character data.
        const CHARACTER = Self::FORMAT_ALPHANUMERIC.bits() | Self::FORMAT_UNICODE.bits() | Self::FORMAT_BINARY.bits();
    }
}

/// Format flags in the order diagnostics list them.
const FORMAT_FLAGS: [(OperandDefinitions, DataFormat); 11] = [
    (OperandDefinitions::FORMAT_ALPHANUMERIC, DataFormat::Alphanumeric),
    (OperandDefinitions::FORMAT_BINARY, DataFormat::Binary),
    (OperandDefinitions::FORMAT_CONTROL, DataFormat::Control),
    (OperandDefinitions::FORMAT_DATE, DataFormat::Date),
    (OperandDefinitions::FORMAT_FLOAT, DataFormat::Float),
    (OperandDefinitions::FORMAT_INTEGER, DataFormat::Integer),
    (OperandDefinitions::FORMAT_LOGIC, DataFormat::Logic),
    (OperandDefinitions::FORMAT_NUMERIC, DataFormat::Numeric),
    (OperandDefinitions::FORMAT_PACKED, DataFormat::Packed),
    (OperandDefinitions::FORMAT_TIME, DataFormat::Time),
    (OperandDefinitions::FORMAT_UNICODE, DataFormat::Unicode),
];

/// Structure flags with their description, in the order diagnostics list them.
const STRUCTURE_TEXTS: [(OperandDefinitions, &str); 7] = [
    (OperandDefinitions::CONSTANT, "a constant"),
    (OperandDefinitions::SCALAR, "a scalar value"),
    (OperandDefinitions::ARRAY, "an array"),
    (OperandDefinitions::GROUP, "a group"),
    (OperandDefinitions::SYSTEM_VARIABLE, "an unmodifiable system variable"),
    (OperandDefinitions::MODIFIABLE_SYSTEM_VARIABLE, "a modifiable system variable"),
    (OperandDefinitions::ARITHMETIC, "an arithmetic expression"),
];

impl OperandDefinitions {
    /// The format flag for `format`, or `None` for the untyped format.
    pub fn for_format(format: DataFormat) -> Option<OperandDefinitions> {
        FORMAT_FLAGS.iter().find(|(_, f)| *f == format).map(|(flag, _)| *flag)
    }

    /// Whether a value of `format` passes the format part of this set.
    ///
    /// Formats without a flag (untyped) always pass.
    pub fn accepts_format(self, format: DataFormat) -> bool {
        if self.contains(Self::ALL_FORMATS) {
            return true;
        }
        Self::for_format(format).is_none_or(|flag| self.contains(flag))
    }

    /// Allowed format letters joined with `", "`, in `A B C D F I L N P T U` order.
    pub fn allowed_formats_text(self) -> String {
        if self.contains(Self::ALL_FORMATS) {
            return "any".to_string();
        }
        let letters: Vec<&str> = FORMAT_FLAGS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, format)| format.shortform())
            .collect();
        if letters.is_empty() {
            return "none".to_string();
        }
        letters.join(", ")
    }

    /// `"It must be one of: ..."` listing the structures this set admits.
    pub fn allowed_structures_text(self) -> String {
        let items: Vec<&str> = STRUCTURE_TEXTS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, text)| *text)
            .collect();
        format!("It must be one of: {}", items.join(", "))
    }
}
