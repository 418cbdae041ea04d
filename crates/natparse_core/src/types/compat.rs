//! Format compatibility policy.
//!
//! These helpers decide whether a value of one [`DataType`] may flow into a position of another. They only look at
//! formats; shape (scalar/array/constant) is the operand checker's job.
//!
//! ## Examples
//! ```rust
//! use natparse_core::types::compat;
//! use natparse_core::{DataFormat, DataType};
//!
//! let alpha = DataType::new(DataFormat::Alphanumeric, 10.0);
//! let num = DataType::new(DataFormat::Numeric, 5.0);
//! assert!(compat::is_compatible(&alpha, &num));
//! assert!(!compat::is_compatible(&num, &alpha));
//! assert!(!compat::is_same_family(&alpha, &num));
//! ```

use super::data_type::DataType;
use super::format::{DataFormat, FormatFamily};

/// Whether `source` can be implicitly converted into `target`.
///
/// ## Parameters
/// - `target`: the receiving position (left side of an assignment).
/// - `source`: the inferred type of the value.
///
/// ## Returns
/// - `true` when either side is untyped; untyped values are never reported.
pub fn is_compatible(target: &DataType, source: &DataType) -> bool {
    formats_compatible(target.format, source.format)
}

/// Format-level version of [`is_compatible`].
pub fn formats_compatible(target: DataFormat, source: DataFormat) -> bool {
    use FormatFamily as F;

    if target == DataFormat::None || source == DataFormat::None {
        return true;
    }
    if target == DataFormat::Binary {
        return matches!(source.family(), F::Alphanumeric | F::Numeric);
    }
    match target.family() {
        F::Alphanumeric => source != DataFormat::Control,
        F::Numeric => matches!(source.family(), F::Numeric | F::DateTime) || source == DataFormat::Binary,
        F::DateTime => matches!(source.family(), F::DateTime | F::Numeric),
        F::Logical => source.family() == F::Logical,
        F::Control => source == DataFormat::Control,
        F::None => true,
    }
}

/// Whether both types belong to the same [`FormatFamily`].
///
/// Untyped sides are accepted, as with [`is_compatible`].
pub fn is_same_family(left: &DataType, right: &DataType) -> bool {
    if left.is_none() || right.is_none() {
        return true;
    }
    left.format.family() == right.format.family()
}

/// Widest of two types, used for arithmetic results.
///
/// ## Notes
/// - Float beats packed beats numeric beats integer; ties go to the longer type.
/// - Other formats keep the left side unless the right is strictly longer.
/// - Dimensions and constness are dropped: the result of an expression is a plain scalar.
pub fn widest(left: &DataType, right: &DataType) -> DataType {
    let rank = |f: DataFormat| match f {
        DataFormat::Float => 4,
        DataFormat::Packed => 3,
        DataFormat::Numeric => 2,
        DataFormat::Integer => 1,
        _ => 0,
    };
    let (l, r) = (rank(left.format), rank(right.format));
    let digits = |t: &DataType| (t.integral_digits(), t.fractional_digits());
    let pick = if r > l || (r == l && digits(right) > digits(left)) {
        right
    } else {
        left
    };
    DataType {
        dimensions: Vec::new(),
        constant: false,
        ..pick.clone()
    }
}
