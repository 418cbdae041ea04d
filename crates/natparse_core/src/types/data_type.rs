//! The `DataType` model: format, length, dynamic flag, array dimensions and constness.
//!
//! Lengths are stored as a real number: `N7,2` is length `7.2`, i.e. seven integral and two fractional digits.
//! The declared fraction digit count is kept next to it, so `N7,20` and `N7,0` keep their exact form.
//! The textual form always uses `,` as the fraction separator; parsing accepts `,` and `.`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::format::{DataFormat, UnknownFormat};

// ============================================================================
// Dimensions
// ============================================================================

/// Upper bound of one array axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Fixed(u32),
    /// Extensible upper bound, rendered as `*`.
    Unbound,
}

/// Lower/upper bound pair for one array axis.
///
/// ## Notes
/// - The lower bound is always at least 1; [`Dimension::new`] rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    lower: u32,
    upper: Bound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    #[error("lower bound must be at least 1, found {0}")]
    LowerBoundTooSmall(i64),
    #[error("upper bound {upper} is below lower bound {lower}")]
    Inverted { lower: u32, upper: u32 },
    #[error("invalid array bound '{0}'")]
    InvalidBound(String),
}

impl Dimension {
    pub fn new(lower: i64, upper: Bound) -> Result<Self, DimensionError> {
        let lower = u32::try_from(lower)
            .ok()
            .filter(|l| *l >= 1)
            .ok_or(DimensionError::LowerBoundTooSmall(lower))?;
        match upper {
            Bound::Fixed(u) if u < lower => Err(DimensionError::Inverted { lower, upper: u }),
            _ => Ok(Self { lower, upper }),
        }
    }

    /// `1:upper`.
    pub fn with_upper(upper: u32) -> Result<Self, DimensionError> {
        Self::new(1, Bound::Fixed(upper))
    }

    /// `lower:*`.
    pub fn unbound(lower: i64) -> Result<Self, DimensionError> {
        Self::new(lower, Bound::Unbound)
    }

    pub fn lower(&self) -> u32 {
        self.lower
    }

    pub fn upper(&self) -> Bound {
        self.upper
    }

    pub fn is_upper_unbound(&self) -> bool {
        self.upper == Bound::Unbound
    }

    /// Number of occurrences, if the upper bound is fixed.
    pub fn occurrences(&self) -> Option<u32> {
        match self.upper {
            Bound::Fixed(u) => Some(u - self.lower + 1),
            Bound::Unbound => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Bound::Fixed(u) => write!(f, "{}:{}", self.lower, u),
            Bound::Unbound => write!(f, "{}:*", self.lower),
        }
    }
}

impl FromStr for Dimension {
    type Err = DimensionError;

    /// Accepts `u`, `l:u`, `*` and `l:*`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (lower, upper) = match s.split_once(':') {
            Some((l, u)) => (parse_bound_number(l)?, u.trim()),
            None => (1, s),
        };
        let upper = if upper == "*" {
            Bound::Unbound
        } else {
            let u = parse_bound_number(upper)?;
            Bound::Fixed(u32::try_from(u).map_err(|_| DimensionError::InvalidBound(upper.to_string()))?)
        };
        Dimension::new(lower, upper)
    }
}

fn parse_bound_number(s: &str) -> Result<i64, DimensionError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| DimensionError::InvalidBound(s.trim().to_string()))
}

// ============================================================================
// DataType
// ============================================================================

/// Semantic type of a variable, literal or operand.
///
/// ## Notes
/// - Format `None` implies length 0 and no dynamic flag (groups, untyped builtin parameters).
/// - A dynamic type never carries a fixed length.
/// - A type is an array iff it carries at least one [`Dimension`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    pub format: DataFormat,
    pub length: f64,
    /// Fractional digits as declared; `Some(0)` for an explicit `,0`.
    pub fraction: Option<u32>,
    pub dynamic: bool,
    pub dimensions: Vec<Dimension>,
    pub constant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("empty type specification")]
    Empty,
    #[error(transparent)]
    Format(#[from] UnknownFormat),
    #[error("invalid length '{0}'")]
    InvalidLength(String),
    #[error("format {0} does not take a length")]
    LengthNotAllowed(DataFormat),
    #[error("format {0} does not allow decimal digits")]
    FractionNotAllowed(DataFormat),
    #[error("a dynamic type can not have a fixed length")]
    DynamicWithLength,
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

impl DataType {
    /// A scalar of `format` with the given length.
    ///
    /// Formats with an implied length (`L`, `D`, `T`, `C`) ignore `length`.
    pub fn new(format: DataFormat, length: f64) -> Self {
        let length = if format.has_implicit_length() {
            format.implicit_length()
        } else {
            length
        };
        let fraction = if format.allows_fraction() && length.fract() > 0.0 {
            length
                .to_string()
                .split_once('.')
                .and_then(|(_, frac)| frac.parse().ok())
        } else {
            None
        };
        Self {
            format,
            length,
            fraction,
            dynamic: false,
            dimensions: Vec::new(),
            constant: false,
        }
    }

    /// A numeric/packed type with separate integral and fractional digit counts.
    ///
    /// No fractional digits means no fraction at all (`N7`); see [`DataType::fraction`] for an explicit `,0`.
    pub fn with_digits(format: DataFormat, integral: u32, fractional: u32) -> Self {
        if fractional == 0 {
            return Self::new(format, f64::from(integral));
        }
        let length = format!("{integral}.{fractional}").parse().unwrap_or(f64::from(integral));
        Self {
            fraction: Some(fractional),
            ..Self::new(format, length)
        }
    }

    /// A dynamic-length type (`(A) DYNAMIC`).
    pub fn dynamic(format: DataFormat) -> Self {
        Self {
            dynamic: true,
            ..Self::new(format, 0.0)
        }
    }

    /// The untyped group/`None` type.
    pub fn none() -> Self {
        Self::new(DataFormat::None, 0.0)
    }

    pub fn with_dimensions(mut self, dimensions: Vec<Dimension>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn into_constant(mut self) -> Self {
        self.constant = true;
        self
    }

    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }

    pub fn is_none(&self) -> bool {
        self.format == DataFormat::None
    }

    /// The same type without dimensions (an indexed element of the array).
    pub fn element_type(&self) -> DataType {
        DataType {
            dimensions: Vec::new(),
            ..self.clone()
        }
    }

    /// Digits before the decimal separator (or the plain length).
    pub fn integral_digits(&self) -> u32 {
        self.length.trunc() as u32
    }

    /// Digits after the decimal separator; 0 for formats without a fraction.
    pub fn fractional_digits(&self) -> u32 {
        if !self.format.allows_fraction() {
            return 0;
        }
        self.fraction.unwrap_or(0)
    }

    /// Total digit count of a numeric/packed type.
    pub fn total_digits(&self) -> u32 {
        self.integral_digits().saturating_add(self.fractional_digits())
    }

    /// Storage size in bytes, when statically known.
    ///
    /// ## Returns
    /// - `None` for dynamic and untyped types, for arrays with an unbound dimension, and when the size overflows
    ///   `u64`.
    pub fn byte_size(&self) -> Option<u64> {
        if self.dynamic {
            return None;
        }
        let n = u64::from(self.integral_digits());
        let element = match self.format {
            DataFormat::Alphanumeric | DataFormat::Binary | DataFormat::Integer | DataFormat::Float => n,
            DataFormat::Unicode => 2 * n,
            DataFormat::Numeric => u64::from(self.total_digits()),
            DataFormat::Packed => u64::from(self.total_digits()) / 2 + 1,
            DataFormat::Logic => 1,
            DataFormat::Date => 4,
            DataFormat::Time => 7,
            DataFormat::Control => 2,
            DataFormat::None => return None,
        };
        occurrences_size(element, &self.dimensions)
    }

    /// Source declaration form: `(A10)`, `(N7,2/1:10)`, `(A/1:*) DYNAMIC`.
    ///
    /// The untyped group type without dimensions renders as an empty string.
    pub fn declaration(&self) -> String {
        let core = self.render_core();
        if core.is_empty() {
            return String::new();
        }
        if self.dynamic {
            format!("({core}) DYNAMIC")
        } else {
            format!("({core})")
        }
    }

    fn render_length(&self) -> Option<String> {
        if self.dynamic || self.format.has_implicit_length() || self.length <= 0.0 {
            return None;
        }
        match self.fraction.filter(|_| self.format.allows_fraction()) {
            Some(frac) => Some(format!("{},{}", self.integral_digits(), frac)),
            None => Some(self.integral_digits().to_string()),
        }
    }

    /// Format, length and dimensions without parentheses or the `DYNAMIC` suffix.
    fn render_core(&self) -> String {
        let mut out = String::from(self.format.shortform());
        if let Some(len) = self.render_length() {
            out.push_str(&len);
        }
        if !self.dimensions.is_empty() {
            if !out.is_empty() {
                out.push('/');
            }
            let dims: Vec<String> = self.dimensions.iter().map(Dimension::to_string).collect();
            out.push_str(&dims.join(","));
        }
        out
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_core())?;
        if self.dynamic {
            f.write_str(" DYNAMIC")?;
        }
        Ok(())
    }
}

impl FromStr for DataType {
    type Err = TypeParseError;

    /// Parse `A10`, `N7,2`, `N7.2`, `(A10/1:*)`, `A DYNAMIC`, `(A/1:10) DYNAMIC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut text = s.trim();
        let mut dynamic = false;
        if text.len() >= 7 && text[text.len() - 7..].eq_ignore_ascii_case("DYNAMIC") {
            dynamic = true;
            text = text[..text.len() - 7].trim_end();
        }
        if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            text = inner.trim();
        }

        let (head, dims) = match text.split_once('/') {
            Some((head, dims)) => (head.trim(), Some(dims)),
            None => (text, None),
        };

        let mut chars = head.chars();
        let format = DataFormat::try_from(chars.next().ok_or(TypeParseError::Empty)?)?;
        let length_text = chars.as_str().trim();

        let mut ty = if length_text.is_empty() {
            if dynamic {
                DataType::dynamic(format)
            } else {
                DataType::new(format, 0.0)
            }
        } else {
            if dynamic {
                return Err(TypeParseError::DynamicWithLength);
            }
            if format.has_implicit_length() {
                return Err(TypeParseError::LengthNotAllowed(format));
            }
            parse_length(format, length_text)?
        };

        if let Some(dims) = dims {
            ty.dimensions = dims
                .split(',')
                .map(str::parse::<Dimension>)
                .collect::<Result<Vec<_>, _>>()?;
        }
        Ok(ty)
    }
}

/// `element` bytes times the occurrences of every dimension; `None` for unbound dimensions or on overflow.
pub fn occurrences_size(element: u64, dimensions: &[Dimension]) -> Option<u64> {
    dimensions
        .iter()
        .try_fold(element, |size, d| size.checked_mul(u64::from(d.occurrences()?)))
}

fn parse_length(format: DataFormat, text: &str) -> Result<DataType, TypeParseError> {
    let invalid = || TypeParseError::InvalidLength(text.to_string());
    let (integral, fractional) = match text.split_once([',', '.']) {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };
    let integral: u32 = integral.parse().map_err(|_| invalid())?;
    match fractional {
        None => Ok(DataType::new(format, f64::from(integral))),
        Some(f) => {
            if !format.allows_fraction() {
                return Err(TypeParseError::FractionNotAllowed(format));
            }
            let fractional: u32 = f.parse().map_err(|_| invalid())?;
            Ok(DataType {
                fraction: Some(fractional),
                ..DataType::with_digits(format, integral, fractional)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> DataType {
        s.parse().unwrap_or_else(|e| panic!("{s:?} failed to parse: {e}"))
    }

    #[test]
    fn renders_closed_forms() {
        for s in ["L", "A10", "N7,2", "N9", "I4", "C", "D", "T", "B4", "U10", "F8", "P8", "P12,7"] {
            assert_eq!(ty(s).to_string(), s);
        }
    }

    #[test]
    fn accepts_dot_as_fraction_separator() {
        assert_eq!(ty("N7.2").to_string(), "N7,2");
        assert_eq!(ty("N7.2").fractional_digits(), 2);
        assert_eq!(ty("N7.2").integral_digits(), 7);
    }

    #[test]
    fn fraction_digits_are_kept_as_declared() {
        assert_eq!(ty("N7,0").to_string(), "N7,0");
        assert_eq!(ty("N7,20").to_string(), "N7,20");
        assert_eq!(ty("N7,20").fractional_digits(), 20);
        assert_ne!(ty("N7,20"), ty("N7,2"));
        assert_eq!(ty("P3.0").fractional_digits(), 0);
        assert_eq!(DataType::with_digits(DataFormat::Numeric, 3, 0).to_string(), "N3");
        assert_eq!(DataType::new(DataFormat::Numeric, 7.2).to_string(), "N7,2");
    }

    #[test]
    fn renders_dimensions_in_declared_order() {
        let t = DataType::new(DataFormat::Alphanumeric, 10.0).with_dimensions(vec![
            Dimension::new(1, Bound::Fixed(10)).unwrap(),
            Dimension::new(15, Bound::Fixed(20)).unwrap(),
        ]);
        assert_eq!(t.to_string(), "A10/1:10,15:20");
        let t = DataType::new(DataFormat::Alphanumeric, 10.0).with_dimensions(vec![Dimension::unbound(1).unwrap()]);
        assert_eq!(t.to_string(), "A10/1:*");
    }

    #[test]
    fn declaration_forms() {
        insta::assert_snapshot!(ty("A10").declaration(), @"(A10)");
        insta::assert_snapshot!(ty("(A/1:*) DYNAMIC").declaration(), @"(A/1:*) DYNAMIC");
        insta::assert_snapshot!(DataType::dynamic(DataFormat::Alphanumeric).declaration(), @"(A) DYNAMIC");
        insta::assert_snapshot!(ty("A/1:10 DYNAMIC").declaration(), @"(A/1:10) DYNAMIC");
        assert_eq!(DataType::none().declaration(), "");
    }

    #[test]
    fn single_upper_bound_means_one_based() {
        assert_eq!(ty("A10/5").to_string(), "A10/1:5");
        assert_eq!(ty("A10/*").to_string(), "A10/1:*");
    }

    #[test]
    fn rejects_invalid_specifications() {
        assert_eq!("X10".parse::<DataType>(), Err(TypeParseError::Format(UnknownFormat('X'))));
        assert_eq!("L1".parse::<DataType>(), Err(TypeParseError::LengthNotAllowed(DataFormat::Logic)));
        assert_eq!("A10,2".parse::<DataType>(), Err(TypeParseError::FractionNotAllowed(DataFormat::Alphanumeric)));
        assert_eq!("A10 DYNAMIC".parse::<DataType>(), Err(TypeParseError::DynamicWithLength));
        assert!(matches!(
            "A10/0:5".parse::<DataType>(),
            Err(TypeParseError::Dimension(DimensionError::LowerBoundTooSmall(0)))
        ));
        assert_eq!("".parse::<DataType>(), Err(TypeParseError::Empty));
    }

    #[test]
    fn byte_sizes() {
        assert_eq!(ty("A10").byte_size(), Some(10));
        assert_eq!(ty("U10").byte_size(), Some(20));
        assert_eq!(ty("N7,2").byte_size(), Some(9));
        assert_eq!(ty("P7,2").byte_size(), Some(5));
        assert_eq!(ty("P5").byte_size(), Some(3));
        assert_eq!(ty("L").byte_size(), Some(1));
        assert_eq!(ty("D").byte_size(), Some(4));
        assert_eq!(ty("T").byte_size(), Some(7));
        assert_eq!(ty("A10/1:3,1:2").byte_size(), Some(60));
        assert_eq!(ty("A10/1:*").byte_size(), None);
        assert_eq!(DataType::dynamic(DataFormat::Alphanumeric).byte_size(), None);
        assert_eq!(DataType::none().byte_size(), None);
    }

    #[test]
    fn oversized_arrays_have_no_byte_size() {
        let huge = format!("A253/{0},{0},{0}", u32::MAX);
        assert_eq!(ty(&huge).byte_size(), None);
        let t = ty(&format!("N29,{}", u32::MAX));
        assert_eq!(t.total_digits(), u32::MAX);
        assert_eq!(occurrences_size(u64::MAX, &[Dimension::with_upper(2).unwrap()]), None);
        assert_eq!(occurrences_size(3, &[Dimension::with_upper(4).unwrap()]), Some(12));
    }

    #[test]
    fn implicit_length_formats_normalize() {
        assert_eq!(DataType::new(DataFormat::Date, 0.0), ty("D"));
        assert_eq!(DataType::new(DataFormat::Logic, 1.0), ty("L"));
    }
}
