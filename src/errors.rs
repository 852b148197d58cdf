use std::fmt::Display;

use crate::interpolators::InterpolatorKind;

///
/// Raised by construction and by every mutation when the data would break the
/// store invariants. The interpolator is left untouched whenever this is returned.
///
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ValidationError
{
    LengthMismatch { x: usize, y: usize },
    TooFewPoints { got: usize, need: usize },
    NonFiniteKey { index: usize },
    NonFiniteValue { index: usize },
    DuplicateKey { key: f64 },
    NotSorted { index: usize },
    NotAfterLastKey { key: f64, last: f64 },
}
impl std::error::Error for ValidationError {}

impl Display for ValidationError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self
        {
            ValidationError::LengthMismatch { x, y } => write!(f, "x and y lengths do not match ({x} != {y})"),
            ValidationError::TooFewPoints { got, need } => write!(f, "at least {need} points are required, got {got}"),
            ValidationError::NonFiniteKey { index } => write!(f, "x contains NaN or infinite value at index {index}"),
            ValidationError::NonFiniteValue { index } => write!(f, "y contains NaN or infinite value at index {index}"),
            ValidationError::DuplicateKey { key } => write!(f, "x value {key} is already present"),
            ValidationError::NotSorted { index } => write!(f, "x is not sorted in ascending order at index {index}"),
            ValidationError::NotAfterLastKey { key, last } => write!(f, "x value {key} is not larger than the last x value {last}"),
        }
    }
}

///
/// Raised by a query that falls outside `[min, max]` while the extrapolation mode is `Fail`.
///
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RangeError
{
    pub target: f64,
    pub min: f64,
    pub max: f64,
}
impl std::error::Error for RangeError {}

impl Display for RangeError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x value {} is out of range [{}, {}] and extrapolation mode is Fail", self.target, self.min, self.max)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DecodeError
{
    Malformed,
    TrailingBytes(usize),
    UnsupportedVersion(u16),
    TypeMismatch { expected: InterpolatorKind, found: InterpolatorKind },
    InvalidData(ValidationError),
    LZ4DecompressionFailed,
    ReadBufferFailed,
}
impl std::error::Error for DecodeError {}

impl Display for DecodeError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self
        {
            DecodeError::InvalidData(e) => write!(f, "InvalidData: {e}"),
            _ => write!(f, "{:?}", *self),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncodeError
{
    SerializationFailed,
    WriteBufferFailed,
}
impl std::error::Error for EncodeError {}

impl Display for EncodeError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", *self)
    }
}

/// Any error produced by this crate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InterpolatorError
{
    Validation(ValidationError),
    Range(RangeError),
    Decode(DecodeError),
    Encode(EncodeError),
}
impl std::error::Error for InterpolatorError {}

impl Display for InterpolatorError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self
        {
            InterpolatorError::Validation(e) => e.fmt(f),
            InterpolatorError::Range(e) => e.fmt(f),
            InterpolatorError::Decode(e) => e.fmt(f),
            InterpolatorError::Encode(e) => e.fmt(f),
        }
    }
}

impl From<ValidationError> for InterpolatorError
{
    fn from(value: ValidationError) -> Self {
        InterpolatorError::Validation(value)
    }
}

impl From<RangeError> for InterpolatorError
{
    fn from(value: RangeError) -> Self {
        InterpolatorError::Range(value)
    }
}

impl From<DecodeError> for InterpolatorError
{
    fn from(value: DecodeError) -> Self {
        InterpolatorError::Decode(value)
    }
}

impl From<EncodeError> for InterpolatorError
{
    fn from(value: EncodeError) -> Self {
        InterpolatorError::Encode(value)
    }
}

#[test]
fn check_error_messages()
{
    let e = ValidationError::NotAfterLastKey { key: 11.0, last: 12.0 };
    assert_eq!(e.to_string(), "x value 11 is not larger than the last x value 12");
    let e: InterpolatorError = RangeError { target: -11.0, min: -10.0, max: 12.0 }.into();
    assert!(e.to_string().contains("out of range"));
    assert_eq!(DecodeError::Malformed.to_string(), "Malformed");
}
