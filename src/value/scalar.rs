//! Scalars and lossless conversion into typed outputs.

use std::fmt;

use super::Value;
use crate::error::Instability;

/// A leaf of the value hierarchy.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    /// Absent value. Counts as length 0 for typed outputs.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 text.
    Text(String),
}

impl Scalar {
    /// Returns the type name used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    /// Returns `true` if this is [`Scalar::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Int(number) => write!(formatter, "{number}"),
            Self::Float(number) => write!(formatter, "{number:?}"),
            Self::Text(text) => write!(formatter, "{text:?}"),
        }
    }
}

/// The scalar types a typed operation can declare as its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `bool`
    Bool,
    /// `i64`
    Int,
    /// `f64`
    Float,
    /// `String`
    Text,
}

impl ScalarKind {
    /// Returns the name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// A Rust type that typed operations can produce.
///
/// Conversion is total and loud: [`ScalarType::try_from_value`] either
/// returns the exact value or explains why it cannot, it never narrows.
///
/// | target | accepted |
/// |---|---|
/// | `bool` | `Bool` |
/// | `i64` | `Int`, `Bool`, `Float` without fractional part inside the `i64` range |
/// | `f64` | `Float`, `Int` with magnitude at most 2^53, `Bool` |
/// | `String` | `Text` |
///
/// # Examples
///
/// ```rust
/// use listwise::{ScalarType, Value};
///
/// assert_eq!(i64::try_from_value(&Value::from(3.0)), Ok(3));
/// assert!(i64::try_from_value(&Value::from(3.5)).is_err());
/// assert!(String::try_from_value(&Value::from(1)).is_err());
/// ```
pub trait ScalarType: Sized + Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The declared kind.
    const KIND: ScalarKind;

    /// Converts a non-null scalar.
    ///
    /// # Errors
    ///
    /// Returns the reason when the scalar cannot be represented exactly.
    fn from_scalar(scalar: &Scalar) -> Result<Self, Instability>;

    /// Converts back into a [`Value`].
    fn into_value(self) -> Value;

    /// Converts a value that must be exactly one scalar.
    ///
    /// Null has length 0 and a list of length other than 1 has the wrong
    /// arity. A list of length 1 is a list, and is never unwrapped.
    ///
    /// # Errors
    ///
    /// Returns the reason when the value is not a single convertible scalar.
    fn try_from_value(value: &Value) -> Result<Self, Instability> {
        match value {
            Value::Scalar(Scalar::Null) => Err(Instability::Arity { length: 0 }),
            Value::Scalar(scalar) => Self::from_scalar(scalar),
            Value::List(list) if list.len() == 1 => Err(Instability::Type { found: "list" }),
            Value::List(list) => Err(Instability::Arity { length: list.len() }),
        }
    }
}

const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;
const F64_EXACT_INT: u64 = 1 << 53;

impl ScalarType for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_scalar(scalar: &Scalar) -> Result<Self, Instability> {
        match scalar {
            Scalar::Bool(flag) => Ok(*flag),
            other => Err(Instability::Type {
                found: other.type_name(),
            }),
        }
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl ScalarType for i64 {
    const KIND: ScalarKind = ScalarKind::Int;

    #[allow(clippy::cast_possible_truncation)]
    fn from_scalar(scalar: &Scalar) -> Result<Self, Instability> {
        match scalar {
            Scalar::Int(number) => Ok(*number),
            Scalar::Bool(flag) => Ok(Self::from(*flag)),
            Scalar::Float(number)
                if number.is_finite()
                    && number.fract() == 0.0
                    && *number >= I64_LOWER
                    && *number < I64_UPPER =>
            {
                Ok(*number as Self)
            }
            Scalar::Float(number) => Err(Instability::Lossy {
                found: format!("{number:?}"),
            }),
            other => Err(Instability::Type {
                found: other.type_name(),
            }),
        }
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl ScalarType for f64 {
    const KIND: ScalarKind = ScalarKind::Float;

    #[allow(clippy::cast_precision_loss)]
    fn from_scalar(scalar: &Scalar) -> Result<Self, Instability> {
        match scalar {
            Scalar::Float(number) => Ok(*number),
            Scalar::Int(number) if number.unsigned_abs() <= F64_EXACT_INT => Ok(*number as Self),
            Scalar::Int(number) => Err(Instability::Lossy {
                found: number.to_string(),
            }),
            Scalar::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
            other => Err(Instability::Type {
                found: other.type_name(),
            }),
        }
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl ScalarType for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn from_scalar(scalar: &Scalar) -> Result<Self, Instability> {
        match scalar {
            Scalar::Text(text) => Ok(text.clone()),
            other => Err(Instability::Type {
                found: other.type_name(),
            }),
        }
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}
