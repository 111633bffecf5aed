//! The hierarchical value model.
//!
//! Every operation in this crate consumes and produces [`Value`]s:
//!
//! - [`Scalar`]: boolean, integer, float, text, or null
//! - [`List`]: an ordered sequence of child values, each optionally named
//! - [`Vector`]: a homogeneous, optionally named vector of one [`ScalarType`],
//!   the output of the typed operations
//!
//! Values are immutable. Operations never mutate their inputs; they build
//! fresh outputs that share unchanged lists with the inputs.
//!
//! # Examples
//!
//! ```rust
//! use listwise::{List, Value};
//!
//! let record = Value::from(List::from_named([
//!     ("name", Value::from("ada")),
//!     ("scores", Value::from(List::from_values([Value::from(1), Value::from(2)]))),
//! ]));
//!
//! assert_eq!(record.depth(), 2);
//! assert_eq!(record.child_count(), 2);
//! assert_eq!(record.to_string(), r#"[name: "ada", scores: [1, 2]]"#);
//! ```

mod list;
mod scalar;
#[cfg(feature = "serde")]
mod serialization;
mod vector;

use std::fmt;

pub use list::{List, ListBuilder};
pub(crate) use list::Names;
pub use scalar::{Scalar, ScalarKind, ScalarType};
pub use vector::Vector;

#[cfg(feature = "fxhash")]
pub(crate) type NameMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(not(feature = "fxhash"))]
pub(crate) type NameMap<K, V> = std::collections::HashMap<K, V>;

/// A node of the hierarchy: a scalar or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A leaf.
    Scalar(Scalar),
    /// A nested container.
    List(List),
}

impl Value {
    /// Returns the null value.
    pub const fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Returns `true` if this is null.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// Returns `true` if this is a scalar (including null).
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns `true` if this is a list.
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns the type name used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(scalar) => scalar.type_name(),
            Self::List(_) => "list",
        }
    }

    /// Returns the list, if this is one.
    pub const fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(list) => Some(list),
            Self::Scalar(_) => None,
        }
    }

    /// Returns the scalar, if this is one.
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            Self::List(_) => None,
        }
    }

    /// Returns the boolean, if this is a `Bool` scalar.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(flag)) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int` scalar.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(number)) => Some(*number),
            _ => None,
        }
    }

    /// Returns a float for `Float` and `Int` scalars.
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Float(number)) => Some(*number),
            Self::Scalar(Scalar::Int(number)) => Some(*number as f64),
            _ => None,
        }
    }

    /// Returns the text, if this is a `Text` scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns the number of direct children. Scalars have none.
    pub fn child_count(&self) -> usize {
        match self {
            Self::Scalar(_) => 0,
            Self::List(list) => list.len(),
        }
    }

    /// Returns the nesting depth: 0 for scalars, `1 + ` the deepest child for lists.
    pub fn depth(&self) -> usize {
        match self {
            Self::Scalar(_) => 0,
            Self::List(list) => list.depth(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(formatter, "{scalar}"),
            Self::List(list) => write!(formatter, "{list}"),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Self::List(list)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Scalar(Scalar::Bool(flag))
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Scalar(Scalar::Int(number))
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Scalar(Scalar::Int(i64::from(number)))
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Scalar(Scalar::Float(number))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Scalar(Scalar::Text(text.to_string()))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Scalar(Scalar::Text(text))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}

static_assertions::assert_impl_all!(Value: Send, Sync, Clone);
static_assertions::assert_impl_all!(List: Send, Sync, Clone);
