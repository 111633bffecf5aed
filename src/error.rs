//! Error types shared by every operation.
//!
//! All failures are reported as values of [`Error`]. Batch operations are
//! fail-fast: the first element that fails aborts the batch, and the failure
//! is wrapped in [`Error::Element`] so the caller can see which index failed
//! and why. [`Error::kind`] and [`Error::root`] look through that wrapper.
//!
//! # Examples
//!
//! ```rust
//! use listwise::{Error, ErrorKind, List, Value, Function, map_any};
//!
//! let list = List::from_values([Value::from(1), Value::from("two")]);
//! let double = Function::unary(|value| match value.as_int() {
//!     Some(number) => Ok(Value::from(number * 2)),
//!     None => Err(Error::failed("not a number")),
//! });
//!
//! let error = map_any(&list, double).unwrap_err();
//! assert_eq!(error.index(), Some(1));
//! assert_eq!(error.kind(), ErrorKind::Failed);
//! ```

use std::fmt;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fieldless discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Parallel inputs have unequal lengths.
    LengthMismatch,
    /// Positional lookup out of range.
    IndexError,
    /// A path step or predicate result has the wrong shape or type.
    TypeMismatch,
    /// A typed element does not convert to the declared output type.
    TypeStability,
    /// `map_table` rows disagree on shape.
    TableShape,
    /// Arguments could not be bound to a function signature.
    ArgumentBinding,
    /// A name lookup found no child.
    MissingField,
    /// An identifier is not present in a function registry.
    UnknownFunction,
    /// A user function reported a domain failure.
    Failed,
    /// A wrapped function panicked.
    Panicked,
}

impl ErrorKind {
    /// Returns the public name of this kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use listwise::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::TypeStability.name(), "TypeStabilityError");
    /// ```
    pub const fn name(self) -> &'static str {
        match self {
            Self::LengthMismatch => "LengthMismatch",
            Self::IndexError => "IndexError",
            Self::TypeMismatch => "TypeMismatch",
            Self::TypeStability => "TypeStabilityError",
            Self::TableShape => "TableShapeError",
            Self::ArgumentBinding => "ArgumentBindingError",
            Self::MissingField => "MissingField",
            Self::UnknownFunction => "UnknownFunction",
            Self::Failed => "Failed",
            Self::Panicked => "Panicked",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Why an element could not be represented in a typed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instability {
    /// The element was not a single value (a list of another length, or null).
    Arity {
        /// Number of values the element held.
        length: usize,
    },
    /// The element had a type that never converts to the target.
    Type {
        /// Type name of the element.
        found: &'static str,
    },
    /// The element has the right kind but converting it would lose information.
    Lossy {
        /// Rendering of the element.
        found: String,
    },
}

impl fmt::Display for Instability {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity { length } => write!(formatter, "result has length {length}, not 1"),
            Self::Type { found } => write!(formatter, "found {found}"),
            Self::Lossy { found } => write!(formatter, "{found} cannot be converted without loss"),
        }
    }
}

/// Errors produced by listwise operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Inputs that must be traversed together have different lengths.
    #[error("{operation}: expected {expected} elements, found {found}")]
    LengthMismatch {
        /// Operation that compared the lengths.
        operation: &'static str,
        /// Length required.
        expected: usize,
        /// Length supplied.
        found: usize,
    },
    /// A position is negative or past the end of a list.
    #[error("index {index} is out of range for a list of length {length}")]
    IndexError {
        /// Requested position.
        index: i64,
        /// Length of the list that was indexed.
        length: usize,
    },
    /// A value had the wrong shape or type for the step applied to it.
    #[error("type mismatch ({context}): expected {expected}, found {found}")]
    TypeMismatch {
        /// Where the mismatch happened.
        context: String,
        /// Expected type or shape.
        expected: &'static str,
        /// Type or shape encountered.
        found: &'static str,
    },
    /// A typed map or flatten produced an element of the wrong type or arity.
    #[error("result {index} must be a single {expected}: {reason}")]
    TypeStability {
        /// Position of the offending element.
        index: usize,
        /// Declared output type.
        expected: &'static str,
        /// Why the conversion failed.
        reason: Instability,
    },
    /// A `map_table` row cannot be bound under the fill policy.
    #[error("row {row} cannot be bound into the table: {reason}")]
    TableShape {
        /// Position of the offending row.
        row: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// Arguments could not be bound to a function's parameters.
    #[error("cannot bind arguments for `{function}`: {reason}")]
    ArgumentBinding {
        /// Name of the function, or `<anonymous>`.
        function: String,
        /// What failed to bind.
        reason: String,
    },
    /// A name lookup found nothing.
    #[error("field `{name}` not found after path {path}")]
    MissingField {
        /// Name that was looked up.
        name: String,
        /// Path walked before the lookup.
        path: String,
    },
    /// A function identifier is not registered.
    #[error("unknown function `{name}`")]
    UnknownFunction {
        /// The identifier.
        name: String,
    },
    /// A user function reported a failure.
    #[error("{message}")]
    Failed {
        /// Failure description.
        message: String,
    },
    /// A wrapped function panicked.
    #[error("function panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
    /// An element-level failure inside a batch operation.
    #[error("in index {index}: {source}")]
    Element {
        /// Position of the failing element.
        index: usize,
        /// The failure itself.
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a [`Error::Failed`] from a message.
    ///
    /// This is the way user functions report domain failures.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub(crate) fn binding(function: &str, reason: impl Into<String>) -> Self {
        Self::ArgumentBinding {
            function: function.to_string(),
            reason: reason.into(),
        }
    }

    /// Wraps this error as the failure of element `index`.
    #[must_use]
    pub fn at_index(self, index: usize) -> Self {
        Self::Element {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through [`Error::Element`] wrappers.
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Element { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns the kind of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            Self::IndexError { .. } => ErrorKind::IndexError,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::TypeStability { .. } => ErrorKind::TypeStability,
            Self::TableShape { .. } => ErrorKind::TableShape,
            Self::ArgumentBinding { .. } => ErrorKind::ArgumentBinding,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            Self::Failed { .. } => ErrorKind::Failed,
            Self::Panicked { .. } => ErrorKind::Panicked,
            Self::Element { .. } => unreachable!("root never returns an element wrapper"),
        }
    }

    /// Returns the index of the element that failed, if the batch reported one.
    ///
    /// This is the outermost index: for nested batches it is the position in
    /// the list the caller passed in.
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Element { index, .. } | Self::TypeStability { index, .. } => Some(*index),
            Self::TableShape { row, .. } => Some(*row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_failed_display() {
        assert_eq!(Error::failed("boom").to_string(), "boom");
    }

    #[rstest]
    fn test_element_wraps_source() {
        let error = Error::failed("boom").at_index(3);
        assert_eq!(error.to_string(), "in index 3: boom");
        assert_eq!(error.index(), Some(3));
        assert_eq!(error.kind(), ErrorKind::Failed);
    }

    #[rstest]
    fn test_root_looks_through_nested_elements() {
        let error = Error::IndexError {
            index: 5,
            length: 2,
        }
        .at_index(1)
        .at_index(0);
        assert_eq!(error.index(), Some(0));
        assert_eq!(
            error.root(),
            &Error::IndexError {
                index: 5,
                length: 2
            }
        );
        assert_eq!(error.kind(), ErrorKind::IndexError);
    }

    #[rstest]
    #[case(
        Instability::Arity { length: 3 },
        "result 2 must be a single int: result has length 3, not 1"
    )]
    #[case(Instability::Type { found: "text" }, "result 2 must be a single int: found text")]
    #[case(
        Instability::Lossy { found: "2.5".to_string() },
        "result 2 must be a single int: 2.5 cannot be converted without loss"
    )]
    fn test_type_stability_display(#[case] reason: Instability, #[case] expected: &str) {
        let error = Error::TypeStability {
            index: 2,
            expected: "int",
            reason,
        };
        assert_eq!(error.to_string(), expected);
        assert_eq!(error.index(), Some(2));
    }

    #[rstest]
    fn test_kind_names() {
        assert_eq!(ErrorKind::LengthMismatch.to_string(), "LengthMismatch");
        assert_eq!(ErrorKind::TableShape.to_string(), "TableShapeError");
        assert_eq!(ErrorKind::ArgumentBinding.to_string(), "ArgumentBindingError");
    }

    #[rstest]
    fn test_length_mismatch_display() {
        let error = Error::LengthMismatch {
            operation: "map2",
            expected: 3,
            found: 2,
        };
        assert_eq!(error.to_string(), "map2: expected 3 elements, found 2");
        assert_eq!(error.index(), None);
    }
}
