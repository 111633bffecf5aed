//! The extraction protocol.
//!
//! An [`Extractor`] describes how to obtain one output from one element.
//! Functions, field names, paths of names and indices, and positional indices
//! are all "the same kind of thing":
//!
//! - [`Extractor::Function`]: call a [`Function`] with the element, then any extra fixed arguments
//! - [`Extractor::FieldPath`]: follow child lookups left to right
//! - [`Extractor::PositionalIndex`]: take the child at a position
//!
//! An extractor is resolved once per operation into an evaluator closure, so
//! the per-element loop never inspects which variant it holds.
//!
//! # Examples
//!
//! ```rust
//! use listwise::{Extractor, List, Value, map_any};
//!
//! let people = List::from_values([
//!     Value::from(List::from_named([("name", Value::from("ada")), ("age", Value::from(36))])),
//!     Value::from(List::from_named([("name", Value::from("alan")), ("age", Value::from(41))])),
//! ]);
//!
//! let names = map_any(&people, "name").unwrap();
//! assert_eq!(names, List::from_values([Value::from("ada"), Value::from("alan")]));
//!
//! let ages = map_any(&people, Extractor::index(1)).unwrap();
//! assert_eq!(ages, List::from_values([Value::from(36), Value::from(41)]));
//! ```

mod function;

use std::fmt;

use smallvec::SmallVec;

pub use function::{Args, Function, Param};

use crate::error::{Error, Result};
use crate::value::{List, Value};

/// A resolved extractor: one call per element.
pub(crate) type Evaluator<'a> = Box<dyn Fn(Args) -> Result<Value> + Send + Sync + 'a>;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Look up the first child with this name.
    Name(String),
    /// Take the child at this position.
    Index(i64),
}

impl fmt::Display for PathStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(formatter, "{name:?}"),
            Self::Index(index) => write!(formatter, "{index}"),
        }
    }
}

impl From<&str> for PathStep {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for PathStep {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for PathStep {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for PathStep {
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        Self::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

/// An ordered sequence of [`PathStep`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    steps: SmallVec<[PathStep; 4]>,
}

impl FieldPath {
    /// Creates a path.
    pub fn new<S: Into<PathStep>>(steps: impl IntoIterator<Item = S>) -> Self {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the steps.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` for the empty path, which selects the element itself.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Follows the path from `root`.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] when a step meets a scalar, naming the step and the path so far
    /// - [`Error::MissingField`] when no child carries a name
    /// - [`Error::IndexError`] when a position is out of range
    pub fn follow<'a>(&self, root: &'a Value) -> Result<&'a Value> {
        let mut current = root;
        for (position, step) in self.steps.iter().enumerate() {
            let Value::List(list) = current else {
                return Err(Error::TypeMismatch {
                    context: format!(
                        "step {step} after path {}",
                        render_steps(&self.steps[..position])
                    ),
                    expected: "list",
                    found: current.type_name(),
                });
            };
            current = match step {
                PathStep::Name(name) => list.get_named(name).ok_or_else(|| Error::MissingField {
                    name: name.clone(),
                    path: render_steps(&self.steps[..position]),
                })?,
                PathStep::Index(index) => list.at(*index)?,
            };
        }
        Ok(current)
    }
}

fn render_steps(steps: &[PathStep]) -> String {
    let rendered: Vec<String> = steps.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

impl fmt::Display for FieldPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&render_steps(&self.steps))
    }
}

impl<S: Into<PathStep>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// How to obtain one output from one element.
#[derive(Debug, Clone)]
pub enum Extractor {
    /// Call a function with the element arguments followed by `extra`.
    Function {
        /// The function.
        function: Function,
        /// Extra fixed arguments appended to every call.
        extra: Args,
    },
    /// Follow a path of names and indices from the element.
    FieldPath {
        /// The path.
        path: FieldPath,
        /// Returned instead of failing when the path does not resolve or resolves to null.
        default: Option<Value>,
    },
    /// Take the child at a position of the element.
    PositionalIndex {
        /// The position; negative positions are an [`Error::IndexError`].
        index: i64,
        /// Returned instead of failing when the position does not resolve.
        default: Option<Value>,
    },
}

impl Extractor {
    /// Wraps a function.
    pub fn function(function: Function) -> Self {
        Self::Function {
            function,
            extra: Args::new(),
        }
    }

    /// Looks up a single field by name.
    pub fn field(name: impl Into<String>) -> Self {
        Self::path(FieldPath::new([PathStep::Name(name.into())]))
    }

    /// Follows a path.
    pub fn path(path: impl Into<FieldPath>) -> Self {
        Self::FieldPath {
            path: path.into(),
            default: None,
        }
    }

    /// Takes the child at a position.
    pub const fn index(index: i64) -> Self {
        Self::PositionalIndex {
            index,
            default: None,
        }
    }

    /// Appends extra fixed arguments to every call of a function extractor.
    ///
    /// Path and index extractors take no arguments, so they are returned unchanged.
    #[must_use]
    pub fn with_args(self, args: Args) -> Self {
        match self {
            Self::Function {
                function,
                mut extra,
            } => {
                extra.extend_from(&args);
                Self::Function { function, extra }
            }
            other => other,
        }
    }

    /// Returns `default` instead of failing when a path or index does not resolve.
    ///
    /// Function extractors are returned unchanged.
    #[must_use]
    pub fn with_default(self, default: impl Into<Value>) -> Self {
        match self {
            Self::FieldPath { path, .. } => Self::FieldPath {
                path,
                default: Some(default.into()),
            },
            Self::PositionalIndex { index, .. } => Self::PositionalIndex {
                index,
                default: Some(default.into()),
            },
            function @ Self::Function { .. } => function,
        }
    }

    /// Applies the extractor to a single value.
    ///
    /// # Errors
    ///
    /// Returns the failure of the function or of the lookup.
    pub fn apply(&self, value: &Value) -> Result<Value> {
        self.evaluator()(Args::one(value.clone()))
    }

    /// Resolves the extractor into an evaluator.
    ///
    /// Path and index extractors read the first argument of n-ary calls.
    pub(crate) fn evaluator(&self) -> Evaluator<'_> {
        match self {
            Self::Function { function, extra } if extra.is_empty() => {
                Box::new(move |args| function.call(args))
            }
            Self::Function { function, extra } => Box::new(move |mut args| {
                args.extend_from(extra);
                function.call(args)
            }),
            Self::FieldPath { path, default } => Box::new(move |args| {
                let root = args.require(0)?;
                resolve(path.follow(root), default.as_ref())
            }),
            Self::PositionalIndex { index, default } => Box::new(move |args| {
                let root = args.require(0)?;
                let child = match root {
                    Value::List(list) => list.at(*index),
                    scalar => Err(Error::TypeMismatch {
                        context: format!("position {index}"),
                        expected: "list",
                        found: scalar.type_name(),
                    }),
                };
                resolve(child, default.as_ref())
            }),
        }
    }
}

fn resolve(found: Result<&Value>, default: Option<&Value>) -> Result<Value> {
    match (found, default) {
        (Ok(value), _) => Ok(value.clone()),
        (Err(_), Some(default)) => Ok(default.clone()),
        (Err(error), None) => Err(error),
    }
}

impl From<&Extractor> for Extractor {
    fn from(extractor: &Extractor) -> Self {
        extractor.clone()
    }
}

impl From<Function> for Extractor {
    fn from(function: Function) -> Self {
        Self::function(function)
    }
}

impl From<FieldPath> for Extractor {
    fn from(path: FieldPath) -> Self {
        Self::path(path)
    }
}

impl From<&str> for Extractor {
    fn from(name: &str) -> Self {
        Self::field(name)
    }
}

impl From<String> for Extractor {
    fn from(name: String) -> Self {
        Self::field(name)
    }
}

impl From<i64> for Extractor {
    fn from(index: i64) -> Self {
        Self::index(index)
    }
}

impl From<i32> for Extractor {
    fn from(index: i32) -> Self {
        Self::index(i64::from(index))
    }
}

impl From<usize> for Extractor {
    fn from(index: usize) -> Self {
        Self::index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl<S: Into<PathStep>, const N: usize> From<[S; N]> for Extractor {
    fn from(steps: [S; N]) -> Self {
        Self::path(FieldPath::new(steps))
    }
}

impl<S: Into<PathStep>, const N: usize> From<[S; N]> for FieldPath {
    fn from(steps: [S; N]) -> Self {
        Self::new(steps)
    }
}

/// Returns the children of `value` when it is a list.
pub(crate) fn expect_list<'a>(
    value: &'a Value,
    context: impl FnOnce() -> String,
) -> Result<&'a List> {
    value.as_list().ok_or_else(|| Error::TypeMismatch {
        context: context(),
        expected: "list",
        found: value.type_name(),
    })
}
