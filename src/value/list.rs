//! Ordered, optionally named sequences of values.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::Value;
use crate::error::{Error, Result};

pub(crate) type Names = Arc<[Option<String>]>;

/// An ordered sequence of [`Value`]s, each optionally named.
///
/// Lists are immutable snapshots backed by reference-counted slices, so
/// cloning a list is O(1) and never copies its elements.
///
/// # Names
///
/// Names form a parallel mapping from position to name. They need not be
/// unique: lookup by name returns the **first** child carrying that name.
/// A list in which no child is named has no name table at all, so two lists
/// with the same children compare equal whether they were built with
/// [`List::from_values`] or with all-`None` entries.
///
/// # Examples
///
/// ```rust
/// use listwise::{List, Value};
///
/// let list = List::from_named([("a", 1), ("b", 2), ("a", 3)]);
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.get_named("a"), Some(&Value::from(1)));
/// assert_eq!(list.name_at(2), Some("a"));
/// ```
#[derive(Clone, PartialEq)]
pub struct List {
    values: Arc<[Value]>,
    names: Option<Names>,
}

impl List {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            values: Arc::from(Vec::new()),
            names: None,
        }
    }

    /// Creates an unnamed list.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
            names: None,
        }
    }

    /// Creates a list in which every child is named.
    pub fn from_named<N, V>(entries: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .map(|(name, value)| (Some(name.into()), value.into())),
        )
    }

    /// Creates a list from `(name, value)` entries where names are optional.
    pub fn from_entries(entries: impl IntoIterator<Item = (Option<String>, Value)>) -> Self {
        let (names, values): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        Self::from_parts(values, Some(names.into()))
    }

    /// Returns a builder.
    pub fn builder() -> ListBuilder {
        ListBuilder::default()
    }

    pub(crate) fn from_parts(values: Vec<Value>, names: Option<Names>) -> Self {
        let names = names.filter(|names| names.iter().any(Option::is_some));
        debug_assert!(names.as_ref().is_none_or(|names| names.len() == values.len()));
        Self {
            values: values.into(),
            names,
        }
    }

    /// Returns a list with `values` and the name table of `self`.
    pub(crate) fn with_values(&self, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), self.len());
        Self {
            values: values.into(),
            names: self.names.clone(),
        }
    }

    pub(crate) fn shared_names(&self) -> Option<Names> {
        self.names.clone()
    }

    /// Returns the number of direct children.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the list has no children.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the children in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns an iterator over the children.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Returns an iterator over `(name, value)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (Option<&str>, &Value)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(position, value)| (self.name_at(position), value))
    }

    /// Returns the name table, or `None` if no child is named.
    pub fn names(&self) -> Option<&[Option<String>]> {
        self.names.as_deref()
    }

    /// Returns `true` if at least one child is named.
    pub const fn is_named(&self) -> bool {
        self.names.is_some()
    }

    /// Returns `true` if every child is named. An empty list is not named.
    pub fn is_fully_named(&self) -> bool {
        self.names
            .as_ref()
            .is_some_and(|names| names.iter().all(Option::is_some))
    }

    /// Returns the name of the child at `position`.
    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(position))
            .and_then(Option::as_deref)
    }

    /// Returns the child at `position`.
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Returns the child at a signed `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexError`] if `position` is negative or not less
    /// than the length.
    pub fn at(&self, position: i64) -> Result<&Value> {
        usize::try_from(position)
            .ok()
            .and_then(|position| self.values.get(position))
            .ok_or(Error::IndexError {
                index: position,
                length: self.len(),
            })
    }

    /// Returns the first child named `name`.
    ///
    /// Duplicate names resolve to the first match.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.position_of(name).map(|position| &self.values[position])
    }

    /// Returns the position of the first child named `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.names
            .as_ref()?
            .iter()
            .position(|candidate| candidate.as_deref() == Some(name))
    }

    /// Returns a copy with the given names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `names` and the list differ in length.
    pub fn with_names<N: Into<String>>(
        &self,
        names: impl IntoIterator<Item = Option<N>>,
    ) -> Result<Self> {
        let names: Vec<Option<String>> =
            names.into_iter().map(|name| name.map(Into::into)).collect();
        if names.len() != self.len() {
            return Err(Error::LengthMismatch {
                operation: "with_names",
                expected: self.len(),
                found: names.len(),
            });
        }
        Ok(Self::from_parts(self.values.to_vec(), Some(names.into())))
    }

    /// Returns a copy without names.
    #[must_use]
    pub fn without_names(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
            names: None,
        }
    }

    /// Returns the children in `range`, with their names.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds, like slice indexing.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let names = self
            .names
            .as_ref()
            .map(|names| Names::from(&names[range.clone()]));
        Self::from_parts(self.values[range].to_vec(), names)
    }

    /// Returns the children at `positions`, in the given order, with their names.
    pub(crate) fn select(&self, positions: &[usize]) -> Self {
        let values = positions
            .iter()
            .map(|&position| self.values[position].clone())
            .collect();
        let names = self.names.as_ref().map(|names| {
            positions
                .iter()
                .map(|&position| names[position].clone())
                .collect::<Names>()
        });
        Self::from_parts(values, names)
    }

    /// Returns the nesting depth: `1 + ` the deepest child, and 1 when empty.
    pub fn depth(&self) -> usize {
        1 + self.values.iter().map(Value::depth).max().unwrap_or(0)
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "List{self}")
    }
}

impl fmt::Display for List {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("[")?;
        for (position, (name, value)) in self.entries().enumerate() {
            if position > 0 {
                formatter.write_str(", ")?;
            }
            if let Some(name) = name {
                write!(formatter, "{name}: ")?;
            }
            write!(formatter, "{value}")?;
        }
        formatter.write_str("]")
    }
}

/// Incremental constructor for [`List`].
///
/// # Examples
///
/// ```rust
/// use listwise::{List, Value};
///
/// let list = List::builder().push(1).push_named("b", "two").build();
/// assert_eq!(list.to_string(), r#"[1, b: "two"]"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListBuilder {
    values: Vec<Value>,
    names: Vec<Option<String>>,
}

impl ListBuilder {
    /// Creates a builder with room for `capacity` children.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            names: Vec::with_capacity(capacity),
        }
    }

    /// Appends an unnamed child.
    #[must_use]
    pub fn push(mut self, value: impl Into<Value>) -> Self {
        self.push_entry(None, value.into());
        self
    }

    /// Appends a named child.
    #[must_use]
    pub fn push_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_entry(Some(name.into()), value.into());
        self
    }

    pub(crate) fn push_entry(&mut self, name: Option<String>, value: Value) {
        self.values.push(value);
        self.names.push(name);
    }

    /// Builds the list.
    pub fn build(self) -> List {
        List::from_parts(self.values, Some(self.names.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn numbers() -> List {
        List::from_values([Value::from(10), Value::from(20), Value::from(30)])
    }

    #[rstest]
    fn test_at_bounds() {
        let list = numbers();
        assert_eq!(list.at(0), Ok(&Value::from(10)));
        assert_eq!(list.at(2), Ok(&Value::from(30)));
        assert_eq!(
            list.at(3),
            Err(Error::IndexError {
                index: 3,
                length: 3
            })
        );
        assert_eq!(
            list.at(-1),
            Err(Error::IndexError {
                index: -1,
                length: 3
            })
        );
    }

    #[rstest]
    fn test_duplicate_names_resolve_to_first() {
        let list = List::from_named([("x", 1), ("y", 2), ("x", 3)]);
        assert_eq!(list.get_named("x"), Some(&Value::from(1)));
        assert_eq!(list.position_of("x"), Some(0));
        assert_eq!(list.get_named("z"), None);
    }

    #[rstest]
    fn test_all_none_names_are_dropped() {
        let list = List::from_entries([(None, Value::from(1)), (None, Value::from(2))]);
        assert!(!list.is_named());
        assert_eq!(list, List::from_values([Value::from(1), Value::from(2)]));
    }

    #[rstest]
    fn test_partial_names() {
        let list = List::builder().push(1).push_named("b", 2).build();
        assert!(list.is_named());
        assert!(!list.is_fully_named());
        assert_eq!(list.name_at(0), None);
        assert_eq!(list.name_at(1), Some("b"));
    }

    #[rstest]
    fn test_with_names_checks_length() {
        let list = numbers();
        assert!(list.with_names([Some("a")]).is_err());
        let named = list.with_names([Some("a"), None, Some("c")]).unwrap();
        assert_eq!(named.get_named("c"), Some(&Value::from(30)));
        assert_eq!(named.without_names(), list);
    }

    #[rstest]
    fn test_slice_keeps_names() {
        let list = List::from_named([("a", 1), ("b", 2), ("c", 3)]);
        let tail = list.slice(1..3);
        assert_eq!(tail, List::from_named([("b", 2), ("c", 3)]));
    }

    #[rstest]
    fn test_depth() {
        assert_eq!(List::new().depth(), 1);
        assert_eq!(numbers().depth(), 1);
        let nested = List::from_values([Value::from(numbers()), Value::from(1)]);
        assert_eq!(nested.depth(), 2);
    }

    #[rstest]
    fn test_display() {
        let list = List::builder()
            .push(1)
            .push_named("b", List::from_values([Value::from(2.5), Value::null()]))
            .build();
        assert_eq!(list.to_string(), "[1, b: [2.5, null]]");
    }
}
