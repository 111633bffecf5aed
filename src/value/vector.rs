//! Homogeneous typed vectors.

use std::ops::Deref;

use super::{List, Names, ScalarType};

/// A homogeneous vector of one [`ScalarType`], optionally named.
///
/// This is the output container of the typed map and flatten variants: its
/// element type is fixed by the operation called, never by the data.
///
/// # Examples
///
/// ```rust
/// use listwise::{Function, List, Value, Vector, map_int};
///
/// let list = List::from_named([("a", "xy"), ("b", "z")]);
/// let length = Function::unary(|value| {
///     Ok(Value::from(value.as_text().map_or(0, str::len) as i64))
/// });
/// let lengths: Vector<i64> = map_int(&list, length).unwrap();
///
/// assert_eq!(lengths.values(), &[2, 1]);
/// assert_eq!(lengths.get_named("b"), Some(&1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    values: Vec<T>,
    names: Option<Names>,
}

impl<T> Vector<T> {
    /// Creates an unnamed vector.
    pub const fn new(values: Vec<T>) -> Self {
        Self {
            values,
            names: None,
        }
    }

    pub(crate) const fn with_names(values: Vec<T>, names: Option<Names>) -> Self {
        Self { values, names }
    }

    /// Returns the elements.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Consumes the vector, returning its elements.
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Returns the name table, if any element is named.
    pub fn names(&self) -> Option<&[Option<String>]> {
        self.names.as_deref()
    }

    /// Returns the name of the element at `position`.
    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(position))
            .and_then(Option::as_deref)
    }

    /// Returns the first element named `name`.
    pub fn get_named(&self, name: &str) -> Option<&T> {
        let position = self
            .names
            .as_ref()?
            .iter()
            .position(|candidate| candidate.as_deref() == Some(name))?;
        self.values.get(position)
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Vector<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.names.is_none() && &self.values == other
    }
}

impl<T: ScalarType> From<Vector<T>> for List {
    fn from(vector: Vector<T>) -> Self {
        let values = vector.values.into_iter().map(ScalarType::into_value).collect();
        Self::from_parts(values, vector.names)
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
