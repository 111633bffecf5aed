//! Swapping the outer and inner level of a two-level list.

use crate::error::{Error, Result};
use crate::extractor::expect_list;
use crate::value::{List, NameMap, Names, Value};

/// How the inner lists are addressed.
enum Keys<'a> {
    /// By position; every inner list carries `names`, which also names the output.
    Shared { length: usize, names: Option<Names> },
    /// By name, in the order of the first inner list.
    Named(Vec<&'a str>),
}

fn key_mismatch(row: usize) -> Error {
    Error::TypeMismatch {
        context: format!("transpose child {row}"),
        expected: "the keys of the first child",
        found: "a different key set",
    }
}

impl<'a> Keys<'a> {
    fn of_children(first: &'a List, inner: &[&List]) -> Result<Self> {
        let Some(row) = inner
            .iter()
            .position(|record| record.names() != first.names())
        else {
            return Ok(Self::Shared {
                length: first.len(),
                names: first.shared_names(),
            });
        };
        if !first.is_fully_named() {
            return Err(key_mismatch(row));
        }
        let keys: Vec<&str> = first.entries().filter_map(|(name, _)| name).collect();
        let mut seen: NameMap<&str, ()> = NameMap::default();
        if keys.iter().any(|key| seen.insert(*key, ()).is_some()) {
            return Err(Error::TypeMismatch {
                context: "transpose child 0".to_string(),
                expected: "unique keys",
                found: "a duplicated key",
            });
        }
        Ok(Self::Named(keys))
    }

    fn len(&self) -> usize {
        match self {
            Self::Shared { length, .. } => *length,
            Self::Named(keys) => keys.len(),
        }
    }

    /// Returns the children of `inner` in key order.
    fn align(&self, row: usize, inner: &List) -> Result<Vec<Value>> {
        match self {
            Self::Shared { length, .. } => {
                if inner.len() != *length {
                    return Err(Error::LengthMismatch {
                        operation: "transpose",
                        expected: *length,
                        found: inner.len(),
                    }
                    .at_index(row));
                }
                Ok(inner.values().to_vec())
            }
            Self::Named(keys) => {
                if inner.len() != keys.len() || !inner.is_fully_named() {
                    return Err(key_mismatch(row));
                }
                keys.iter()
                    .map(|key| {
                        inner
                            .get_named(key)
                            .cloned()
                            .ok_or_else(|| key_mismatch(row))
                    })
                    .collect()
            }
        }
    }
}

/// Turns a list of N records with the same M keys into M lists of N elements.
///
/// `output[k][i] == input[i][k]`. The outputs carry the names of the outer
/// list. When all inner lists have the same name table, partial or repeated
/// names included, they are transposed by position and the output takes that
/// table. Otherwise they are aligned by name, in the key order of the first
/// one, which must have unique keys that every other inner list matches.
///
/// Transposing twice gives back the input whenever all inner lists share the
/// same name table and there is at least one column.
///
/// # Examples
///
/// ```rust
/// use listwise::{List, Value, transpose};
///
/// let rows = List::from_values([
///     Value::from(List::from_named([("x", 1), ("y", 2)])),
///     Value::from(List::from_named([("x", 3), ("y", 4)])),
/// ]);
/// let columns = transpose(&rows).unwrap();
///
/// assert_eq!(
///     columns,
///     List::from_named([
///         ("x", List::from_values([Value::from(1), Value::from(3)])),
///         ("y", List::from_values([Value::from(2), Value::from(4)])),
///     ])
/// );
/// assert_eq!(transpose(&columns).unwrap(), rows);
/// ```
///
/// # Errors
///
/// - [`Error::TypeMismatch`] if a child is not a list, or its keys differ
///   from the first child's
/// - [`Error::LengthMismatch`] if unnamed inner lists differ in length
pub fn transpose(list: &List) -> Result<List> {
    let inner: Vec<&List> = list
        .iter()
        .enumerate()
        .map(|(row, child)| expect_list(child, || format!("transpose child {row}")))
        .collect::<Result<_>>()?;
    let Some(first) = inner.first() else {
        return Ok(List::new());
    };
    let keys = Keys::of_children(first, &inner)?;

    let mut columns: Vec<Vec<Value>> = (0..keys.len())
        .map(|_| Vec::with_capacity(inner.len()))
        .collect();
    for (row, record) in inner.iter().enumerate() {
        for (column, value) in columns.iter_mut().zip(keys.align(row, record)?) {
            column.push(value);
        }
    }

    let outer_names = list.shared_names();
    let columns = columns
        .into_iter()
        .map(|values| Value::from(List::from_parts(values, outer_names.clone())));
    Ok(match keys {
        Keys::Shared { names, .. } => List::from_parts(columns.collect(), names),
        Keys::Named(keys) => List::from_entries(
            keys.into_iter()
                .map(str::to_string)
                .map(Some)
                .zip(columns),
        ),
    })
}
