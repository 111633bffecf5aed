//! The mapping engine: type-stable traversal of one list.
//!
//! Every operation here visits elements strictly in ascending index order,
//! calls the resolved extractor once per element, and is fail-fast: the first
//! failing element aborts the operation with [`Error::Element`] carrying its
//! index.
//!
//! - [`map_any`]: collect whatever each call returns into a [`List`]
//! - [`map_bool`], [`map_int`], [`map_float`], [`map_text`], [`map_typed`]:
//!   collect into a [`Vector`] whose element type is fixed by the call
//! - [`map_table`]: bind named-list results as the rows of a [`Table`]
//! - [`for_each`]: call for the side effect and return the input unchanged
//! - [`imap`], [`map_if`], [`map_at`]: index-aware and selective maps
//! - [`reduce`], [`reduce_with`], [`accumulate`]: left folds
//!
//! Outputs always have the length, order and names of the input.
//!
//! # Examples
//!
//! ```rust
//! use listwise::{Function, List, Value, map_int};
//!
//! let nested = List::from_values([
//!     Value::from(List::from_values([Value::from(1), Value::from(2)])),
//!     Value::from(List::from_values([Value::from(3)])),
//!     Value::from(List::from_values([Value::from(4), Value::from(5), Value::from(6)])),
//! ]);
//! let length = Function::unary(|value| Ok(Value::from(value.child_count() as i64)));
//!
//! assert_eq!(map_int(&nested, length).unwrap(), vec![2, 1, 3]);
//! ```

#[cfg(feature = "rayon")]
mod par;
mod table;

#[cfg(feature = "rayon")]
pub use par::{ParallelOptions, par_map_any, par_map_typed};
pub use table::{FillPolicy, Table, TableOptions, map_table, map_table_with};

use crate::error::{Error, Result};
use crate::extractor::{Args, Evaluator, Extractor};
use crate::predicate;
use crate::value::{List, Scalar, ScalarType, Value, Vector};

/// Calls `evaluate` for element `index`, tagging a failure with the index.
pub(crate) fn call_at(evaluate: &Evaluator<'_>, index: usize, args: Args) -> Result<Value> {
    evaluate(args).map_err(|error| {
        tracing::debug!(index, %error, "element evaluation failed");
        error.at_index(index)
    })
}

/// Converts the result for element `index` into `T`.
pub(crate) fn convert_at<T: ScalarType>(index: usize, value: &Value) -> Result<T> {
    T::try_from_value(value).map_err(|reason| {
        tracing::debug!(index, expected = T::KIND.name(), %reason, "typed result rejected");
        Error::TypeStability {
            index,
            expected: T::KIND.name(),
            reason,
        }
    })
}

/// Applies `extractor` to every element, collecting the results into a list.
///
/// No constraint is placed on what each call returns.
///
/// # Errors
///
/// Returns the first element failure, wrapped with its index.
pub fn map_any(list: &List, extractor: impl Into<Extractor>) -> Result<List> {
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let values = list
        .iter()
        .enumerate()
        .map(|(index, element)| call_at(&evaluate, index, Args::one(element.clone())))
        .collect::<Result<Vec<_>>>()?;
    Ok(list.with_values(values))
}

/// Applies `extractor` to every element, requiring each result to be a single `T`.
///
/// # Errors
///
/// - [`Error::TypeStability`] for the first result that is not exactly one
///   scalar convertible to `T` without loss
/// - the first element failure, wrapped with its index
pub fn map_typed<T: ScalarType>(list: &List, extractor: impl Into<Extractor>) -> Result<Vector<T>> {
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let values = list
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let value = call_at(&evaluate, index, Args::one(element.clone()))?;
            convert_at::<T>(index, &value)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Vector::with_names(values, list.shared_names()))
}

macro_rules! typed_map_variants {
    ($($suffix:ident => $target:ty),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("[`map_typed`] with `", stringify!($target), "` output.")]
                ///
                /// # Errors
                ///
                /// See [`map_typed`].
                pub fn [<map_ $suffix>](
                    list: &List,
                    extractor: impl Into<Extractor>,
                ) -> Result<Vector<$target>> {
                    map_typed::<$target>(list, extractor)
                }
            )*
        }
    };
}

typed_map_variants!(bool => bool, int => i64, float => f64, text => String);

/// Calls `extractor` once per element, in order, and returns `list` unchanged.
///
/// # Errors
///
/// Returns the first element failure, wrapped with its index.
pub fn for_each(list: &List, extractor: impl Into<Extractor>) -> Result<List> {
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    for (index, element) in list.iter().enumerate() {
        call_at(&evaluate, index, Args::one(element.clone()))?;
    }
    Ok(list.clone())
}

/// Like [`map_any`], but each call also receives the element's key.
///
/// The key is the element's name as text when the list is named (null for
/// unnamed elements of a partially named list), otherwise its 0-based
/// position as an integer.
///
/// # Errors
///
/// Returns the first element failure, wrapped with its index.
pub fn imap(list: &List, extractor: impl Into<Extractor>) -> Result<List> {
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let named = list.is_named();
    let values = list
        .entries()
        .enumerate()
        .map(|(index, (name, element))| {
            let key = if named {
                Value::from(name)
            } else {
                Value::from(i64::try_from(index).unwrap_or(i64::MAX))
            };
            call_at(&evaluate, index, Args::positional([element.clone(), key]))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(list.with_values(values))
}

/// Maps only the elements for which `predicate` holds; others pass through.
///
/// # Errors
///
/// - [`Error::TypeMismatch`] if the predicate does not return a boolean
/// - the first element failure, wrapped with its index
pub fn map_if(
    list: &List,
    predicate: impl Into<Extractor>,
    extractor: impl Into<Extractor>,
) -> Result<List> {
    let condition = predicate.into();
    let test = condition.evaluator();
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let values = list
        .iter()
        .enumerate()
        .map(|(index, element)| {
            if predicate::holds(&test, index, element)? {
                call_at(&evaluate, index, Args::one(element.clone()))
            } else {
                Ok(element.clone())
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(list.with_values(values))
}

/// Which elements [`map_at`] touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Elements at these positions.
    Indices(Vec<usize>),
    /// Elements carrying these names. Unknown names select nothing.
    Names(Vec<String>),
}

impl From<Vec<usize>> for Selector {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl<const N: usize> From<[usize; N]> for Selector {
    fn from(indices: [usize; N]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(names: [&str; N]) -> Self {
        Self::Names(names.iter().map(ToString::to_string).collect())
    }
}

/// Maps only the selected elements; others pass through.
///
/// # Errors
///
/// - [`Error::IndexError`] if a selected position is out of range
/// - the first element failure, wrapped with its index
pub fn map_at(
    list: &List,
    selector: impl Into<Selector>,
    extractor: impl Into<Extractor>,
) -> Result<List> {
    let mut selected = vec![false; list.len()];
    match selector.into() {
        Selector::Indices(indices) => {
            for index in indices {
                let slot = selected.get_mut(index).ok_or(Error::IndexError {
                    index: i64::try_from(index).unwrap_or(i64::MAX),
                    length: list.len(),
                })?;
                *slot = true;
            }
        }
        Selector::Names(names) => {
            for (slot, (name, _)) in selected.iter_mut().zip(list.entries()) {
                *slot = name.is_some_and(|name| names.iter().any(|wanted| wanted == name));
            }
        }
    }

    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let values = list
        .iter()
        .zip(selected)
        .enumerate()
        .map(|(index, (element, selected))| {
            if selected {
                call_at(&evaluate, index, Args::one(element.clone()))
            } else {
                Ok(element.clone())
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(list.with_values(values))
}

/// Folds `list` from the left with a binary extractor, starting from the first element.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if `list` is empty
/// - the first failing step, wrapped with the index of the element being folded in
pub fn reduce(list: &List, extractor: impl Into<Extractor>) -> Result<Value> {
    let Some((first, rest)) = list.values().split_first() else {
        return Err(Error::LengthMismatch {
            operation: "reduce",
            expected: 1,
            found: 0,
        });
    };
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    rest.iter()
        .enumerate()
        .try_fold(first.clone(), |accumulator, (offset, element)| {
            call_at(
                &evaluate,
                offset + 1,
                Args::positional([accumulator, element.clone()]),
            )
        })
}

/// Folds `list` from the left with a binary extractor, starting from `initial`.
///
/// # Errors
///
/// Returns the first failing step, wrapped with the index of the element being folded in.
pub fn reduce_with(
    list: &List,
    initial: impl Into<Value>,
    extractor: impl Into<Extractor>,
) -> Result<Value> {
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    list.iter()
        .enumerate()
        .try_fold(initial.into(), |accumulator, (index, element)| {
            call_at(&evaluate, index, Args::positional([accumulator, element.clone()]))
        })
}

/// Like [`reduce`], but keeps every intermediate result.
///
/// The output has the length and names of `list`; its first element is the
/// first element of `list`. An empty list accumulates to an empty list.
///
/// # Errors
///
/// Returns the first failing step, wrapped with the index of the element being folded in.
pub fn accumulate(list: &List, extractor: impl Into<Extractor>) -> Result<List> {
    let Some((first, rest)) = list.values().split_first() else {
        return Ok(list.clone());
    };
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let mut values = Vec::with_capacity(list.len());
    values.push(first.clone());
    for (offset, element) in rest.iter().enumerate() {
        let previous = values[offset].clone();
        values.push(call_at(
            &evaluate,
            offset + 1,
            Args::positional([previous, element.clone()]),
        )?);
    }
    Ok(list.with_values(values))
}

/// Drops null elements and empty lists, keeping names of the survivors.
pub fn compact(list: &List) -> List {
    let positions: Vec<usize> = list
        .iter()
        .enumerate()
        .filter(|(_, element)| match element {
            Value::Scalar(Scalar::Null) => false,
            Value::List(inner) => !inner.is_empty(),
            Value::Scalar(_) => true,
        })
        .map(|(position, _)| position)
        .collect();
    list.select(&positions)
}

/// Applies `extractor` to a single value.
///
/// # Errors
///
/// Returns the failure of the function or lookup.
pub fn pluck(value: &Value, extractor: impl Into<Extractor>) -> Result<Value> {
    extractor.into().apply(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Instability};
    use crate::extractor::Function;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ints(values: &[i64]) -> List {
        values.iter().copied().map(Value::from).collect()
    }

    fn double() -> Function {
        Function::unary(|value| {
            value
                .as_int()
                .map(|number| Value::from(number * 2))
                .ok_or_else(|| Error::failed("not an int"))
        })
    }

    #[rstest]
    fn test_map_any_preserves_names() {
        let list = List::from_named([("a", 1), ("b", 2)]);
        let result = map_any(&list, double()).unwrap();
        assert_eq!(result, List::from_named([("a", 2), ("b", 4)]));
    }

    #[rstest]
    fn test_map_any_reports_failing_index() {
        let list = List::from_values([Value::from(1), Value::from("x"), Value::from("y")]);
        let error = map_any(&list, double()).unwrap_err();
        assert_eq!(error, Error::failed("not an int").at_index(1));
    }

    #[rstest]
    fn test_map_any_stops_at_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let failing = Function::unary(move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            if value.as_int() == Some(2) {
                Err(Error::failed("two"))
            } else {
                Ok(value.clone())
            }
        });
        assert!(map_any(&ints(&[1, 2, 3, 4]), failing).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    fn test_map_int_rejects_wrong_arity() {
        let pair = Function::unary(|value| {
            Ok(Value::from(List::from_values([value.clone(), value.clone()])))
        });
        let error = map_int(&ints(&[1, 2]), pair).unwrap_err();
        assert_eq!(
            error,
            Error::TypeStability {
                index: 0,
                expected: "int",
                reason: Instability::Arity { length: 2 },
            }
        );
    }

    #[rstest]
    fn test_map_float_widens_integers() {
        let result = map_float(&ints(&[1, 2]), double()).unwrap();
        assert_eq!(result, vec![2.0, 4.0]);
    }

    #[rstest]
    fn test_map_text_does_not_coerce_numbers() {
        let error = map_text(&ints(&[1]), double()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TypeStability);
        assert_eq!(error.index(), Some(0));
    }

    #[rstest]
    fn test_map_bool_with_field() {
        let list = List::from_values([
            Value::from(List::from_named([("ok", true)])),
            Value::from(List::from_named([("ok", false)])),
        ]);
        assert_eq!(map_bool(&list, "ok").unwrap(), vec![true, false]);
    }

    #[rstest]
    fn test_for_each_returns_input_and_visits_in_order() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let record = Function::unary(move |value| {
            sink.lock().push(value.clone());
            Ok(Value::null())
        });
        let list = List::from_named([("a", 3), ("b", 1)]);
        let returned = for_each(&list, record).unwrap();
        assert_eq!(returned, list);
        assert_eq!(*seen.lock(), vec![Value::from(3), Value::from(1)]);
    }

    #[rstest]
    fn test_imap_passes_names_or_positions() {
        let key = Function::binary(|_, key| Ok(key.clone()));
        let named = List::from_named([("a", 1), ("b", 2)]);
        assert_eq!(
            imap(&named, key.clone()).unwrap(),
            List::from_named([("a", "a"), ("b", "b")])
        );
        assert_eq!(imap(&ints(&[5, 6]), key).unwrap(), ints(&[0, 1]));
    }

    #[rstest]
    fn test_map_if() {
        let is_even =
            Function::unary(|value| Ok(Value::from(value.as_int().is_some_and(|n| n % 2 == 0))));
        let result = map_if(&ints(&[1, 2, 3, 4]), is_even, double()).unwrap();
        assert_eq!(result, ints(&[1, 4, 3, 8]));
    }

    #[rstest]
    fn test_map_at_indices_and_names() {
        assert_eq!(
            map_at(&ints(&[1, 2, 3]), [0_usize, 2], double()).unwrap(),
            ints(&[2, 2, 6])
        );
        let named = List::from_named([("a", 1), ("b", 2)]);
        assert_eq!(
            map_at(&named, ["b", "zzz"], double()).unwrap(),
            List::from_named([("a", 1), ("b", 4)])
        );
        assert_eq!(
            map_at(&named, [5_usize], double()).unwrap_err(),
            Error::IndexError { index: 5, length: 2 }
        );
    }

    #[rstest]
    fn test_reduce_and_accumulate() {
        let add = Function::binary(|left, right| {
            Ok(Value::from(left.as_int().unwrap_or(0) + right.as_int().unwrap_or(0)))
        });
        assert_eq!(reduce(&ints(&[1, 2, 3]), add.clone()), Ok(Value::from(6)));
        assert_eq!(reduce_with(&ints(&[1, 2, 3]), 10, add.clone()), Ok(Value::from(16)));
        assert_eq!(accumulate(&ints(&[1, 2, 3]), add.clone()), Ok(ints(&[1, 3, 6])));
        assert_eq!(
            reduce(&List::new(), add.clone()).unwrap_err().kind(),
            ErrorKind::LengthMismatch
        );
        assert_eq!(accumulate(&List::new(), add), Ok(List::new()));
    }

    #[rstest]
    fn test_compact() {
        let list = List::builder()
            .push(1)
            .push_named("gone", Value::null())
            .push(List::new())
            .push_named("kept", 2)
            .build();
        assert_eq!(
            compact(&list),
            List::builder().push(1).push_named("kept", 2).build()
        );
    }

    #[rstest]
    fn test_pluck() {
        let record = Value::from(List::from_named([("a", List::from_named([("b", 1)]))]));
        assert_eq!(pluck(&record, ["a", "b"]), Ok(Value::from(1)));
    }
}
