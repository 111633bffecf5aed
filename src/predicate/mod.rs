//! Predicate combinators: filtering, searching and logical reduction.
//!
//! A predicate is any [`Extractor`] whose result is a boolean scalar. Any
//! other result, null included, is an [`Error::TypeMismatch`] for that
//! element; there is no truthiness.
//!
//! Scans run left to right (or right to left for the `Backward` and
//! `tail_while` forms) and stop as soon as the answer is known, so the
//! predicate is never called on elements past the deciding one.
//!
//! # Examples
//!
//! ```rust
//! use listwise::{Function, List, Value, discard, every, keep, some};
//!
//! let is_even = Function::unary(|value| {
//!     Ok(Value::from(value.as_int().is_some_and(|number| number % 2 == 0)))
//! });
//! let numbers: List = (1..=4_i64).map(Value::from).collect();
//!
//! let evens = List::from_values([Value::from(2), Value::from(4)]);
//! let odds = List::from_values([Value::from(1), Value::from(3)]);
//! assert_eq!(keep(&numbers, is_even.clone()).unwrap(), evens);
//! assert_eq!(discard(&numbers, is_even.clone()).unwrap(), odds);
//! assert!(!every(&numbers, is_even.clone()).unwrap());
//! assert!(some(&numbers, is_even).unwrap());
//! ```

use crate::error::{Error, Result};
use crate::extractor::{Args, Evaluator, Extractor};
use crate::mapping::call_at;
use crate::value::{List, Scalar, Value};

/// Evaluates a predicate for element `index`.
pub(crate) fn holds(test: &Evaluator<'_>, index: usize, element: &Value) -> Result<bool> {
    match call_at(test, index, Args::one(element.clone()))? {
        Value::Scalar(Scalar::Bool(flag)) => Ok(flag),
        other => Err(Error::TypeMismatch {
            context: format!("predicate result at index {index}"),
            expected: "bool",
            found: other.type_name(),
        }
        .at_index(index)),
    }
}

/// Scan direction for [`detect_with`] and [`detect_index_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// From the first element to the last.
    #[default]
    Forward,
    /// From the last element to the first.
    Backward,
}

fn filter(list: &List, predicate: impl Into<Extractor>, wanted: bool) -> Result<List> {
    let extractor = predicate.into();
    let test = extractor.evaluator();
    let mut positions = Vec::new();
    for (index, element) in list.iter().enumerate() {
        if holds(&test, index, element)? == wanted {
            positions.push(index);
        }
    }
    Ok(list.select(&positions))
}

/// Keeps the elements for which `predicate` holds, preserving order and names.
///
/// # Errors
///
/// Returns the first predicate failure, wrapped with its index.
pub fn keep(list: &List, predicate: impl Into<Extractor>) -> Result<List> {
    filter(list, predicate, true)
}

/// Drops the elements for which `predicate` holds, preserving order and names.
///
/// # Errors
///
/// Returns the first predicate failure, wrapped with its index.
pub fn discard(list: &List, predicate: impl Into<Extractor>) -> Result<List> {
    filter(list, predicate, false)
}

/// Returns `true` if `predicate` holds for every element; `true` when empty.
///
/// Stops at the first element for which it does not hold.
///
/// # Errors
///
/// Returns the first predicate failure, wrapped with its index.
pub fn every(list: &List, predicate: impl Into<Extractor>) -> Result<bool> {
    Ok(find(list, &predicate.into(), Direction::Forward, false)?.is_none())
}

/// Returns `true` if `predicate` holds for some element; `false` when empty.
///
/// Stops at the first element for which it holds.
///
/// # Errors
///
/// Returns the first predicate failure, wrapped with its index.
pub fn some(list: &List, predicate: impl Into<Extractor>) -> Result<bool> {
    Ok(detect_index(list, predicate)?.is_some())
}

/// Returns `true` if `predicate` holds for no element; `true` when empty.
///
/// # Errors
///
/// Returns the first predicate failure, wrapped with its index.
pub fn none(list: &List, predicate: impl Into<Extractor>) -> Result<bool> {
    some(list, predicate).map(|found| !found)
}

/// Position of the first element, scanning in `direction`, whose predicate result is `wanted`.
fn find(
    list: &List,
    predicate: &Extractor,
    direction: Direction,
    wanted: bool,
) -> Result<Option<usize>> {
    let test = predicate.evaluator();
    let visit = |index: usize| -> Result<Option<usize>> {
        let found = holds(&test, index, &list.values()[index])? == wanted;
        Ok(found.then_some(index))
    };
    match direction {
        Direction::Forward => {
            for index in 0..list.len() {
                if let Some(found) = visit(index)? {
                    return Ok(Some(found));
                }
            }
        }
        Direction::Backward => {
            for index in (0..list.len()).rev() {
                if let Some(found) = visit(index)? {
                    return Ok(Some(found));
                }
            }
        }
    }
    Ok(None)
}

/// Returns the first element for which `predicate` holds, or `None`.
///
/// # Errors
///
/// Returns the first predicate failure, wrapped with its index.
pub fn detect(list: &List, predicate: impl Into<Extractor>) -> Result<Option<Value>> {
    detect_with(list, predicate, Direction::Forward)
}

/// Returns the position of the first element for which `predicate` holds, or `None`.
///
/// # Errors
///
/// Returns the first predicate failure, wrapped with its index.
pub fn detect_index(list: &List, predicate: impl Into<Extractor>) -> Result<Option<usize>> {
    detect_index_with(list, predicate, Direction::Forward)
}

/// [`detect`] scanning in `direction`.
///
/// # Errors
///
/// Returns the first predicate failure met while scanning, wrapped with its index.
pub fn detect_with(
    list: &List,
    predicate: impl Into<Extractor>,
    direction: Direction,
) -> Result<Option<Value>> {
    let position = detect_index_with(list, predicate, direction)?;
    Ok(position.map(|position| list.values()[position].clone()))
}

/// [`detect_index`] scanning in `direction`.
///
/// # Errors
///
/// Returns the first predicate failure met while scanning, wrapped with its index.
pub fn detect_index_with(
    list: &List,
    predicate: impl Into<Extractor>,
    direction: Direction,
) -> Result<Option<usize>> {
    find(list, &predicate.into(), direction, true)
}

/// The longest prefix of `list` on which `predicate` holds.
///
/// # Errors
///
/// Returns the first predicate failure, wrapped with its index.
pub fn head_while(list: &List, predicate: impl Into<Extractor>) -> Result<List> {
    let end = find(list, &predicate.into(), Direction::Forward, false)?.unwrap_or(list.len());
    Ok(list.slice(0..end))
}

/// The longest suffix of `list` on which `predicate` holds.
///
/// # Errors
///
/// Returns the first predicate failure met from the end, wrapped with its index.
pub fn tail_while(list: &List, predicate: impl Into<Extractor>) -> Result<List> {
    let start = find(list, &predicate.into(), Direction::Backward, false)?
        .map_or(0, |index| index + 1);
    Ok(list.slice(start..list.len()))
}

/// Returns `true` if some element is structurally equal to `value`.
pub fn has_element(list: &List, value: &Value) -> bool {
    list.iter().any(|element| element == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::extractor::Function;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ints(values: &[i64]) -> List {
        values.iter().copied().map(Value::from).collect()
    }

    fn is_even() -> Function {
        Function::unary(|value| Ok(Value::from(value.as_int().is_some_and(|n| n % 2 == 0))))
    }

    fn counting_is_even(calls: &Arc<AtomicUsize>) -> Function {
        let counter = Arc::clone(calls);
        Function::unary(move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::from(value.as_int().is_some_and(|n| n % 2 == 0)))
        })
    }

    #[rstest]
    fn test_keep_and_discard_preserve_names() {
        let list = List::from_named([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        assert_eq!(keep(&list, is_even()).unwrap(), List::from_named([("b", 2), ("d", 4)]));
        assert_eq!(discard(&list, is_even()).unwrap(), List::from_named([("a", 1), ("c", 3)]));
    }

    #[rstest]
    #[case(&[], true, false)]
    #[case(&[2, 4], true, true)]
    #[case(&[1, 2], false, true)]
    #[case(&[1, 3], false, false)]
    fn test_every_some_none(#[case] values: &[i64], #[case] all: bool, #[case] any: bool) {
        let list = ints(values);
        assert_eq!(every(&list, is_even()), Ok(all));
        assert_eq!(some(&list, is_even()), Ok(any));
        assert_eq!(none(&list, is_even()), Ok(!any));
    }

    #[rstest]
    fn test_every_stops_at_first_false() {
        let calls = Arc::new(AtomicUsize::new(0));
        assert_eq!(every(&ints(&[2, 3, 4, 6]), counting_is_even(&calls)), Ok(false));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    fn test_some_stops_at_first_true() {
        let calls = Arc::new(AtomicUsize::new(0));
        assert_eq!(some(&ints(&[1, 2, 3, 4]), counting_is_even(&calls)), Ok(true));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    fn test_detect() {
        let list = ints(&[1, 3, 4, 5, 6]);
        assert_eq!(detect(&list, is_even()), Ok(Some(Value::from(4))));
        assert_eq!(detect_index(&list, is_even()), Ok(Some(2)));
        assert_eq!(detect_with(&list, is_even(), Direction::Backward), Ok(Some(Value::from(6))));
        assert_eq!(detect_index_with(&list, is_even(), Direction::Backward), Ok(Some(4)));
        assert_eq!(detect_index(&ints(&[1, 3]), is_even()), Ok(None));
        assert_eq!(detect(&List::new(), is_even()), Ok(None));
    }

    #[rstest]
    fn test_head_and_tail_while() {
        let list = ints(&[2, 4, 5, 6, 8]);
        assert_eq!(head_while(&list, is_even()), Ok(ints(&[2, 4])));
        assert_eq!(tail_while(&list, is_even()), Ok(ints(&[6, 8])));
        assert_eq!(head_while(&ints(&[2, 4]), is_even()), Ok(ints(&[2, 4])));
        assert_eq!(tail_while(&ints(&[1]), is_even()), Ok(List::new()));
    }

    #[rstest]
    fn test_non_boolean_result_is_type_mismatch() {
        let identity = Function::unary(|value| Ok(value.clone()));
        let error = keep(&ints(&[1]), identity).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TypeMismatch);
        assert_eq!(error.index(), Some(0));
    }

    #[rstest]
    fn test_null_is_not_false() {
        let list = List::from_values([Value::from(List::from_named([("flag", Value::null())]))]);
        assert_eq!(every(&list, "flag").unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[rstest]
    fn test_has_element() {
        let list =
            List::from_values([Value::from(1), Value::from(List::from_values([Value::from("x")]))]);
        assert!(has_element(&list, &Value::from(List::from_values([Value::from("x")]))));
        assert!(!has_element(&list, &Value::from(1.0)));
    }
}
