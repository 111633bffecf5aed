//! Removing one level of nesting.

use crate::error::Result;
use crate::mapping::convert_at;
use crate::value::{List, ListBuilder, ScalarType, Value, Vector};

/// Splices the children of every list child into the parent, in order.
///
/// Scalar children are kept as they are, under their own names. The children
/// of a flattened list come out positional: neither the flattened list's name
/// nor the names inside it survive, so unrelated names cannot collide. A list
/// without list children is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use listwise::{List, Value, flatten_once};
///
/// let nested = List::from_values([
///     Value::from(List::from_values([Value::from(1), Value::from(2)])),
///     Value::from(List::from_values([Value::from(3), Value::from(4)])),
/// ]);
/// let flat: List = (1..=4_i64).map(Value::from).collect();
///
/// assert_eq!(flatten_once(&nested), flat);
/// assert_eq!(flatten_once(&flat), flat);
/// ```
pub fn flatten_once(list: &List) -> List {
    if !list.iter().any(Value::is_list) {
        return list.clone();
    }
    let capacity = list.iter().map(|child| child.child_count().max(1)).sum();
    let mut builder = ListBuilder::with_capacity(capacity);
    for (name, child) in list.entries() {
        match child {
            Value::List(inner) => {
                for grandchild in inner {
                    builder.push_entry(None, grandchild.clone());
                }
            }
            Value::Scalar(_) => builder.push_entry(name.map(str::to_string), child.clone()),
        }
    }
    builder.build()
}

/// [`flatten_once`], requiring every resulting element to be a `T`.
///
/// # Errors
///
/// Returns [`Error::TypeStability`](crate::Error::TypeStability) naming the
/// first flattened position that is not a scalar convertible to `T`.
pub fn flatten_typed<T: ScalarType>(list: &List) -> Result<Vector<T>> {
    let flat = flatten_once(list);
    let values = flat
        .iter()
        .enumerate()
        .map(|(index, value)| convert_at::<T>(index, value))
        .collect::<Result<Vec<_>>>()?;
    Ok(Vector::with_names(values, flat.shared_names()))
}

macro_rules! typed_flatten_variants {
    ($($suffix:ident => $target:ty),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("[`flatten_typed`] with `", stringify!($target), "` elements.")]
                ///
                /// # Errors
                ///
                /// See [`flatten_typed`].
                pub fn [<flatten_ $suffix>](list: &List) -> Result<Vector<$target>> {
                    flatten_typed::<$target>(list)
                }
            )*
        }
    };
}

typed_flatten_variants!(bool => bool, int => i64, float => f64, text => String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Instability};
    use rstest::rstest;

    fn ints(values: &[i64]) -> Value {
        Value::from(values.iter().copied().map(Value::from).collect::<List>())
    }

    #[rstest]
    fn test_flatten_mixed_children() {
        let list = List::builder()
            .push_named("a", ints(&[1, 2]))
            .push_named("b", 3)
            .push(List::new())
            .push(ints(&[4]))
            .build();
        assert_eq!(
            flatten_once(&list),
            List::builder().push(1).push(2).push_named("b", 3).push(4).build()
        );
    }

    #[rstest]
    fn test_flatten_drops_inner_names() {
        let list = List::from_values([Value::from(List::from_named([("x", 1), ("y", 2)]))]);
        let flat = flatten_once(&list);
        assert!(!flat.is_named());
        assert_eq!(flat.values(), &[Value::from(1), Value::from(2)]);
    }

    #[rstest]
    fn test_flatten_reduces_depth_by_one() {
        let list = List::from_values([
            Value::from(List::from_values([ints(&[1]), Value::from(2)])),
            ints(&[3]),
        ]);
        assert_eq!(list.depth(), 3);
        assert_eq!(flatten_once(&list).depth(), 2);
    }

    #[rstest]
    fn test_flatten_typed() {
        let list = List::from_values([ints(&[1, 2]), Value::from(3)]);
        assert_eq!(flatten_int(&list).unwrap(), vec![1, 2, 3]);
        assert_eq!(flatten_float(&list).unwrap(), vec![1.0, 2.0, 3.0]);

        let mixed =
            List::from_values([ints(&[1]), Value::from(List::from_values([Value::from("x")]))]);
        assert_eq!(
            flatten_int(&mixed).unwrap_err(),
            Error::TypeStability {
                index: 1,
                expected: "int",
                reason: Instability::Type { found: "text" },
            }
        );
    }

    #[rstest]
    fn test_flatten_typed_rejects_remaining_lists() {
        let deep = List::from_values([Value::from(List::from_values([ints(&[1, 2])]))]);
        let error = flatten_bool(&deep).unwrap_err();
        assert_eq!(error.index(), Some(0));
    }
}
