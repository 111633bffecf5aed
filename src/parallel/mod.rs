//! Synchronized traversal of several lists, and dynamic invocation.
//!
//! "Parallel" here means lock-step: element `i` of every input goes into the
//! `i`-th call. Calls still run one at a time, in ascending index order, and
//! the first failure aborts the operation with its index.
//!
//! # Examples
//!
//! ```rust
//! use listwise::{Function, List, Value, map2, pmap};
//!
//! let add = Function::binary(|x, y| {
//!     Ok(Value::from(x.as_int().unwrap_or(0) + y.as_int().unwrap_or(0)))
//! });
//! let xs: List = [1_i64, 2, 3].into_iter().map(Value::from).collect();
//! let ys: List = [10_i64, 20, 30].into_iter().map(Value::from).collect();
//!
//! let sums = map2(&xs, &ys, add.clone()).unwrap();
//! let expected: List = [11_i64, 22, 33].into_iter().map(Value::from).collect();
//! assert_eq!(sums, expected);
//!
//! let inputs = List::from_values([Value::from(xs), Value::from(ys)]);
//! assert_eq!(pmap(&inputs, add).unwrap(), sums);
//! ```

mod invoke;

pub use invoke::{Callee, FunctionRegistry, invoke_map};

use crate::error::{Error, Result};
use crate::extractor::{Args, Extractor, expect_list};
use crate::mapping::{call_at, convert_at};
use crate::value::{List, ScalarType, Value, Vector};

fn check_lengths(operation: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            operation,
            expected,
            found,
        })
    }
}

fn keep_value(_: usize, value: Value) -> Result<Value> {
    Ok(value)
}

fn convert<T: ScalarType>(index: usize, value: Value) -> Result<T> {
    convert_at::<T>(index, &value)
}

/// Evaluates `extractor` on `(x[i], y[i])` for every index in order,
/// passing each result through `finish` before moving on.
fn map2_values<R>(
    operation: &'static str,
    x: &List,
    y: &List,
    extractor: Extractor,
    finish: fn(usize, Value) -> Result<R>,
) -> Result<Vec<R>> {
    check_lengths(operation, x.len(), y.len())?;
    let evaluate = extractor.evaluator();
    x.iter()
        .zip(y.iter())
        .enumerate()
        .map(|(index, (left, right))| {
            let value = call_at(&evaluate, index, Args::positional([left.clone(), right.clone()]))?;
            finish(index, value)
        })
        .collect()
}

/// Applies a binary extractor to the elements of `x` and `y` pairwise.
///
/// The result carries the names of `x`.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if `x` and `y` differ in length
/// - the first element failure, wrapped with its index
pub fn map2(x: &List, y: &List, extractor: impl Into<Extractor>) -> Result<List> {
    let values = map2_values("map2", x, y, extractor.into(), keep_value)?;
    Ok(x.with_values(values))
}

/// [`map2`] with every result converted to `T`.
///
/// # Errors
///
/// As [`map2`], plus [`Error::TypeStability`] for the first result not
/// convertible to `T`.
pub fn map2_typed<T: ScalarType>(
    x: &List,
    y: &List,
    extractor: impl Into<Extractor>,
) -> Result<Vector<T>> {
    let values = map2_values("map2", x, y, extractor.into(), convert::<T>)?;
    Ok(Vector::with_names(values, x.shared_names()))
}

/// Calls `extractor` once per index of `x` and `y`, for its side effect.
///
/// Returns `x` unchanged.
///
/// # Errors
///
/// As [`map2`].
pub fn walk2(x: &List, y: &List, extractor: impl Into<Extractor>) -> Result<List> {
    map2_values("walk2", x, y, extractor.into(), |_, _| Ok(()))?;
    Ok(x.clone())
}

/// The input lists of a `pmap` call, checked for shape.
struct Inputs<'a> {
    lists: Vec<(Option<&'a str>, &'a List)>,
    length: usize,
}

impl<'a> Inputs<'a> {
    fn new(operation: &'static str, inputs: &'a List) -> Result<Self> {
        let lists = inputs
            .entries()
            .enumerate()
            .map(|(position, (name, value))| {
                expect_list(value, || format!("{operation} input {position}"))
                    .map(|list| (name, list))
            })
            .collect::<Result<Vec<_>>>()?;
        let length = lists.first().map_or(0, |(_, list)| list.len());
        for (_, list) in &lists {
            check_lengths(operation, length, list.len())?;
        }
        Ok(Self { lists, length })
    }

    /// Arguments for index `index`: named after their input when it is named.
    fn args_at(&self, index: usize) -> Args {
        let mut args = Args::new();
        for (name, list) in &self.lists {
            let value = list.values()[index].clone();
            match name {
                Some(name) => args.push_named(*name, value),
                None => args.push(value),
            }
        }
        args
    }

    fn evaluate<R>(
        &self,
        extractor: Extractor,
        finish: fn(usize, Value) -> Result<R>,
    ) -> Result<Vec<R>> {
        let evaluate = extractor.evaluator();
        (0..self.length)
            .map(|index| finish(index, call_at(&evaluate, index, self.args_at(index))?))
            .collect()
    }

    fn first(&self) -> List {
        self.lists
            .first()
            .map_or_else(List::new, |(_, list)| (*list).clone())
    }
}

/// Applies an N-ary extractor across N lists in lock-step.
///
/// `inputs` is a list whose children are the input lists. When an input is
/// named, its element is passed as an argument of that name, so a function
/// with declared parameters binds inputs by name before position. The result
/// carries the names of the first input.
///
/// # Examples
///
/// ```rust
/// use listwise::{Function, List, Param, Value, pmap};
///
/// let params = [Param::required("numerator"), Param::required("denominator")];
/// let ratio = Function::with_params(params, |args| {
///     let numerator = args.named("numerator").and_then(Value::as_float).unwrap_or(0.0);
///     let denominator = args.named("denominator").and_then(Value::as_float).unwrap_or(1.0);
///     Ok(Value::from(numerator / denominator))
/// });
/// let inputs = List::from_named([
///     ("denominator", List::from_values([Value::from(2), Value::from(4)])),
///     ("numerator", List::from_values([Value::from(1), Value::from(1)])),
/// ]);
///
/// assert_eq!(
///     pmap(&inputs, ratio).unwrap(),
///     List::from_values([Value::from(0.5), Value::from(0.25)])
/// );
/// ```
///
/// # Errors
///
/// - [`Error::TypeMismatch`] if an input is not a list
/// - [`Error::LengthMismatch`] if the inputs differ in length
/// - [`Error::ArgumentBinding`] (wrapped with the index) if the function's
///   signature cannot bind the inputs
/// - the first element failure, wrapped with its index
pub fn pmap(inputs: &List, extractor: impl Into<Extractor>) -> Result<List> {
    let inputs = Inputs::new("pmap", inputs)?;
    let values = inputs.evaluate(extractor.into(), keep_value)?;
    Ok(inputs.first().with_values(values))
}

/// [`pmap`] with every result converted to `T`.
///
/// # Errors
///
/// As [`pmap`], plus [`Error::TypeStability`] for the first result not
/// convertible to `T`.
pub fn pmap_typed<T: ScalarType>(
    inputs: &List,
    extractor: impl Into<Extractor>,
) -> Result<Vector<T>> {
    let inputs = Inputs::new("pmap", inputs)?;
    let values = inputs.evaluate(extractor.into(), convert::<T>)?;
    Ok(Vector::with_names(values, inputs.first().shared_names()))
}

/// Calls `extractor` across the inputs in lock-step, for its side effect.
///
/// Returns the first input unchanged, or an empty list when there are no inputs.
///
/// # Errors
///
/// As [`pmap`].
pub fn pwalk(inputs: &List, extractor: impl Into<Extractor>) -> Result<List> {
    let inputs = Inputs::new("pwalk", inputs)?;
    inputs.evaluate(extractor.into(), |_, _| Ok(()))?;
    Ok(inputs.first())
}
