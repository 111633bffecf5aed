//! # listwise
//!
//! Typed functional combinators over hierarchical list data.
//!
//! ## Overview
//!
//! listwise replaces hand-written loops over nested data with composable,
//! type-stable operations. The container type of every result is fixed by
//! the operation called, never inferred from the data: [`map_int`] either
//! returns a [`Vector<i64>`] of the input's length or fails naming the
//! element that did not fit.
//!
//! - **Value model**: [`Value`] is a scalar or a [`List`], an ordered
//!   sequence of values that may carry names
//! - **Extractors**: a [`Function`], a field name, a path of names and
//!   indices, or a position, all usable wherever "what to do with each
//!   element" is asked for ([`Extractor`])
//! - **Mapping**: [`map_any`], [`map_bool`], [`map_int`], [`map_float`],
//!   [`map_text`], [`map_table`], [`for_each`] and friends
//! - **Lock-step traversal**: [`map2`], [`pmap`], [`invoke_map`], [`walk2`],
//!   [`pwalk`]
//! - **Predicates**: [`keep`], [`discard`], [`every`], [`some`], [`detect`],
//!   [`detect_index`], [`head_while`], [`tail_while`]
//! - **Adverbs**: [`make_safe`], [`make_fallback`], [`make_quiet`]
//! - **Hierarchy**: [`flatten_once`], [`flatten_typed`], [`transpose`]
//!
//! Batch operations are sequential and fail-fast: elements are visited in
//! ascending index order and the first failure aborts the operation with an
//! [`Error::Element`] carrying the failing index.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Value`] and [`List`]
//! - `rayon`: order-preserving parallel mapping (`par_map_any`, `par_map_typed`)
//! - `fxhash`: faster name indexes via `rustc-hash`
//! - `full`: all of the above
//!
//! ## Example
//!
//! ```rust
//! use listwise::prelude::*;
//!
//! let people = List::from_values([
//!     Value::from(List::from_named([("name", Value::from("ada")), ("age", Value::from(36))])),
//!     Value::from(List::from_named([("name", Value::from("alan")), ("age", Value::from(41))])),
//! ]);
//!
//! assert_eq!(map_text(&people, "name").unwrap(), vec!["ada".to_string(), "alan".to_string()]);
//! assert_eq!(map_int(&people, "age").unwrap(), vec![36, 41]);
//!
//! let over_forty = Function::unary(|person| {
//!     let age = Extractor::field("age").apply(person)?;
//!     Ok(Value::from(age.as_int().is_some_and(|age| age > 40)))
//! });
//! assert_eq!(detect_index(&people, over_forty).unwrap(), Some(1));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the value model, the extractor types and every operation.
///
/// # Usage
///
/// ```rust
/// use listwise::prelude::*;
/// ```
pub mod prelude {
    pub use crate::adverb::*;
    pub use crate::error::{Error, ErrorKind, Instability};
    pub use crate::extractor::*;
    pub use crate::hierarchy::*;
    pub use crate::mapping::*;
    pub use crate::parallel::*;
    pub use crate::predicate::*;
    pub use crate::value::*;
}

pub mod adverb;
pub mod error;
pub mod extractor;
pub mod hierarchy;
pub mod mapping;
pub mod parallel;
pub mod predicate;
pub mod value;

pub use adverb::{
    Diagnostics, Outcome, QuietFunction, QuietOptions, SafeFunction, make_fallback, make_quiet,
    make_safe,
};
pub use error::{Error, ErrorKind, Instability, Result};
pub use extractor::{Args, Extractor, FieldPath, Function, Param, PathStep};
pub use hierarchy::{
    flatten_bool, flatten_float, flatten_int, flatten_once, flatten_text, flatten_typed, transpose,
};
#[cfg(feature = "rayon")]
pub use mapping::{ParallelOptions, par_map_any, par_map_typed};
pub use mapping::{
    FillPolicy, Selector, Table, TableOptions, accumulate, compact, for_each, imap, map_any,
    map_at, map_bool, map_float, map_if, map_int, map_table, map_table_with, map_text, map_typed,
    pluck, reduce, reduce_with,
};
pub use parallel::{
    Callee, FunctionRegistry, invoke_map, map2, map2_typed, pmap, pmap_typed, pwalk, walk2,
};
pub use predicate::{
    Direction, detect, detect_index, detect_index_with, detect_with, discard, every, has_element,
    head_while, keep, none, some, tail_while,
};
pub use value::{List, ListBuilder, Scalar, ScalarKind, ScalarType, Value, Vector};
