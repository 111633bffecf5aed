//! Reshaping the hierarchy: flattening one level and transposing two.
//!
//! Both transforms leave their input untouched and build a fresh list.
//! [`transpose`] is its own inverse on well-formed input, which is what makes
//! it useful for turning a list of `{result, error}` outcome records into a
//! `{result: [...], error: [...]}` pair of columns.

mod flatten;
mod transpose;

pub use flatten::{
    flatten_bool, flatten_float, flatten_int, flatten_once, flatten_text, flatten_typed,
};
pub use transpose::transpose;
