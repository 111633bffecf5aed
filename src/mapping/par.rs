//! Data-parallel variants of the mapping engine.
//!
//! Elements are evaluated on the rayon pool, so calls may run in any order
//! and concurrently. Results are always assembled in input order, and when
//! several elements fail the one with the lowest index is reported, exactly
//! as the sequential engine would. Unlike the sequential engine, elements
//! after a failure may still have been evaluated.
//!
//! Requires the `rayon` feature.

use rayon::prelude::*;

use crate::error::Result;
use crate::extractor::{Args, Extractor};
use crate::value::{List, ScalarType, Vector};

use super::{call_at, convert_at};

/// Options for the parallel mapping operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelOptions {
    min_len: usize,
}

impl ParallelOptions {
    /// Creates options that let rayon split down to single elements.
    pub const fn new() -> Self {
        Self { min_len: 1 }
    }

    /// Sets the smallest number of elements handed to one task.
    ///
    /// Raise it when each call is cheap. Zero is treated as one.
    #[must_use]
    pub const fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = if min_len == 0 { 1 } else { min_len };
        self
    }

    /// Returns the smallest number of elements handed to one task.
    pub const fn min_len(&self) -> usize {
        self.min_len
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parallel [`map_any`](super::map_any).
///
/// # Errors
///
/// Returns the failure of the lowest failing index, wrapped with that index.
pub fn par_map_any(
    list: &List,
    extractor: impl Into<Extractor>,
    options: &ParallelOptions,
) -> Result<List> {
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let results: Vec<Result<_>> = list
        .values()
        .par_iter()
        .with_min_len(options.min_len())
        .enumerate()
        .map(|(index, element)| call_at(&evaluate, index, Args::one(element.clone())))
        .collect();
    let values = results.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(list.with_values(values))
}

/// Parallel [`map_typed`](super::map_typed).
///
/// # Errors
///
/// Returns the failure of the lowest failing index: either the element
/// failure wrapped with its index, or [`Error::TypeStability`](crate::Error::TypeStability).
pub fn par_map_typed<T: ScalarType>(
    list: &List,
    extractor: impl Into<Extractor>,
    options: &ParallelOptions,
) -> Result<Vector<T>> {
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let results: Vec<Result<T>> = list
        .values()
        .par_iter()
        .with_min_len(options.min_len())
        .enumerate()
        .map(|(index, element)| {
            let value = call_at(&evaluate, index, Args::one(element.clone()))?;
            convert_at::<T>(index, &value)
        })
        .collect();
    let values = results.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(Vector::with_names(values, list.shared_names()))
}
