//! Adverbs: function-to-function transformers that change how failures and
//! side-channel output are reported, without changing what is computed.
//!
//! - [`make_safe`] turns every failure, panics included, into data: the
//!   wrapped call returns an [`Outcome`] holding either a result or an error.
//! - [`make_fallback`] returns a default value instead of failing.
//! - [`make_quiet`] captures the `tracing` events emitted during the call into
//!   a [`Diagnostics`] record next to the result.
//!
//! Adverbs compose with the mapping engine: a safe-wrapped function never
//! aborts a batch, so the caller gets one outcome per element and can split
//! successes from failures afterwards.
//!
//! # Examples
//!
//! ```rust
//! use listwise::{Error, Function, List, Value, make_safe, map_any, transpose};
//!
//! let log = Function::unary(|value| {
//!     value
//!         .as_float()
//!         .map(|number| Value::from(number.ln()))
//!         .ok_or_else(|| Error::failed("not a number"))
//! });
//! let inputs = List::from_values([Value::from(1), Value::from("a")]);
//!
//! let outcomes = map_any(&inputs, make_safe(log)).unwrap();
//! let split = transpose(&outcomes).unwrap();
//!
//! let results = split.get_named("result").and_then(Value::as_list).unwrap();
//! assert_eq!(results.values(), &[Value::from(0.0), Value::null()]);
//! ```

mod quiet;
mod safe;

pub use quiet::{Diagnostics, QuietFunction, QuietOptions, make_quiet};
pub use safe::{Outcome, SafeFunction, make_safe};

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::{Error, Result};
use crate::extractor::{Args, Function};
use crate::value::Value;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Calls `function`, turning a panic into [`Error::Panicked`].
pub(crate) fn call_guarded(function: &Function, args: Args) -> Result<Value> {
    catch_unwind(AssertUnwindSafe(|| function.call(args))).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::debug!(%message, "wrapped function panicked");
        Err(Error::Panicked { message })
    })
}

/// Wraps `function` so that it returns `default` whenever it fails or panics.
///
/// # Examples
///
/// ```rust
/// use listwise::{Args, Error, Function, Value, make_fallback};
///
/// let parse = Function::unary(|value| {
///     value
///         .as_text()
///         .and_then(|text| text.parse::<i64>().ok())
///         .map(Value::from)
///         .ok_or_else(|| Error::failed("not an integer"))
/// });
/// let lenient = make_fallback(parse, -1);
///
/// assert_eq!(lenient.call(Args::one(Value::from("42"))), Ok(Value::from(42)));
/// assert_eq!(lenient.call(Args::one(Value::from("x"))), Ok(Value::from(-1)));
/// ```
pub fn make_fallback(function: Function, default: impl Into<Value>) -> Function {
    let default = default.into();
    Function::new(move |args| Ok(call_guarded(&function, args).unwrap_or_else(|_| default.clone())))
}
