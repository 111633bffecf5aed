//! The total-failure adverb.

use crate::error::{Error, Result};
use crate::extractor::{Args, Extractor, Function};
use crate::value::{List, Value};

use super::call_guarded;

/// The result of a safe-wrapped call: exactly one of a value or an error.
///
/// # Examples
///
/// ```rust
/// use listwise::{Error, Function, Value, make_safe};
///
/// let log = make_safe(Function::unary(|value| {
///     value
///         .as_float()
///         .map(|number| Value::from(number.ln()))
///         .ok_or_else(|| Error::failed("not a number"))
/// }));
///
/// let outcome = log.apply(&Value::from(10));
/// assert!((outcome.result().and_then(Value::as_float).unwrap() - 2.302585093).abs() < 1e-9);
/// assert!(outcome.error().is_none());
///
/// let outcome = log.apply(&Value::from("a"));
/// assert!(outcome.result().is_none());
/// assert_eq!(outcome.error(), Some(&Error::failed("not a number")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome(Result<Value>);

impl Outcome {
    /// Returns the value, if the call succeeded.
    pub fn result(&self) -> Option<&Value> {
        self.0.as_ref().ok()
    }

    /// Returns the error, if the call failed.
    pub fn error(&self) -> Option<&Error> {
        self.0.as_ref().err()
    }

    /// Returns `true` if the call succeeded.
    pub const fn is_ok(&self) -> bool {
        self.0.is_ok()
    }

    /// Converts the outcome back into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the captured error, if any.
    pub fn into_result(self) -> Result<Value> {
        self.0
    }

    /// Renders the outcome as a `{result, error}` record.
    ///
    /// The absent side is null; an error is rendered as `{kind, message}`.
    pub fn to_value(&self) -> Value {
        let (result, error) = match &self.0 {
            Ok(value) => (value.clone(), Value::null()),
            Err(error) => (
                Value::null(),
                Value::from(List::from_named([
                    ("kind", Value::from(error.kind().name())),
                    ("message", Value::from(error.to_string())),
                ])),
            ),
        };
        Value::from(List::from_named([("result", result), ("error", error)]))
    }
}

impl From<Result<Value>> for Outcome {
    fn from(result: Result<Value>) -> Self {
        Self(result)
    }
}

impl From<Outcome> for Value {
    fn from(outcome: Outcome) -> Self {
        outcome.to_value()
    }
}

/// A function whose calls never fail; see [`make_safe`].
#[derive(Debug, Clone)]
pub struct SafeFunction {
    function: Function,
}

impl SafeFunction {
    /// Calls the wrapped function, capturing any failure or panic.
    pub fn call(&self, args: Args) -> Outcome {
        Outcome(call_guarded(&self.function, args))
    }

    /// Calls the wrapped function with a single argument.
    pub fn apply(&self, value: &Value) -> Outcome {
        self.call(Args::one(value.clone()))
    }

    /// Converts into a plain [`Function`] that returns [`Outcome::to_value`]
    /// records and never fails.
    pub fn into_function(self) -> Function {
        let name = self.function.name().map(str::to_string);
        let wrapped = Function::new(move |args| Ok(self.call(args).to_value()));
        match name {
            Some(name) => wrapped.named(&name),
            None => wrapped,
        }
    }
}

impl From<SafeFunction> for Function {
    fn from(safe: SafeFunction) -> Self {
        safe.into_function()
    }
}

impl From<SafeFunction> for Extractor {
    fn from(safe: SafeFunction) -> Self {
        Self::function(safe.into_function())
    }
}

/// Wraps `function` so that every call returns an [`Outcome`] instead of failing.
///
/// Both reported failures and panics are captured; panics become
/// [`Error::Panicked`].
pub fn make_safe(function: Function) -> SafeFunction {
    SafeFunction { function }
}
