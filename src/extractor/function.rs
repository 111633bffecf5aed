//! Function values and their calling convention.
//!
//! Every callable in this crate is a [`Function`]: a shared closure from an
//! [`Args`] bundle to a `Result<Value>`. A function may declare a signature
//! with [`Function::with_params`]; arguments are then bound R-style:
//!
//! 1. named arguments bind to the parameter of the same name,
//! 2. positional arguments fill the remaining parameters in order,
//! 3. missing parameters take their default, or fail if they have none,
//! 4. leftover arguments fail unless the function is [variadic](Function::variadic).
//!
//! Binding failures are [`Error::ArgumentBinding`].

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::value::{List, Value};

const ANONYMOUS: &str = "<anonymous>";

type Body = dyn Fn(Args) -> Result<Value> + Send + Sync;

type Entry = (Option<String>, Value);

/// An ordered bundle of optionally named arguments.
///
/// Element arguments come first, then any extra fixed arguments.
///
/// # Examples
///
/// ```rust
/// use listwise::{Args, Value};
///
/// let args = Args::new().with(1).with_named("base", 10);
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get(0), Some(&Value::from(1)));
/// assert_eq!(args.named("base"), Some(&Value::from(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    entries: SmallVec<[Entry; 3]>,
}

impl Args {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bundle with a single positional argument.
    pub fn one(value: Value) -> Self {
        let mut args = Self::new();
        args.push(value);
        args
    }

    /// Creates a bundle of positional arguments.
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            entries: values.into_iter().map(|value| (None, value)).collect(),
        }
    }

    /// Appends a positional argument.
    pub fn push(&mut self, value: Value) {
        self.entries.push((None, value));
    }

    /// Appends a named argument.
    pub fn push_named(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((Some(name.into()), value));
    }

    pub(crate) fn push_entry(&mut self, name: Option<String>, value: Value) {
        self.entries.push((name, value));
    }

    /// Builder form of [`Args::push`].
    #[must_use]
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value.into());
        self
    }

    /// Builder form of [`Args::push_named`].
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_named(name, value.into());
        self
    }

    /// Appends clones of every argument in `other`.
    pub fn extend_from(&mut self, other: &Self) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the argument at `position`, named or not.
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.entries.get(position).map(|(_, value)| value)
    }

    /// Returns the first argument named `name`.
    pub fn named(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate.as_deref() == Some(name))
            .map(|(_, value)| value)
    }

    /// Returns the argument at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentBinding`] if there is no such argument.
    pub fn require(&self, position: usize) -> Result<&Value> {
        self.get(position).ok_or_else(|| {
            Error::binding(
                ANONYMOUS,
                format!("expected at least {} arguments, got {}", position + 1, self.len()),
            )
        })
    }

    /// Returns an iterator over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_deref(), value))
    }

    /// Converts the bundle into a list, keeping names.
    pub fn into_list(self) -> List {
        List::from_entries(self.entries)
    }
}

impl From<List> for Args {
    fn from(list: List) -> Self {
        Self {
            entries: list
                .entries()
                .map(|(name, value)| (name.map(str::to_string), value.clone()))
                .collect(),
        }
    }
}

impl IntoIterator for Args {
    type Item = (Option<String>, Value);
    type IntoIter = smallvec::IntoIter<[Entry; 3]>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    default: Option<Value>,
}

impl Param {
    /// A parameter that must be supplied.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter that falls back to `default`.
    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the parameter has no default.
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Self::required(name)
    }
}

#[derive(Debug)]
struct Signature {
    params: Vec<Param>,
    variadic: bool,
}

/// A shareable, thread-safe function value.
///
/// # Examples
///
/// ```rust
/// use listwise::{Args, Function, Param, Value};
///
/// let power = Function::with_params(
///     [Param::required("x"), Param::optional("exponent", 2)],
///     |args| {
///         let x = args.named("x").and_then(Value::as_int).unwrap_or(0);
///         let exponent = args.named("exponent").and_then(Value::as_int).unwrap_or(1);
///         Ok(Value::from(x.pow(u32::try_from(exponent).unwrap_or(0))))
///     },
/// );
///
/// assert_eq!(power.call(Args::one(Value::from(3))), Ok(Value::from(9)));
/// assert_eq!(
///     power.call(Args::new().with_named("exponent", 3).with(2)),
///     Ok(Value::from(8))
/// );
/// assert!(power.call(Args::new()).is_err());
/// ```
#[derive(Clone)]
pub struct Function {
    name: Option<Arc<str>>,
    signature: Option<Arc<Signature>>,
    body: Arc<Body>,
}

impl Function {
    /// Creates a function without a signature; it receives arguments as given.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(Args) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: None,
            signature: None,
            body: Arc::new(body),
        }
    }

    /// Creates a function of one argument (the first one supplied).
    pub fn unary<F>(body: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(move |args| body(args.require(0)?))
    }

    /// Creates a function of two arguments (the first two supplied).
    pub fn binary<F>(body: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(move |args| body(args.require(0)?, args.require(1)?))
    }

    /// Creates a function with a declared signature.
    ///
    /// The body receives the bound arguments, named after their parameters
    /// and in parameter order.
    pub fn with_params<P, F>(params: impl IntoIterator<Item = P>, body: F) -> Self
    where
        P: Into<Param>,
        F: Fn(Args) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: None,
            signature: Some(Arc::new(Signature {
                params: params.into_iter().map(Into::into).collect(),
                variadic: false,
            })),
            body: Arc::new(body),
        }
    }

    /// Lets the signature accept extra arguments, passed after the parameters.
    #[must_use]
    pub fn variadic(mut self) -> Self {
        if let Some(signature) = &self.signature {
            self.signature = Some(Arc::new(Signature {
                params: signature.params.clone(),
                variadic: true,
            }));
        }
        self
    }

    /// Sets the name used in error messages.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    /// Returns the function name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the declared parameters, if the function has a signature.
    pub fn params(&self) -> Option<&[Param]> {
        self.signature
            .as_ref()
            .map(|signature| signature.params.as_slice())
    }

    /// Binds `args` to the signature (if any) and runs the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentBinding`] if the arguments do not fit the
    /// signature, or whatever the body returns.
    pub fn call(&self, args: Args) -> Result<Value> {
        match &self.signature {
            Some(signature) => (self.body)(self.bind(signature, args)?),
            None => (self.body)(args),
        }
    }

    fn bind(&self, signature: &Signature, args: Args) -> Result<Args> {
        let function = self.name().unwrap_or(ANONYMOUS);
        let mut slots: Vec<Option<Value>> = vec![None; signature.params.len()];
        let mut rest = Args::new();
        let mut positional = Vec::new();

        for (name, value) in args {
            let Some(name) = name else {
                positional.push(value);
                continue;
            };
            match signature.params.iter().position(|param| param.name == name) {
                Some(slot) if slots[slot].is_some() => {
                    return Err(Error::binding(
                        function,
                        format!("parameter `{name}` matched by multiple arguments"),
                    ));
                }
                Some(slot) => slots[slot] = Some(value),
                None if signature.variadic => rest.push_entry(Some(name), value),
                None => {
                    return Err(Error::binding(function, format!("unused argument `{name}`")));
                }
            }
        }

        let mut positional = positional.into_iter();
        for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
            match positional.next() {
                Some(value) => *slot = Some(value),
                None => break,
            }
        }
        let leftover = positional.len();
        if leftover > 0 && !signature.variadic {
            return Err(Error::binding(
                function,
                format!("{leftover} unused positional arguments"),
            ));
        }
        positional.for_each(|value| rest.push(value));

        let mut bound = Args::new();
        for (param, slot) in signature.params.iter().zip(slots) {
            let value = slot.or_else(|| param.default.clone()).ok_or_else(|| {
                Error::binding(function, format!("missing required argument `{}`", param.name))
            })?;
            bound.push_named(param.name.clone(), value);
        }
        bound.extend_from(&rest);
        Ok(bound)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Function")
            .field("name", &self.name())
            .field("params", &self.params())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Function: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    fn subtract() -> Function {
        Function::with_params(["x", "y"], |args| {
            let x = args.require(0)?.as_int().unwrap_or_default();
            let y = args.require(1)?.as_int().unwrap_or_default();
            Ok(Value::from(x - y))
        })
        .named("subtract")
    }

    #[rstest]
    fn test_positional_binding() {
        let result = subtract().call(Args::positional([Value::from(5), Value::from(3)]));
        assert_eq!(result, Ok(Value::from(2)));
    }

    #[rstest]
    fn test_named_binding_takes_precedence_over_position() {
        let args = Args::new().with(5).with_named("x", 3);
        assert_eq!(subtract().call(args), Ok(Value::from(-2)));
    }

    #[rstest]
    #[case(Args::one(Value::from(1)), "missing required argument `y`")]
    #[case(Args::new().with(1).with(2).with(3), "1 unused positional arguments")]
    #[case(Args::new().with_named("z", 1), "unused argument `z`")]
    #[case(
        Args::new().with_named("x", 1).with_named("x", 2),
        "parameter `x` matched by multiple arguments"
    )]
    fn test_binding_failures(#[case] args: Args, #[case] reason: &str) {
        let error = subtract().call(args).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ArgumentBinding);
        assert_eq!(
            error,
            Error::ArgumentBinding {
                function: "subtract".to_string(),
                reason: reason.to_string(),
            }
        );
    }

    #[rstest]
    fn test_variadic_keeps_extra_arguments() {
        let count = Function::with_params(["x"], |args| {
            Ok(Value::from(i64::try_from(args.len()).unwrap_or_default()))
        })
        .variadic();
        let args = Args::new().with(1).with(2).with_named("extra", 3);
        assert_eq!(count.call(args), Ok(Value::from(3)));
    }

    #[rstest]
    fn test_defaults_fill_missing_parameters() {
        let params = [Param::required("a"), Param::optional("b", "dflt")];
        let echo = Function::with_params(params, |args| Ok(args.into_list().into()));
        let result = echo.call(Args::one(Value::from(1))).unwrap();
        assert_eq!(
            result,
            Value::from(List::from_named([("a", Value::from(1)), ("b", Value::from("dflt"))]))
        );
    }

    #[rstest]
    fn test_unary_without_arguments_fails() {
        let identity = Function::unary(|value| Ok(value.clone()));
        assert_eq!(identity.call(Args::new()).unwrap_err().kind(), ErrorKind::ArgumentBinding);
    }

    #[rstest]
    fn test_args_from_list_keeps_names() {
        let args = Args::from(List::builder().push(1).push_named("b", 2).build());
        assert_eq!(args.get(1), Some(&Value::from(2)));
        assert_eq!(args.named("b"), Some(&Value::from(2)));
        assert_eq!(args.iter().next(), Some((None, &Value::from(1))));
    }
}
