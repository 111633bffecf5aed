//! Dynamic invocation: calling a different function for every index.

use crate::error::{Error, Result};
use crate::extractor::{Args, Function};
use crate::value::{List, NameMap, Value};

/// A table of functions callable by identifier.
///
/// # Examples
///
/// ```rust
/// use listwise::{Args, Callee, Function, FunctionRegistry, List, Value, invoke_map};
///
/// let mut registry = FunctionRegistry::new();
/// let number = |value: &Value| value.as_int().unwrap_or(0);
/// registry.register("negate", Function::unary(move |value| Ok(Value::from(-number(value)))));
/// registry.register("double", Function::unary(move |value| Ok(Value::from(2 * number(value)))));
///
/// let callees = [Callee::from("negate"), Callee::from("double")];
/// let bundles = List::from_values([Value::from(3), Value::from(4)]);
/// let results = invoke_map(&registry, &callees, &bundles, &Args::new()).unwrap();
///
/// assert_eq!(results, List::from_values([Value::from(-3), Value::from(8)]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: NameMap<String, Function>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function` under `identifier`, returning the function it replaces.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        function: Function,
    ) -> Option<Function> {
        let identifier = identifier.into();
        let function = match function.name() {
            Some(_) => function,
            None => function.named(&identifier),
        };
        self.functions.insert(identifier, function)
    }

    /// Returns the function registered under `identifier`.
    pub fn get(&self, identifier: &str) -> Option<&Function> {
        self.functions.get(identifier)
    }

    /// Returns `true` if `identifier` is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.functions.contains_key(identifier)
    }

    /// Returns the number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// The function to call at one index of [`invoke_map`].
#[derive(Debug, Clone)]
pub enum Callee {
    /// An identifier looked up in the registry.
    Named(String),
    /// A function value.
    Function(Function),
}

impl Callee {
    fn resolve<'a>(&'a self, registry: &'a FunctionRegistry) -> Result<&'a Function> {
        match self {
            Self::Function(function) => Ok(function),
            Self::Named(identifier) => {
                registry
                    .get(identifier)
                    .ok_or_else(|| Error::UnknownFunction {
                        name: identifier.clone(),
                    })
            }
        }
    }
}

impl From<&str> for Callee {
    fn from(identifier: &str) -> Self {
        Self::Named(identifier.to_string())
    }
}

impl From<String> for Callee {
    fn from(identifier: String) -> Self {
        Self::Named(identifier)
    }
}

impl From<Function> for Callee {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

/// Calls the `i`-th callee with the `i`-th argument bundle followed by `shared`.
///
/// A bundle that is a list contributes its children as arguments, named
/// where the list is named. A scalar bundle is a single positional argument.
/// The result carries the names of `bundles`.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if `callees` and `bundles` differ in length
/// - [`Error::UnknownFunction`] (wrapped with the index) for an identifier
///   missing from `registry`
/// - the first call failure, wrapped with its index
pub fn invoke_map(
    registry: &FunctionRegistry,
    callees: &[Callee],
    bundles: &List,
    shared: &Args,
) -> Result<List> {
    if callees.len() != bundles.len() {
        return Err(Error::LengthMismatch {
            operation: "invoke_map",
            expected: callees.len(),
            found: bundles.len(),
        });
    }
    let values = callees
        .iter()
        .zip(bundles.iter())
        .enumerate()
        .map(|(index, (callee, bundle))| {
            let function = callee.resolve(registry).map_err(|error| error.at_index(index))?;
            let mut args = match bundle {
                Value::List(arguments) => Args::from(arguments.clone()),
                scalar => Args::one(scalar.clone()),
            };
            args.extend_from(shared);
            function.call(args).map_err(|error| {
                tracing::debug!(index, %error, "invocation failed");
                error.at_index(index)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(bundles.with_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::extractor::Param;
    use rstest::rstest;

    fn registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        registry.register(
            "scale",
            Function::with_params([Param::required("x"), Param::optional("by", 10)], |args| {
                let x = args.named("x").and_then(Value::as_int).unwrap_or(0);
                let by = args.named("by").and_then(Value::as_int).unwrap_or(1);
                Ok(Value::from(x * by))
            }),
        );
        registry.register("count", Function::new(|args| Ok(Value::from(args.len() as i64))));
        registry
    }

    #[rstest]
    fn test_register_names_anonymous_functions() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("scale"));
        assert_eq!(registry.get("count").and_then(Function::name), Some("count"));
        assert!(!FunctionRegistry::new().contains("scale"));
    }

    #[rstest]
    fn test_invoke_map_with_named_bundles_and_shared_args() {
        let callees = [Callee::from("scale"), Callee::from("scale"), Callee::from("count")];
        let bundles = List::from_values([
            Value::from(List::from_named([("x", 2)])),
            Value::from(List::from_named([("by", 3), ("x", 2)])),
            Value::from(List::from_values([Value::from(1), Value::from(2)])),
        ]);
        let results = invoke_map(&registry(), &callees, &bundles, &Args::new()).unwrap();
        assert_eq!(results, List::from_values([Value::from(20), Value::from(6), Value::from(2)]));

        let shared = Args::new().with_named("by", 5);
        let results =
            invoke_map(&registry(), &callees[..1], &bundles.slice(0..1), &shared).unwrap();
        assert_eq!(results, List::from_values([Value::from(10)]));
    }

    #[rstest]
    fn test_invoke_map_accepts_function_values() {
        let callees = [Callee::from(Function::unary(|value| Ok(value.clone())))];
        let bundles = List::from_named([("only", "x")]);
        assert_eq!(
            invoke_map(&FunctionRegistry::new(), &callees, &bundles, &Args::new()),
            Ok(List::from_named([("only", "x")]))
        );
    }

    #[rstest]
    fn test_invoke_map_errors() {
        let bundles = List::from_values([Value::from(1)]);
        assert_eq!(
            invoke_map(&registry(), &[], &bundles, &Args::new()).unwrap_err().kind(),
            ErrorKind::LengthMismatch
        );
        assert_eq!(
            invoke_map(&registry(), &[Callee::from("missing")], &bundles, &Args::new()),
            Err(Error::UnknownFunction {
                name: "missing".to_string()
            }
            .at_index(0))
        );
        let duplicate = Args::new().with_named("x", 9);
        let bundled = List::from_values([Value::from(List::from_named([("x", 1)]))]);
        let error =
            invoke_map(&registry(), &[Callee::from("scale")], &bundled, &duplicate).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ArgumentBinding);
    }
}
