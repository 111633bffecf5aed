//! The side-channel capturing adverb.
//!
//! A quiet call installs a fresh `tracing` subscriber as the thread's default
//! for the duration of the call only. Every event the wrapped function emits
//! on that thread lands in the call's own [`Diagnostics`]; nothing reaches the
//! surrounding subscriber, and a nested quiet call captures into its own
//! record without leaking into the outer one.
//!
//! # Examples
//!
//! ```rust
//! use listwise::{Args, Function, Value, make_quiet};
//!
//! let noisy = make_quiet(Function::unary(|value| {
//!     tracing::info!("processing {value}");
//!     tracing::warn!("value is negative");
//!     Ok(value.clone())
//! }));
//!
//! let diagnostics = noisy.call(Args::one(Value::from(-1))).unwrap();
//! assert_eq!(diagnostics.result(), &Value::from(-1));
//! assert_eq!(diagnostics.output(), &["processing -1".to_string()]);
//! assert_eq!(diagnostics.warnings(), &["value is negative".to_string()]);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::error::Result;
use crate::extractor::{Args, Extractor, Function};
use crate::value::{List, Value};

/// Options for [`make_quiet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietOptions {
    min_level: Level,
}

impl QuietOptions {
    /// Captures events of every level.
    pub const fn new() -> Self {
        Self {
            min_level: Level::TRACE,
        }
    }

    /// Captures only events at `min_level` or more severe.
    #[must_use]
    pub const fn with_min_level(mut self, min_level: Level) -> Self {
        self.min_level = min_level;
        self
    }

    /// Returns the least severe level captured.
    pub const fn min_level(&self) -> Level {
        self.min_level
    }
}

impl Default for QuietOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of a quiet call together with what it emitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagnostics {
    result: Value,
    output: Vec<String>,
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Returns the value the wrapped function returned.
    pub const fn result(&self) -> &Value {
        &self.result
    }

    /// Returns the captured non-warning events, in emission order.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Returns the captured `WARN` and `ERROR` events, in emission order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Returns the value the wrapped function returned, dropping the captures.
    pub fn into_result(self) -> Value {
        self.result
    }

    /// Renders the record as `{result, output, warnings}`.
    pub fn to_value(&self) -> Value {
        let texts = |lines: &[String]| {
            Value::from(
                lines
                    .iter()
                    .map(|line| Value::from(line.as_str()))
                    .collect::<List>(),
            )
        };
        Value::from(List::from_named([
            ("result", self.result.clone()),
            ("output", texts(&self.output)),
            ("warnings", texts(&self.warnings)),
        ]))
    }
}

#[derive(Default)]
struct Captured {
    output: Vec<String>,
    warnings: Vec<String>,
}

struct CaptureLayer {
    captured: Arc<Mutex<Captured>>,
    min_level: Level,
}

fn is_internal(target: &str) -> bool {
    target == "listwise" || target.starts_with("listwise::")
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _context: Context<'_, S>) {
        let metadata = event.metadata();
        // Less severe levels compare greater.
        if *metadata.level() > self.min_level || is_internal(metadata.target()) {
            return;
        }
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let line = visitor.finish();

        let mut captured = self.captured.lock();
        if *metadata.level() <= Level::WARN {
            captured.warnings.push(line);
        } else {
            captured.output.push(line);
        }
    }
}

/// Renders an event as its message followed by `name=value` fields.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<String>,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        let fields = self.fields.join(" ");
        if self.message.is_empty() {
            fields
        } else {
            format!("{} {fields}", self.message)
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}

/// A function whose calls capture their `tracing` output; see [`make_quiet`].
#[derive(Debug, Clone)]
pub struct QuietFunction {
    function: Function,
    options: QuietOptions,
}

impl QuietFunction {
    /// Replaces the capture options.
    #[must_use]
    pub const fn with_options(mut self, options: QuietOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the capture options.
    pub const fn options(&self) -> &QuietOptions {
        &self.options
    }

    /// Calls the wrapped function, capturing the events it emits.
    ///
    /// # Errors
    ///
    /// Returns whatever the wrapped function returns; failures are not
    /// captured, only side-channel output.
    pub fn call(&self, args: Args) -> Result<Diagnostics> {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer {
            captured: Arc::clone(&captured),
            min_level: self.options.min_level(),
        });
        let result = tracing::subscriber::with_default(subscriber, || self.function.call(args))?;

        let Captured { output, warnings } = std::mem::take(&mut *captured.lock());
        Ok(Diagnostics {
            result,
            output,
            warnings,
        })
    }

    /// Calls the wrapped function with a single argument.
    ///
    /// # Errors
    ///
    /// See [`QuietFunction::call`].
    pub fn apply(&self, value: &Value) -> Result<Diagnostics> {
        self.call(Args::one(value.clone()))
    }

    /// Converts into a plain [`Function`] that returns
    /// [`Diagnostics::to_value`] records.
    pub fn into_function(self) -> Function {
        let name = self.function.name().map(str::to_string);
        let wrapped =
            Function::new(move |args| self.call(args).map(|diagnostics| diagnostics.to_value()));
        match name {
            Some(name) => wrapped.named(&name),
            None => wrapped,
        }
    }
}

impl From<QuietFunction> for Function {
    fn from(quiet: QuietFunction) -> Self {
        quiet.into_function()
    }
}

impl From<QuietFunction> for Extractor {
    fn from(quiet: QuietFunction) -> Self {
        Self::function(quiet.into_function())
    }
}

/// Wraps `function` so that every call returns the `tracing` events it
/// emitted alongside its result.
///
/// Events at `WARN` or `ERROR` are recorded as warnings, all others as
/// output. Events emitted by this crate's own operations are not captured.
pub fn make_quiet(function: Function) -> QuietFunction {
    QuietFunction {
        function,
        options: QuietOptions::default(),
    }
}
