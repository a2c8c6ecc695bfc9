//! Command handler types.
//!
//! A handler receives a [`CommandContext`] once every value validated and
//! returns the process exit code. Parsed values are scoped to the run that
//! produced them: nothing is kept on the [`App`](crate::App) between runs.

use std::collections::BTreeMap;
use std::str::FromStr;

/// Validated values of a single run, keyed by declared name.
///
/// Boolean flags are recorded as the strings `"true"` / `"false"`.
/// Lookups of undeclared names return the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedValues {
    flags: BTreeMap<String, String>,
    args: BTreeMap<String, String>,
    env: BTreeMap<String, String>,
}

impl ParsedValues {
    /// Creates an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of a flag.
    pub fn flag(&self, name: &str) -> &str {
        self.flags.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Returns true if a boolean flag was set.
    pub fn is_set(&self, name: &str) -> bool {
        self.flag(name) == "true"
    }

    /// The value of a positional argument.
    pub fn arg(&self, name: &str) -> &str {
        self.args.get(name).map(String::as_str).unwrap_or_default()
    }

    /// The value of a validated environment variable.
    pub fn env(&self, name: &str) -> &str {
        self.env.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Parses a non-empty flag value. Returns `None` when the flag is empty.
    ///
    /// ```
    /// use argot::ParsedValues;
    ///
    /// let mut values = ParsedValues::new();
    /// values.insert_flag("number", "42");
    /// assert_eq!(values.flag_as::<u32>("number"), Some(Ok(42)));
    /// assert_eq!(values.flag_as::<u32>("other"), None);
    /// ```
    pub fn flag_as<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        parse_non_empty(self.flag(name))
    }

    /// Parses a non-empty positional argument. Returns `None` when empty.
    pub fn arg_as<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        parse_non_empty(self.arg(name))
    }

    /// Iterates over flags in name order.
    pub fn flags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over positional arguments in name order.
    pub fn args(&self) -> impl Iterator<Item = (&str, &str)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Records a flag value.
    pub fn insert_flag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.flags.insert(name.into(), value.into());
    }

    /// Records a positional argument value.
    pub fn insert_arg(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.args.insert(name.into(), value.into());
    }

    /// Records an environment variable value.
    pub fn insert_env(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.env.insert(name.into(), value.into());
    }
}

fn parse_non_empty<T: FromStr>(value: &str) -> Option<Result<T, T::Err>> {
    if value.is_empty() {
        None
    } else {
        Some(value.parse())
    }
}

/// Context passed to command handlers.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Program name (basename of `argv[0]`).
    pub program: String,
    /// The command being executed.
    pub command: String,
    /// Validated values of this run.
    pub values: ParsedValues,
}

impl CommandContext {
    /// Shorthand for `self.values.flag(name)`.
    pub fn flag(&self, name: &str) -> &str {
        self.values.flag(name)
    }

    /// Shorthand for `self.values.arg(name)`.
    pub fn arg(&self, name: &str) -> &str {
        self.values.arg(name)
    }
}

/// Trait for command handlers.
///
/// Handlers take `&mut self` so they can keep state across runs of the same
/// [`App`](crate::App).
///
/// # Example
///
/// ```rust
/// use argot::{CommandContext, Handler};
///
/// struct Counter { runs: i32 }
///
/// impl Handler for Counter {
///     fn handle(&mut self, _ctx: &CommandContext) -> i32 {
///         self.runs += 1;
///         0
///     }
/// }
/// ```
pub trait Handler {
    /// Executes the command and returns the exit code.
    fn handle(&mut self, ctx: &CommandContext) -> i32;
}

/// A wrapper that implements [`Handler`] for `FnMut` closures.
pub struct FnHandler<F>
where
    F: FnMut(&CommandContext) -> i32,
{
    f: F,
}

impl<F> FnHandler<F>
where
    F: FnMut(&CommandContext) -> i32,
{
    /// Creates a new FnHandler wrapping the given closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: FnMut(&CommandContext) -> i32,
{
    fn handle(&mut self, ctx: &CommandContext) -> i32 {
        (self.f)(ctx)
    }
}
