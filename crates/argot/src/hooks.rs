//! Hooks that run between parsing and the command handler.
//!
//! ```text
//! raw tokens
//!   → boolean flags resolved
//!   → IMPLICATIONS ← (flag X true ⇒ constraints of Y change)
//!   → flags, args validated with the resulting constraints
//!   → POST-VALIDATION HOOK ← (cross-parameter checks, can abort)
//!   → handler
//! ```
//!
//! Implications are declarative rules attached to boolean flags. They are
//! applied to a per-run [`ConstraintOverlay`], never to the declared
//! parameters, so one run cannot leak requirements into the next.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::command::Command;
use crate::handler::ParsedValues;
use crate::param::Param;
use crate::types::{Constraints, ParamKind};

/// The parameter an [`Implication`] changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A flag, by long name.
    Flag(String),
    /// A positional argument, by name.
    Arg(String),
}

impl Target {
    /// The target parameter's name.
    pub fn name(&self) -> &str {
        match self {
            Target::Flag(name) | Target::Arg(name) => name,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Flag(name) => write!(f, "flag '{}'", name),
            Target::Arg(name) => write!(f, "argument '{}'", name),
        }
    }
}

/// A rule fired when the boolean flag carrying it resolves to true.
///
/// # Example
///
/// ```
/// use argot::{Constraints, Implication, Param, ValueType};
///
/// // `-r` makes `--alphanumdots` required.
/// let flag = Param::new("make-required")
///     .alias('r')
///     .value_type(ValueType::Bool)
///     .on_true(Implication::flag("alphanumdots").require());
/// assert_eq!(flag.implications().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implication {
    target: Target,
    add: Constraints,
    remove: Constraints,
}

impl Implication {
    /// A rule changing the flag with the given long name.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(Target::Flag(name.into()))
    }

    /// A rule changing the positional argument with the given name.
    pub fn arg(name: impl Into<String>) -> Self {
        Self::new(Target::Arg(name.into()))
    }

    fn new(target: Target) -> Self {
        Self {
            target,
            add: Constraints::empty(),
            remove: Constraints::empty(),
        }
    }

    /// Adds constraints to the target.
    pub fn add(mut self, constraints: Constraints) -> Self {
        self.add |= constraints;
        self
    }

    /// Removes constraints from the target. Removal is applied after addition.
    pub fn remove(mut self, constraints: Constraints) -> Self {
        self.remove |= constraints;
        self
    }

    /// Shorthand for `add(Constraints::REQUIRED)`.
    pub fn require(self) -> Self {
        self.add(Constraints::REQUIRED)
    }

    /// The parameter this rule changes.
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub(crate) fn apply(&self, constraints: Constraints) -> Constraints {
        (constraints | self.add).difference(self.remove)
    }
}

/// Constraints in effect for a single run.
///
/// Starts empty; parameters without an entry use their declared constraints.
#[derive(Debug, Clone, Default)]
pub struct ConstraintOverlay {
    flags: HashMap<String, Constraints>,
    args: HashMap<String, Constraints>,
}

impl ConstraintOverlay {
    /// Creates an overlay with no changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one implication on top of what is already in effect.
    pub fn apply(&mut self, command: &Command, implication: &Implication) {
        let (map, declared) = match implication.target() {
            Target::Flag(name) => (&mut self.flags, command.get_flag(name)),
            Target::Arg(name) => (&mut self.args, command.get_arg(name)),
        };
        let Some(declared) = declared else {
            return;
        };
        let current = map
            .get(declared.name())
            .copied()
            .unwrap_or(declared.get_constraints());
        map.insert(declared.name().to_string(), implication.apply(current));
    }

    /// The constraints in effect for `param`.
    pub fn effective(&self, param: &Param) -> Constraints {
        let map = match param.kind() {
            ParamKind::Flag => &self.flags,
            ParamKind::Argument => &self.args,
            ParamKind::EnvVar => return param.get_constraints(),
        };
        map.get(param.name())
            .copied()
            .unwrap_or(param.get_constraints())
    }

    /// Returns true if no implication has fired.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.args.is_empty()
    }
}

/// Error returned by a post-validation hook.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    /// Human-readable error message
    pub message: String,
    /// The underlying error source, if any
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HookError {
    /// Creates a new hook error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.source = Some(source.into());
        self
    }
}

/// Type alias for post-validation hook functions.
///
/// Runs once after every flag, argument and environment variable validated,
/// before the handler. Returning an error aborts the run with exit code 1.
pub type PostValidationFn = Rc<dyn Fn(&Command, &ParsedValues) -> Result<(), HookError>>;
