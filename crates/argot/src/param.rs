//! Parameter definitions shared by flags, positional arguments and
//! environment variables.

use crate::hooks::Implication;
use crate::types::{Constraints, ParamKind, ValueType};
use crate::validate::{validate_value, ValidationError};

/// A declared flag, positional argument or environment variable.
///
/// The kind is set when the parameter is added to a
/// [`Command`](crate::Command): [`Command::flag`](crate::Command::flag),
/// [`Command::arg`](crate::Command::arg) or [`Command::env`](crate::Command::env).
/// Aliases are only kept for flags.
///
/// # Example
///
/// ```
/// use argot::{Constraints, Param, ValueType};
///
/// let username = Param::new("username")
///     .alias('u')
///     .placeholder("USERNAME")
///     .usage("Username")
///     .value_type(ValueType::Alphanumeric)
///     .constraints(Constraints::REQUIRED | Constraints::ALLOW_DOTS);
///
/// assert!(username.validate("john.doe").is_ok());
/// assert!(username.validate("john doe").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    kind: ParamKind,
    name: String,
    alias: Option<char>,
    placeholder: String,
    usage: String,
    value_type: ValueType,
    constraints: Constraints,
    on_true: Vec<Implication>,
}

impl Param {
    /// Creates a string parameter with no constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::Flag,
            name: name.into(),
            alias: None,
            placeholder: String::new(),
            usage: String::new(),
            value_type: ValueType::String,
            constraints: Constraints::empty(),
            on_true: Vec::new(),
        }
    }

    /// Sets the single-character short form (`-a`).
    pub fn alias(mut self, alias: char) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Sets the value placeholder shown in help (and in argument errors).
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets the usage text.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Sets the value type.
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Replaces the constraints.
    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Adds [`Constraints::REQUIRED`].
    pub fn required(mut self) -> Self {
        self.constraints |= Constraints::REQUIRED;
        self
    }

    /// Adds a rule applied when this (boolean) flag is true.
    ///
    /// Only boolean flags may carry rules; [`AppBuilder::build`] rejects
    /// any other parameter that has one.
    ///
    /// [`AppBuilder::build`]: crate::AppBuilder::build
    pub fn on_true(mut self, implication: Implication) -> Self {
        self.on_true.push(implication);
        self
    }

    pub(crate) fn into_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        if kind != ParamKind::Flag {
            self.alias = None;
        }
        self
    }

    pub(crate) fn force_required(&mut self) {
        self.constraints |= Constraints::REQUIRED;
    }

    /// Where the value comes from.
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short form, for flags.
    pub fn get_alias(&self) -> Option<char> {
        self.alias
    }

    /// The value placeholder.
    pub fn get_placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The usage text.
    pub fn get_usage(&self) -> &str {
        &self.usage
    }

    /// The declared value type.
    pub fn get_value_type(&self) -> ValueType {
        self.value_type
    }

    /// The declared constraints.
    pub fn get_constraints(&self) -> Constraints {
        self.constraints
    }

    /// Rules applied when this flag is true.
    pub fn implications(&self) -> &[Implication] {
        &self.on_true
    }

    /// Returns true for boolean parameters.
    pub fn is_bool(&self) -> bool {
        self.value_type == ValueType::Bool
    }

    /// Validates a raw value against the declared type and constraints.
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        validate_value(self.value_type, self.constraints, value)
    }

    /// Name used in error messages: arguments show their placeholder.
    pub fn display_name(&self) -> &str {
        match self.kind {
            ParamKind::Argument => &self.placeholder,
            ParamKind::Flag | ParamKind::EnvVar => &self.name,
        }
    }

    /// First help column for a flag: `-a, --name PLACEHOLDER`.
    pub(crate) fn flag_label(&self) -> String {
        let mut label = match self.alias {
            Some(alias) => format!("-{}, --{}", alias, self.name),
            None => format!("    --{}", self.name),
        };
        if !self.placeholder.is_empty() {
            label.push(' ');
            label.push_str(&self.placeholder);
        }
        label
    }
}
