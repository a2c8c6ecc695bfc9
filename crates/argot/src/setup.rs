//! Error types for setup operations.
//!
//! These are programmer errors in the command definitions, reported once by
//! [`AppBuilder::build`](crate::AppBuilder::build) instead of surfacing as
//! odd behavior at parse time.

use thiserror::Error;

use crate::hooks::Target;
use crate::types::ParamKind;

/// Error type for setup operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// Two commands share a name.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),

    /// Two global environment variables share a name.
    #[error("duplicate environment variable: {0}")]
    DuplicateEnvVar(String),

    /// A flag, argument or environment variable was declared twice.
    #[error("command '{command}': duplicate {} '{name}'", .kind.label().to_lowercase())]
    DuplicateParam {
        command: String,
        kind: ParamKind,
        name: String,
    },

    /// More than [`MAX_POSITIONAL_ARGS`](crate::MAX_POSITIONAL_ARGS) positional arguments.
    #[error("command '{command}': {count} positional arguments declared, only {max} are allowed")]
    TooManyPositionalArguments {
        command: String,
        count: usize,
        max: usize,
    },

    /// `MUST_EXIST` and `MUST_NOT_EXIST` on the same parameter, declared or
    /// after an implication.
    #[error("command '{command}': '{name}' cannot both require and forbid an existing path")]
    ConflictingConstraints { command: String, name: String },

    /// Empty name, or a name clap cannot use as `--name`.
    #[error("command '{command}': invalid name '{name}'")]
    InvalidName { command: String, name: String },

    /// Alias that is not a letter or digit.
    #[error("command '{command}': flag '{name}' has invalid alias '{alias}'")]
    InvalidAlias {
        command: String,
        name: String,
        alias: char,
    },

    /// Two flags share an alias.
    #[error("command '{command}': alias '-{alias}' used by both '{first}' and '{second}'")]
    DuplicateAlias {
        command: String,
        alias: char,
        first: String,
        second: String,
    },

    /// An implication on something other than a boolean flag.
    #[error("command '{command}': only boolean flags can imply rules, '{name}' is not one")]
    InvalidImplicationSource { command: String, name: String },

    /// An implication points at a parameter the command does not declare.
    #[error("command '{command}': flag '{flag}' implies unknown {target}")]
    UnknownImplicationTarget {
        command: String,
        flag: String,
        target: Target,
    },
}
