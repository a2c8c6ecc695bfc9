//! Errors that end a run before the handler is called.

use thiserror::Error;

use crate::hooks::HookError;
use crate::param::Param;
use crate::types::ParamKind;
use crate::validate::ValidationError;

/// Why a run stopped with exit code 1.
///
/// The engine writes these to stderr as `ERROR: {error}`, except
/// [`DispatchError::UnknownCommand`] which is printed without the prefix.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The first token is not a registered command.
    #[error("Invalid command: {0}")]
    UnknownCommand(String),

    /// A flag, argument or environment variable failed validation.
    #[error("{kind} {name}: {source}")]
    InvalidParam {
        kind: ParamKind,
        /// Declared name, or placeholder for arguments.
        name: String,
        #[source]
        source: ValidationError,
    },

    /// Both `-a` and `--name` carried a non-empty value.
    #[error("Both -{alias} and --{name} passed")]
    ConflictingFlagForms { name: String, alias: char },

    /// The flag tokens could not be parsed.
    #[error("Unable to parse flags: {0}")]
    MalformedFlags(String),

    /// The post-validation hook rejected the values.
    #[error("{0}")]
    PostValidationRejected(#[source] HookError),
}

impl DispatchError {
    pub(crate) fn invalid(param: &Param, source: ValidationError) -> Self {
        DispatchError::InvalidParam {
            kind: param.kind(),
            name: param.display_name().to_string(),
            source,
        }
    }

    /// Returns true if the command help follows the error message.
    pub fn shows_help(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidParam { .. } | DispatchError::PostValidationRejected(_)
        )
    }
}
