//! Value validation.
//!
//! Validation is purely value-level: it looks at one raw string, the value
//! type and the constraints in effect, and never at sibling parameters.
//!
//! The checks run in a fixed order:
//!
//! ```text
//! required + empty (non-bool)  → ValueMissing
//! String                       → ok
//! not required + empty         → ok
//! PathFile                     → stat / existence / kind / JSON checks
//! Int, Float, Alphanumeric     → anchored pattern, optionally a list
//! anything else                → TypeInvalid
//! ```

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{Constraints, ValueType};

/// Why a value was rejected.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required value is empty or absent.
    #[error("param value missing")]
    ValueMissing,

    /// The value does not match the pattern for its type.
    #[error("param value invalid")]
    ValueInvalid,

    /// The value type has no validation rule for non-empty values.
    #[error("param type invalid")]
    TypeInvalid,

    /// `MUST_EXIST` is set and nothing exists at the path.
    #[error("file path validation failed: file does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The path could not be stat'ed for a reason other than not existing.
    #[error("file path validation failed: file cannot be opened for stat info: {}", .path.display())]
    PathInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `MUST_NOT_EXIST` is set and the path exists.
    #[error("file path validation failed: file already exists: {}", .0.display())]
    PathAlreadyExists(PathBuf),

    /// `MUST_BE_REGULAR_FILE` is set and the entry is not a regular file.
    #[error("file path validation failed: file is not a regular file: {}", .0.display())]
    NotARegularFile(PathBuf),

    /// `MUST_BE_DIRECTORY` is set and the entry is not a directory.
    #[error("file path validation failed: file is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The file had to be read for the JSON check and could not be.
    #[error("file path validation failed: validate json file cannot be opened: {}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file contents are not syntactically valid JSON.
    #[error("file path validation failed: file is not a valid JSON: {}", .0.display())]
    InvalidJson(PathBuf),
}

/// Validates a raw value against a value type and constraints.
///
/// # Example
///
/// ```
/// use argot::{validate_value, Constraints, ValidationError, ValueType};
///
/// assert!(validate_value(ValueType::Int, Constraints::empty(), "48").is_ok());
/// assert!(matches!(
///     validate_value(ValueType::Int, Constraints::empty(), "48.5"),
///     Err(ValidationError::ValueInvalid)
/// ));
/// assert!(matches!(
///     validate_value(ValueType::Float, Constraints::REQUIRED, ""),
///     Err(ValidationError::ValueMissing)
/// ));
/// ```
pub fn validate_value(
    value_type: ValueType,
    constraints: Constraints,
    value: &str,
) -> Result<(), ValidationError> {
    if value_type != ValueType::Bool && constraints.is_required() && value.is_empty() {
        return Err(ValidationError::ValueMissing);
    }

    if value_type == ValueType::String {
        return Ok(());
    }

    if !constraints.is_required() && value.is_empty() {
        return Ok(());
    }

    if value_type == ValueType::PathFile {
        return validate_path(constraints, Path::new(value));
    }

    let pattern = value_pattern(value_type, constraints).ok_or(ValidationError::TypeInvalid)?;
    match Regex::new(&pattern) {
        Ok(re) if re.is_match(value) => Ok(()),
        _ => Err(ValidationError::ValueInvalid),
    }
}

/// Builds the anchored pattern a value of `value_type` must match.
///
/// Returns `None` for types that are not pattern-checked.
pub(crate) fn value_pattern(value_type: ValueType, constraints: Constraints) -> Option<String> {
    let unit = match value_type {
        ValueType::Int => "[0-9]+".to_string(),
        ValueType::Float => r"[0-9]{1,16}\.[0-9]{1,16}".to_string(),
        ValueType::Alphanumeric => {
            let mut extra = String::new();
            if constraints.contains(Constraints::ALLOW_UNDERSCORE) {
                extra.push('_');
            }
            if constraints.contains(Constraints::ALLOW_DOTS) {
                extra.push_str(r"\.");
            }
            if constraints.contains(Constraints::ALLOW_HYPHEN) {
                extra.push_str(r"\-");
            }
            format!("[0-9a-zA-Z{}]+", extra)
        }
        ValueType::String | ValueType::Bool | ValueType::PathFile => return None,
    };

    if constraints.contains(Constraints::ALLOW_MULTIPLE_VALUES) {
        let sep = constraints.separator();
        Some(format!("^{unit}({sep}{unit})*$"))
    } else {
        Some(format!("^{unit}$"))
    }
}

fn validate_path(constraints: Constraints, path: &Path) -> Result<(), ValidationError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if constraints.contains(Constraints::MUST_EXIST) {
                return Err(ValidationError::PathNotFound(path.to_path_buf()));
            }
            return Ok(());
        }
        Err(source) => {
            return Err(ValidationError::PathInaccessible {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if constraints.contains(Constraints::MUST_NOT_EXIST) {
        return Err(ValidationError::PathAlreadyExists(path.to_path_buf()));
    }

    let regular_file = constraints.contains(Constraints::MUST_BE_REGULAR_FILE);

    if regular_file && !metadata.is_file() {
        return Err(ValidationError::NotARegularFile(path.to_path_buf()));
    }

    if constraints.contains(Constraints::MUST_BE_DIRECTORY) && !metadata.is_dir() {
        return Err(ValidationError::NotADirectory(path.to_path_buf()));
    }

    if regular_file && constraints.contains(Constraints::MUST_BE_VALID_JSON) {
        let contents = fs::read(path).map_err(|source| ValidationError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if serde_json::from_slice::<serde::de::IgnoredAny>(&contents).is_err() {
            return Err(ValidationError::InvalidJson(path.to_path_buf()));
        }
    }

    Ok(())
}
