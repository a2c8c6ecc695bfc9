//! Value types and validation constraints.
//!
//! Every parameter (flag, positional argument or environment variable) has a
//! [`ValueType`] that selects the validation branch, and a set of
//! [`Constraints`] that refine it. Constraints that do not apply to a type are
//! accepted at definition time and simply ignored during validation, e.g.
//! [`Constraints::ALLOW_DOTS`] on an [`ValueType::Int`] parameter.

use bitflags::bitflags;
use std::fmt;

/// The kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    /// Any string. Only [`Constraints::REQUIRED`] is checked.
    #[default]
    String,
    /// A switch. Flags of this type never take a value.
    Bool,
    /// One or more decimal digits.
    Int,
    /// Digits, a dot, digits (`12.5`). Integers are rejected.
    Float,
    /// Latin letters and digits, optionally with dots, underscores and hyphens.
    Alphanumeric,
    /// A filesystem path, checked with the path constraints.
    PathFile,
}

bitflags! {
    /// Combinable validation rules attached to a parameter.
    ///
    /// # Example
    ///
    /// ```
    /// use argot::Constraints;
    ///
    /// let c = Constraints::REQUIRED | Constraints::ALLOW_MULTIPLE_VALUES | Constraints::SEPARATOR_COLON;
    /// assert!(c.is_required());
    /// assert_eq!(c.separator(), ':');
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Constraints: u16 {
        /// The value must be present and non-empty (ignored for booleans).
        const REQUIRED = 1 << 0;
        /// Path must exist.
        const MUST_EXIST = 1 << 1;
        /// Path must not exist.
        const MUST_NOT_EXIST = 1 << 2;
        /// Path, if it exists, must be a directory.
        const MUST_BE_DIRECTORY = 1 << 3;
        /// Path, if it exists, must be a regular file.
        const MUST_BE_REGULAR_FILE = 1 << 4;
        /// Regular file contents must be valid JSON. Needs `MUST_BE_REGULAR_FILE`.
        const MUST_BE_VALID_JSON = 1 << 5;

        /// Alphanumeric values may contain `.`.
        const ALLOW_DOTS = 1 << 6;
        /// Alphanumeric values may contain `_`.
        const ALLOW_UNDERSCORE = 1 << 7;
        /// Alphanumeric values may contain `-`.
        const ALLOW_HYPHEN = 1 << 8;

        /// Int, float and alphanumeric values may be a list, e.g. `1,2,3`.
        const ALLOW_MULTIPLE_VALUES = 1 << 9;
        /// List separator is `:` instead of `,`.
        const SEPARATOR_COLON = 1 << 10;
        /// List separator is `;` instead of `,`.
        const SEPARATOR_SEMICOLON = 1 << 11;
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::empty()
    }
}

impl Constraints {
    /// Returns true if [`Constraints::REQUIRED`] is set.
    pub fn is_required(self) -> bool {
        self.contains(Self::REQUIRED)
    }

    /// The separator used between multiple values.
    ///
    /// Colon wins over semicolon when both are set; comma is the default.
    pub fn separator(self) -> char {
        if self.contains(Self::SEPARATOR_COLON) {
            ':'
        } else if self.contains(Self::SEPARATOR_SEMICOLON) {
            ';'
        } else {
            ','
        }
    }
}

/// Where a parameter's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamKind {
    /// `--name` / `-a`
    #[default]
    Flag,
    /// Positional argument.
    Argument,
    /// Environment variable.
    EnvVar,
}

impl ParamKind {
    /// Label used as the prefix of error messages.
    pub fn label(self) -> &'static str {
        match self {
            ParamKind::Flag => "Flag",
            ParamKind::Argument => "Argument",
            ParamKind::EnvVar => "Env var",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constraints_are_empty() {
        assert!(Constraints::default().is_empty());
        assert!(!Constraints::default().is_required());
    }

    #[test]
    fn separator_defaults_to_comma() {
        assert_eq!(Constraints::ALLOW_MULTIPLE_VALUES.separator(), ',');
    }

    #[test]
    fn separator_colon_wins_over_semicolon() {
        let c = Constraints::SEPARATOR_COLON | Constraints::SEPARATOR_SEMICOLON;
        assert_eq!(c.separator(), ':');
        assert_eq!(Constraints::SEPARATOR_SEMICOLON.separator(), ';');
    }

    #[test]
    fn constraint_bits_are_distinct() {
        let all: Vec<Constraints> = Constraints::all().iter().collect();
        assert_eq!(all.len(), 12);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(!a.intersects(*b));
            }
        }
    }

    #[test]
    fn param_kind_labels() {
        assert_eq!(ParamKind::Flag.to_string(), "Flag");
        assert_eq!(ParamKind::Argument.to_string(), "Argument");
        assert_eq!(ParamKind::EnvVar.to_string(), "Env var");
    }
}
