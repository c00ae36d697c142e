//! Error types for configuration loading.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Primary error type for configuration loading.
///
/// Every variant is fatal at startup; sources that are merely absent never
/// produce an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A secret group variable was set but did not hold a JSON object.
    #[error("malformed secret source '{variable}'")]
    MalformedSource {
        /// Environment variable that failed to parse.
        variable: &'static str,
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// A secret group variable was set but was not valid unicode.
    #[error("secret source '{variable}' is not valid unicode")]
    NonUnicodeSource {
        /// Environment variable holding the undecodable value.
        variable: &'static str,
    },
    /// A recognized key carried a JSON value of the wrong type.
    #[error("invalid value for '{key}' in '{variable}': expected {expected}")]
    InvalidValue {
        /// Environment variable the key was read from.
        variable: &'static str,
        /// Lower-cased key name.
        key: String,
        /// Description of the accepted JSON type.
        expected: &'static str,
    },
    /// Required fields were empty or zero after every group was merged.
    #[error("invalid/missing configuration: {}", render_violations(.violations))]
    Validation {
        /// Every field that failed validation.
        violations: Vec<FieldViolation>,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Single required-field failure reported by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    /// Secret key naming the offending field.
    pub field: &'static str,
    /// Machine-readable reason for the failure.
    pub reason: &'static str,
}

impl FieldViolation {
    /// Build a violation for `field`.
    #[must_use]
    pub const fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

impl Display for FieldViolation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} ({})", self.field, self.reason)
    }
}

fn render_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ConfigError {
    /// Field names reported by a validation failure; empty for other variants.
    #[must_use]
    pub fn violated_fields(&self) -> Vec<&'static str> {
        match self {
            Self::Validation { violations } => violations.iter().map(|v| v.field).collect(),
            _ => Vec::new(),
        }
    }
}
