//! # Error Types
//!
//! Structured error types for pentest_core. Errors serialize to JSON with a
//! `type` tag so a front end can map them back to the offending form field.
//!
//! ## Example
//!
//! ```rust
//! use pentest_core::errors::{PentestError, PentestResult};
//!
//! fn validate_pentesters(count: i64) -> PentestResult<()> {
//!     if count <= 0 {
//!         return Err(PentestError::invalid_input(
//!             "pentester_count",
//!             count.to_string(),
//!             "At least one pentester is required",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_pentesters(0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pentest_core operations
pub type PentestResult<T> = Result<T, PentestError>;

/// Structured error type for estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PentestError {
    /// An input value is out of its legal domain
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Text does not name any variant of a closed set (scope, approach, ...)
    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: String,
        value: String,
        expected: String,
    },

    /// Integer arithmetic overflowed while computing a quantity
    #[error("Arithmetic overflow while computing {quantity}")]
    Overflow { quantity: String },

    /// Pricing configuration could not be read or is inconsistent
    #[error("Config error in '{path}': {reason}")]
    ConfigError { path: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl PentestError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PentestError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        PentestError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownVariant error
    pub fn unknown_variant(kind: impl Into<String>, value: impl Into<String>, expected: &[&str]) -> Self {
        PentestError::UnknownVariant {
            kind: kind.into(),
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Create an Overflow error
    pub fn overflow(quantity: impl Into<String>) -> Self {
        PentestError::Overflow {
            quantity: quantity.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        PentestError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get the form field this error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            PentestError::InvalidInput { field, .. } | PentestError::MissingField { field } => Some(field.as_str()),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PentestError::InvalidInput { .. } => "INVALID_INPUT",
            PentestError::MissingField { .. } => "MISSING_FIELD",
            PentestError::UnknownVariant { .. } => "UNKNOWN_VARIANT",
            PentestError::Overflow { .. } => "OVERFLOW",
            PentestError::ConfigError { .. } => "CONFIG_ERROR",
            PentestError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for PentestError {
    fn from(err: serde_json::Error) -> Self {
        PentestError::SerializationError {
            reason: err.to_string(),
        }
    }
}
