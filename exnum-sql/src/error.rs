//! Statement preparation errors.

use thiserror::Error;

/// Errors that can occur while preparing a statement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqlError {
    /// The template references names absent from the supplied values.
    /// One entry per unbound occurrence, in template order.
    #[error("Missing values for placeholders: {}", .0.join(", "))]
    MissingPlaceholders(Vec<String>),

    /// Serialized values were not a map of names to values.
    #[error("Statement values must serialize to a map, got {0}")]
    NotAMap(String),

    /// Values could not be serialized.
    #[error("Failed to serialize statement values: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SqlError {
    fn from(err: serde_json::Error) -> Self {
        SqlError::Serialization(err.to_string())
    }
}
