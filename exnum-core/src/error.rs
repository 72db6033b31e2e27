//! Error types for the exnum core library.
//!
//! These cover the library's own failure paths (configuration, tracing
//! setup, strict code allocation). Errors raised *through* the registry are
//! [`crate::Exception`] values instead.

use thiserror::Error;

/// Top-level error type for exnum operations.
#[derive(Error, Debug)]
pub enum ExnumError {
    /// Configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A scope was requested that the configuration does not declare.
    #[error("Unknown scope: {0}")]
    UnknownScope(String),

    /// Strict allocation refused a key without a numeric value.
    #[error("Variant {name} in scope {scope} has no numeric code")]
    UnassignedCode {
        /// Effective scope of the accessor.
        scope: String,
        /// Requested variant name.
        name: String,
    },

    /// The tracing subscriber could not be installed.
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ExnumError>;
