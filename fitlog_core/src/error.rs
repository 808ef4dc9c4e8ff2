//! Error types for the fitlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user with this identifier already exists
    #[error("User already exists: {0}")]
    DuplicateIdentifier(String),

    /// Body weight must be strictly positive
    #[error("Invalid weight: {0} (must be greater than zero)")]
    InvalidWeight(f64),

    /// No user with this identifier
    #[error("User not found: {0}")]
    NotFound(String),

    /// Exercise name not in the known set
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    /// A required estimator input was not supplied
    #[error("Missing {field} for {kind}")]
    MissingInput { kind: String, field: String },

    /// An estimator input was negative or not a finite number
    #[error("Invalid {field} for {kind}")]
    InvalidInput { kind: String, field: String },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn missing(kind: impl ToString, field: &str) -> Self {
        Error::MissingInput {
            kind: kind.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(kind: impl ToString, field: &str) -> Self {
        Error::InvalidInput {
            kind: kind.to_string(),
            field: field.to_string(),
        }
    }
}
