//! Error types for the conformance harness.

use thiserror::Error;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the conformance harness.
///
/// Failures raised by an action body are not represented here: those are
/// captured on the worker thread and surfaced through the action handle.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Action lifecycle errors (40-49)
    #[error("failed to spawn thread for action {action}: {source}")]
    Spawn {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("action {action} has not completed")]
    NotCompleted { action: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("incompatible schema version {found} (supported: {supported})")]
    IncompatibleSchema { found: String, supported: String },

    // Logging errors (80-89)
    #[error("logging initialisation failed: {0}")]
    Logging(String),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::Spawn { .. } => 40,
            Error::NotCompleted { .. } => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::IncompatibleSchema { .. } => 62,
            Error::Logging(_) => 80,
        }
    }
}
