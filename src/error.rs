//! Error types for topk-sweep
//!
//! Every failure class maps to one variant so callers can decide between
//! "abort the run" and "skip this sample and continue".

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// topk-sweep error types
#[derive(Error, Debug)]
pub enum Error {
    /// Sampling parameter outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Generation service call failed (transport, status, or response body)
    #[error("Generation failed: {0}\nIs the generation service running and the model pulled?")]
    Generation(String),

    /// Results store could not be written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Results store could not be loaded for analysis
    #[error("Failed to load results from {path}: {reason}")]
    DataLoad {
        /// Path of the store file
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// Configuration file unreadable, or a setting out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
