//! Error types for ghfeed

use thiserror::Error;

/// Result type alias for ghfeed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ghfeed operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required connection parameter was not supplied
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    /// A value could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
