//! Error types for flood forecast services.

use thiserror::Error;

/// Result type alias using FloodError.
pub type FloodResult<T> = Result<T, FloodError>;

/// Primary error type for flood forecast operations.
#[derive(Debug, Error)]
pub enum FloodError {
    // === Client Errors ===
    /// Neither or both of point/bbox supplied, or a malformed value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Outside the region of interest: {0}")]
    OutOfRegion(String),

    /// Start date after end date, or a bbox with min >= max.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    // === Data Errors ===
    #[error("Dataset not available: {0}")]
    DatasetUnavailable(String),

    #[error("Failed to fetch dataset '{dataset}': {message}")]
    FetchFailure { dataset: String, message: String },

    #[error("Failed to parse row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    // === Response Errors ===
    #[error("Failed to encode response: {0}")]
    EncodingFailure(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl FloodError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            FloodError::InvalidInput(_) | FloodError::InvalidRange(_) => 400,

            FloodError::OutOfRegion(_) => 404,

            FloodError::DatasetUnavailable(_) => 503,

            _ => 500,
        }
    }

    /// Client errors are rejected before any spatial lookup and are never retried.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FloodError::InvalidInput(_) | FloodError::OutOfRegion(_) | FloodError::InvalidRange(_)
        )
    }
}

impl From<std::io::Error> for FloodError {
    fn from(err: std::io::Error) -> Self {
        FloodError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FloodError {
    fn from(err: serde_json::Error) -> Self {
        FloodError::EncodingFailure(format!("JSON error: {}", err))
    }
}
