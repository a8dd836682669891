//! Error types for meteoalert services.

use thiserror::Error;

/// Result type alias using AlertError.
pub type AlertResult<T> = Result<T, AlertError>;

/// Primary error type shared across the warning and region services.
#[derive(Debug, Error)]
pub enum AlertError {
    // === Request Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("No region contains the given coordinates")]
    RegionNotFound,

    #[error("Warning not found: {0}")]
    WarningNotFound(i64),

    // === Data Errors ===
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Feed error: {0}")]
    FeedError(String),

    // === Storage Errors ===
    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AlertError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AlertError::MissingParameter(_) | AlertError::InvalidParameter { .. } => 400,

            AlertError::RegionNotFound | AlertError::WarningNotFound(_) => 404,

            AlertError::ServiceUnavailable(_) => 503,

            _ => 500,
        }
    }
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        AlertError::InternalError(format!("JSON error: {}", err))
    }
}
