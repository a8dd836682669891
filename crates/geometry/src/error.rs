//! Error types for boundary loading and parsing.

use alert_common::AlertError;
use thiserror::Error;

/// Errors raised while building or parsing region geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Degenerate ring: {0}")]
    DegenerateRing(String),

    #[error("No polygon geometry found in document")]
    EmptyDocument,

    #[error("Invalid GML: {0}")]
    InvalidGml(String),

    #[error("Invalid boundary encoding: {0}")]
    InvalidBoundary(String),
}

impl From<GeometryError> for AlertError {
    fn from(err: GeometryError) -> Self {
        AlertError::InvalidGeometry(err.to_string())
    }
}
