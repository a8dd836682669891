//! Error types for the ingestion crate.

use thiserror::Error;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Feed request failed: {0}")]
    Fetch(String),

    #[error("Feed returned an unexpected status: {0}")]
    FeedStatus(String),

    #[error("Feed payload is not valid JSON: {0}")]
    FeedPayload(String),

    #[error("Record is not a JSON object")]
    NotAnObject,
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
