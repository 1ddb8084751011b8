//! Error types for the report crate.

use thiserror::Error;

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while reading or listing reports.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// Analysis payload is not valid JSON or misses required fields
    #[error("Invalid analysis payload: {0}")]
    InvalidPayload(String),

    /// Unknown report status
    #[error("Unknown report status '{0}' (expected completed, processing or failed)")]
    InvalidStatus(String),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}
