//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude/longitude out of range or non-finite
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Negative or non-finite radius
    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    /// Invalid WKT format
    #[error("Invalid WKT format: {0}")]
    InvalidWkt(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Json(err.to_string())
    }
}

/// Error code for integration with h2site-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10001,
    /// Invalid radius values
    InvalidRadius = 10002,
    /// Invalid WKT format
    InvalidWkt = 10003,
    /// JSON parsing error
    JsonParsing = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidRadius(_) => GeoErrorCode::InvalidRadius,
            GeoError::InvalidWkt(_) => GeoErrorCode::InvalidWkt,
            GeoError::Json(_) => GeoErrorCode::JsonParsing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GeoError::InvalidCoordinate("x".into()).code() as u32,
            10001
        );
        assert_eq!(GeoError::InvalidRadius("x".into()).code(), GeoErrorCode::InvalidRadius);
    }

    #[test]
    fn test_json_error_conversion() {
        let err: GeoError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), GeoErrorCode::JsonParsing);
    }
}
