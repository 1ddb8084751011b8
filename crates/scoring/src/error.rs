//! Error types for the scoring crate.

use h2site_geo::GeoError;
use thiserror::Error;

/// Result type alias for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors that can occur while scoring a site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// Analysis radius is zero, negative or not finite
    #[error("Invalid analysis radius: {0}")]
    InvalidRadius(String),

    /// Slider weights are negative or not finite
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Blending factor outside `[0, 1]`
    #[error("Invalid blending factor: {0}")]
    InvalidBlendingFactor(String),

    /// Site center failed validation
    #[error(transparent)]
    Geo(#[from] GeoError),
}
