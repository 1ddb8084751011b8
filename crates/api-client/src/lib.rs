//! API client for the h2site analysis back-end and geocoding service
//!
//! This crate provides a unified, resilient HTTP client for the hydrogen
//! site analysis back-end (assets, analysis, reports) and the Mapbox
//! geocoding API.
//!
//! # Features
//!
//! - **Environment-based configuration**: Load URLs and tokens from environment variables
//! - **Retry with exponential backoff**: Automatic retry for transient failures
//! - **Circuit breaker**: Prevent cascading failures during outages
//! - **Rate limiting**: Separate budgets for the back-end and the geocoder
//! - **Request correlation**: Track requests with unique IDs for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use h2site_api_client::{AnalysisRequest, H2SiteClient};
//! use h2site_geo::GeoPoint;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = H2SiteClient::new()?;
//!
//!     let health = client.health().check().await?;
//!     println!("Service status: {}", health.status);
//!
//!     let request = AnalysisRequest::new(GeoPoint::new(72.5714, 23.0225), 25.0);
//!     let analysis = client.analysis().analyse(&request).await?;
//!     println!("Average score: {:.2}", analysis.s_avg);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
#[allow(missing_docs)]
pub mod endpoints;
pub mod error;
pub mod middleware;

pub use client::H2SiteClient;
pub use config::{ClientConfig, Environment};
pub use endpoints::{
    AnalysisRequest, AssetDraft, AssetRecord, CompareRequest, CompareResponse, LocationData,
    ReportSummary,
};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::H2SiteClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{AnalysisApi, AssetsApi, GeocodingApi, HealthApi, ReportsApi};
    pub use crate::error::{ApiError, ApiResult};
}
