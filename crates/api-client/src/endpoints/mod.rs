//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a specific set of upstream endpoints.
//!
//! | Module | Upstream | Description |
//! |--------|----------|-------------|
//! | `assets` | `api/v3/assets/` | Asset catalogue CRUD |
//! | `analysis` | `analyse` | Site scoring and AI summary |
//! | `reports` | `reports`, `reports/save`, `reports/saved` | Saved reports and comparison |
//! | `geocoding` | `mapbox.places` | Forward and reverse geocoding |
//! | `health` | `health` | Back-end liveness |

pub mod analysis;
pub mod assets;
pub mod geocoding;
pub mod health;
pub mod reports;

pub use analysis::{AnalysisApi, AnalysisRequest};
pub use assets::{AssetDraft, AssetRecord, AssetsApi};
pub use geocoding::{GeocodingApi, LocationData, FALLBACK_LOCATION_NAME};
pub use health::{HealthApi, HealthResponse};
pub use reports::{CompareRequest, CompareResponse, ReportSummary, ReportsApi, SaveReportRequest};
