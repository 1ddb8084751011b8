//! Geospatial core for hydrogen site exploration.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Dual-radius classification of point assets (primary / secondary rings)
//! - Nearest-asset queries within a radius
//! - GeoJSON and WKT point parsing for backend records
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use h2site_geo::{classify, Asset, GeoPoint};
//!
//! let ahmedabad = GeoPoint::new(72.5714, 23.0225);
//! let assets = vec![Asset::new("ahd-2", "Gandhinagar Hydrogen Station", "Hydrogen Refueling Station",
//!     GeoPoint::new(72.6369, 23.2156))];
//!
//! let classified = classify(ahmedabad, 10.0, 100.0, &assets).unwrap();
//! assert_eq!(classified.len(), 1);
//! assert!(!classified[0].is_primary);
//! ```

mod asset;
mod error;
pub mod filter;
mod haversine;
pub mod nearby;
mod point;

#[cfg(feature = "wasm")]
mod wasm;

pub use asset::{Asset, AssetAttributes, ClassifiedAsset};
pub use error::{GeoError, GeoErrorCode, Result};
pub use filter::{classify, Classification, DualRadiusFilter, InvalidAssetPolicy, RejectedAsset};
pub use haversine::{
    approximate_distance, haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM,
    EARTH_RADIUS_M,
};
pub use nearby::{nearby, NearbyAsset};
pub use point::{parse_point, GeoJsonPoint, PointType};

/// Default context radius (km) beyond which assets are not shown at all.
pub const DEFAULT_SECONDARY_RADIUS_KM: f64 = 100.0;

/// A geographic point, longitude first (WGS84 degrees).
///
/// Serialized as a `[longitude, latitude]` array, the same order GeoJSON uses.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a new point.
    ///
    /// # Arguments
    /// * `longitude` - Longitude in degrees (-180 to 180)
    /// * `latitude` - Latitude in degrees (-90 to 90)
    #[inline]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Returns true if both components are finite and in range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Checks the point, returning `InvalidCoordinate` with the offending values.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "[{}, {}] is outside lon [-180, 180] / lat [-90, 90]",
                self.longitude, self.latitude
            )))
        }
    }

    /// Converts degrees to radians for internal calculations, as `(lat, lon)`.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.longitude, point.latitude]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let point = GeoPoint::new(72.5714, 23.0225);
        assert_eq!(point.longitude, 72.5714);
        assert_eq!(point.latitude, 23.0225);
    }

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(0.0, 0.0).is_valid());
        assert!(GeoPoint::new(180.0, 90.0).is_valid());
        assert!(GeoPoint::new(-180.0, -90.0).is_valid());
        assert!(!GeoPoint::new(0.0, 91.0).is_valid());
        assert!(!GeoPoint::new(181.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_validate_reports_invalid_coordinate() {
        let err = GeoPoint::new(200.0, 0.0).validate().unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_serde_longitude_first() {
        let point: GeoPoint = serde_json::from_str("[72.5714, 23.0225]").unwrap();
        assert_eq!(point.longitude, 72.5714);
        assert_eq!(point.latitude, 23.0225);
        assert_eq!(serde_json::to_string(&point).unwrap(), "[72.5714,23.0225]");
    }

    #[test]
    fn test_display_is_lat_lon() {
        assert_eq!(GeoPoint::new(72.5714, 23.0225).to_string(), "23.0225, 72.5714");
    }
}
