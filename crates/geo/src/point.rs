//! Point parsing for backend asset records.
//!
//! Supports parsing coordinates from:
//! - GeoJSON format: `{"type": "Point", "coordinates": [lng, lat]}`
//! - Bare coordinate arrays: `[lng, lat]`
//! - WKT format: `POINT(lng lat)`

use crate::{GeoError, GeoPoint, Result};
use serde::{Deserialize, Serialize};

/// GeoJSON Point format, as stored by the asset backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    /// Should be "Point"
    #[serde(rename = "type", default)]
    pub point_type: PointType,
    /// `[longitude, latitude]`
    pub coordinates: GeoPoint,
}

/// GeoJSON geometry type tag; only points are supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointType {
    #[default]
    Point,
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(coordinates: GeoPoint) -> Self {
        Self {
            point_type: PointType::Point,
            coordinates,
        }
    }
}

/// Parse a point from a JSON value.
///
/// # Returns
/// * `Some(GeoPoint)` if parsing succeeds
/// * `None` if the value is null or cannot be parsed
///
/// The point is not range-checked here; validation belongs to the caller.
///
/// # Example
/// ```
/// use h2site_geo::parse_point;
/// use serde_json::json;
///
/// let geojson = json!({"type": "Point", "coordinates": [72.5714, 23.0225]});
/// let point = parse_point(&geojson).unwrap();
/// assert!((point.latitude - 23.0225).abs() < 0.0001);
///
/// let wkt = json!("POINT(72.5714 23.0225)");
/// let point = parse_point(&wkt).unwrap();
/// assert!((point.longitude - 72.5714).abs() < 0.0001);
/// ```
pub fn parse_point(value: &serde_json::Value) -> Option<GeoPoint> {
    if value.is_null() {
        return None;
    }

    if let Some(coords) = value.get("coordinates").and_then(|c| c.as_array()) {
        return pair(coords);
    }

    if let Some(coords) = value.as_array() {
        return pair(coords);
    }

    if let Some(wkt) = value.as_str() {
        return parse_wkt_point(wkt).ok();
    }

    None
}

fn pair(coords: &[serde_json::Value]) -> Option<GeoPoint> {
    match coords {
        [lng, lat, ..] => Some(GeoPoint::new(lng.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

/// Parse a WKT POINT string.
///
/// Format: `POINT(longitude latitude)`
pub(crate) fn parse_wkt_point(wkt: &str) -> Result<GeoPoint> {
    let wkt = wkt.trim();

    if !wkt.starts_with("POINT(") && !wkt.starts_with("POINT (") {
        return Err(GeoError::InvalidWkt(format!("Expected POINT, got: {}", wkt)));
    }

    let start = wkt.find('(').ok_or_else(|| GeoError::InvalidWkt("Missing '('".into()))?;
    let end = wkt.find(')').ok_or_else(|| GeoError::InvalidWkt("Missing ')'".into()))?;

    if start >= end {
        return Err(GeoError::InvalidWkt("Invalid parentheses".into()));
    }

    let parts: Vec<&str> = wkt[start + 1..end].split_whitespace().collect();

    if parts.len() != 2 {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    }

    let lng: f64 = parts[0]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {}", parts[0])))?;
    let lat: f64 = parts[1]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {}", parts[1])))?;

    Ok(GeoPoint::new(lng, lat))
}
