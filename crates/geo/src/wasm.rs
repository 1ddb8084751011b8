//! WASM bindings for the geo crate.
//!
//! These bindings let the dashboard call the classifier from
//! JavaScript/TypeScript with plain JSON strings.

use crate::{classify, haversine_distance, nearby, parse_point, Asset, GeoPoint};
use wasm_bindgen::prelude::*;

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {err}"))
}

/// Distance in kilometers between two `[lng, lat]` points.
#[wasm_bindgen]
pub fn distance(lng1: f64, lat1: f64, lng2: f64, lat2: f64) -> f64 {
    haversine_distance(&GeoPoint::new(lng1, lat1), &GeoPoint::new(lng2, lat2))
}

/// Classify assets into primary/secondary rings around a center.
///
/// # Arguments
/// * `center_lng` - Center longitude
/// * `center_lat` - Center latitude
/// * `primary_radius_km` - User-selected radius
/// * `secondary_radius_km` - Context radius (assets beyond it are dropped)
/// * `assets_json` - JSON array of assets (`id`, `name`, `type`, `coordinates`)
///
/// # Returns
/// JSON array of assets with added `distance` and `isPrimary` fields
#[wasm_bindgen(js_name = getAssetsInDualRadius)]
pub fn get_assets_in_dual_radius(
    center_lng: f64,
    center_lat: f64,
    primary_radius_km: f64,
    secondary_radius_km: f64,
    assets_json: &str,
) -> Result<String, JsValue> {
    let assets: Vec<Asset> =
        serde_json::from_str(assets_json).map_err(|e| js_error("JSON parse error", e))?;

    let classified = classify(
        GeoPoint::new(center_lng, center_lat),
        primary_radius_km,
        secondary_radius_km,
        &assets,
    )
    .map_err(|e| js_error("Classification error", e))?;

    serde_json::to_string(&classified).map_err(|e| js_error("JSON serialize error", e))
}

/// IDs and distances of assets within a radius, closest first.
///
/// `max_results` of 0 returns all matches.
#[wasm_bindgen(js_name = nearbyAssets)]
pub fn nearby_assets(
    center_lng: f64,
    center_lat: f64,
    radius_km: f64,
    assets_json: &str,
    max_results: u32,
) -> Result<String, JsValue> {
    let assets: Vec<Asset> =
        serde_json::from_str(assets_json).map_err(|e| js_error("JSON parse error", e))?;

    let top_k = (max_results > 0).then_some(max_results as usize);
    let results: Vec<serde_json::Value> = nearby(
        GeoPoint::new(center_lng, center_lat),
        radius_km,
        &assets,
        top_k,
        |a| Some(a.coordinates),
    )
    .into_iter()
    .map(|n| serde_json::json!({ "id": n.item.id, "distance": n.distance_km }))
    .collect();

    serde_json::to_string(&results).map_err(|e| js_error("JSON serialize error", e))
}

/// Parse a GeoJSON/WKT location and return `[lng, lat]`, or `null`.
#[wasm_bindgen(js_name = parseLocation)]
pub fn parse_location(location_json: &str) -> Result<String, JsValue> {
    let value: serde_json::Value =
        serde_json::from_str(location_json).map_err(|e| js_error("JSON parse error", e))?;

    match parse_point(&value) {
        Some(point) => {
            serde_json::to_string(&point).map_err(|e| js_error("JSON serialize error", e))
        }
        None => Ok("null".to_string()),
    }
}
