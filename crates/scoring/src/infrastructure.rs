//! Infrastructure and proximity score.

use crate::category::{AssetCategory, Factor};
use h2site_geo::{nearby, Asset, GeoPoint};

/// Nearest infrastructure assets considered by default.
pub const DEFAULT_TOP_K: usize = 15;

/// Score in `[0, 1]` from the distances of the nearest infrastructure assets.
///
/// Each asset weighs `exp(-d / (0.5 * radius))`. One asset caps the score at
/// 0.3, two land in `[0.4, 0.6]`, three or more in `[0.55, 1.0]`.
pub fn score_from_distances(distances_km: &[f64], radius_km: f64) -> f64 {
    let total: f64 = distances_km
        .iter()
        .map(|d| (-d / (radius_km * 0.5)).exp())
        .sum();

    match distances_km.len() {
        0 => 0.0,
        1 => (total * 0.3).min(0.3),
        2 => 0.4 + 0.2 * (total / 2.0),
        n => 0.55 + 0.45 * (total / n as f64).min(1.0),
    }
}

/// Infrastructure score around `center`, from up to `top_k` nearest assets.
pub fn infrastructure_score(
    center: GeoPoint,
    radius_km: f64,
    assets: &[Asset],
    top_k: usize,
) -> f64 {
    let found = nearby(center, radius_km, assets, Some(top_k), |asset| {
        AssetCategory::of(asset)
            .filter(|c| c.factor() == Factor::Infrastructure)
            .map(|_| asset.coordinates)
    });

    let distances: Vec<f64> = found.iter().map(|n| n.distance_km).collect();
    let score = score_from_distances(&distances, radius_km);
    tracing::debug!(assets = distances.len(), score, "infrastructure score");
    score
}
