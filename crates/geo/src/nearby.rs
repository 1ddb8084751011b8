//! Nearest-asset queries.
//!
//! Site scoring looks at the assets around a candidate site closest first,
//! optionally capped to the `k` nearest. Unlike [`crate::classify`], results
//! here are sorted by distance.

use crate::{haversine_distance, GeoPoint};
use std::cmp::Ordering;

/// An item within the search radius, paired with its distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyAsset<'a, T> {
    /// The matched item
    pub item: &'a T,
    /// Distance from the center in kilometers
    pub distance_km: f64,
}

/// Finds items within `radius_km` of `center`, closest first.
///
/// `locate` extracts each item's position; items it returns `None` for, or
/// whose position is invalid, are ignored.
///
/// # Arguments
/// * `center` - Search center
/// * `radius_km` - Maximum distance in kilometers (inclusive)
/// * `items` - Candidate items
/// * `top_k` - Maximum number of results to return (None for all)
/// * `locate` - Position accessor
///
/// # Example
/// ```
/// use h2site_geo::{nearby, GeoPoint};
///
/// let center = GeoPoint::new(77.5946, 12.9716);
/// let sites = vec![GeoPoint::new(77.62, 12.99), GeoPoint::new(77.5945, 12.9712)];
///
/// let found = nearby(center, 5.0, &sites, None, |p| Some(*p));
/// assert_eq!(found.len(), 2);
/// assert_eq!(*found[0].item, sites[1]);
/// ```
pub fn nearby<'a, T, F>(
    center: GeoPoint,
    radius_km: f64,
    items: &'a [T],
    top_k: Option<usize>,
    locate: F,
) -> Vec<NearbyAsset<'a, T>>
where
    F: Fn(&T) -> Option<GeoPoint>,
{
    let mut results: Vec<NearbyAsset<'a, T>> = items
        .iter()
        .filter_map(|item| {
            let position = locate(item).filter(GeoPoint::is_valid)?;
            let distance_km = haversine_distance(&center, &position);
            (distance_km <= radius_km).then_some(NearbyAsset { item, distance_km })
        })
        .collect();

    // Stable sort keeps input order among equal distances.
    results.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });

    if let Some(max) = top_k {
        results.truncate(max);
    }

    results
}
