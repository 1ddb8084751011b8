//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes. Distances shown next to
//! assets and radius legends come from here, so the formula is fixed:
//! `d = 2R·asin(√(sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)))`.

use crate::GeoPoint;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two points in kilometers.
///
/// # Example
/// ```
/// use h2site_geo::{haversine_distance, GeoPoint};
///
/// let ahmedabad = GeoPoint::new(72.5714, 23.0225);
/// let gandhinagar = GeoPoint::new(72.6369, 23.2156);
///
/// let distance = haversine_distance(&ahmedabad, &gandhinagar);
/// assert!((distance - 22.5).abs() < 1.0);
/// ```
#[inline]
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two points in meters.
#[inline]
pub fn haversine_distance_meters(from: &GeoPoint, to: &GeoPoint) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &GeoPoint, to: &GeoPoint, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points.
    2.0 * radius * a.sqrt().min(1.0).asin()
}

/// Fast approximate distance for filtering (uses equirectangular projection).
///
/// This is faster than Haversine but less accurate over long distances.
/// Use for quick radius filtering before applying Haversine for exact distances.
#[inline]
pub fn approximate_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let x = (lon2 - lon1) * ((lat1 + lat2) / 2.0).cos();
    let y = lat2 - lat1;

    (x * x + y * y).sqrt() * EARTH_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::*;

    const AHMEDABAD: GeoPoint = GeoPoint::new(72.5714, 23.0225);
    const GANDHINAGAR: GeoPoint = GeoPoint::new(72.6369, 23.2156);
    const NEW_YORK: GeoPoint = GeoPoint::new(-74.0060, 40.7128);
    const BERLIN: GeoPoint = GeoPoint::new(13.4050, 52.5200);
    const PARIS: GeoPoint = GeoPoint::new(2.3522, 48.8566);

    #[test]
    fn test_ahmedabad_to_gandhinagar() {
        let distance = haversine_distance(&AHMEDABAD, &GANDHINAGAR);
        assert!(distance > 20.0 && distance < 25.0, "Ahmedabad-Gandhinagar: {}", distance);
    }

    #[test]
    fn test_berlin_to_paris() {
        let distance = haversine_distance(&BERLIN, &PARIS);
        // Expected: ~878 km
        assert!((distance - 878.0).abs() < 5.0, "Berlin-Paris: {}", distance);
    }

    #[test]
    fn test_india_to_new_york() {
        let distance = haversine_distance(&AHMEDABAD, &NEW_YORK);
        assert!(distance > 12_000.0, "Ahmedabad-NYC: {}", distance);
    }

    #[test]
    fn test_same_point_is_exactly_zero() {
        assert_eq!(haversine_distance(&AHMEDABAD, &AHMEDABAD), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let d1 = haversine_distance(&BERLIN, &PARIS);
        let d2 = haversine_distance(&PARIS, &BERLIN);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_antipodal_points_are_half_circumference() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(180.0, 0.0);
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((haversine_distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_meters_conversion() {
        let km = haversine_distance(&BERLIN, &PARIS);
        let meters = haversine_distance_meters(&BERLIN, &PARIS);
        assert!((meters - km * 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_approximate_distance_reasonable() {
        let exact = haversine_distance(&AHMEDABAD, &GANDHINAGAR);
        let approx = approximate_distance(&AHMEDABAD, &GANDHINAGAR);
        let error = ((approx - exact) / exact).abs();
        assert!(error < 0.01, "Error: {}%", error * 100.0);
    }
}
