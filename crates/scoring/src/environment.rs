//! Environmental and land factors score.

use crate::category::{AssetCategory, CategoryTally, Factor};
use h2site_geo::{Asset, GeoPoint};
use serde::Serialize;

/// Components of the environment score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnvironmentBreakdown {
    /// Industrial land bonus less residential and forest penalties (0 to 0.3)
    pub land_suitability: f64,
    /// Penalty for nearby restricted zones (0 to 0.2)
    pub zoning_penalty: f64,
    /// Water source count and proximity (0 to 0.2)
    pub water_availability: f64,
    /// Resilient-zone bonus less disaster-prone proximity (0 to 0.15)
    pub climate_resilience: f64,
    /// Penalty for nearby national parks and biodiversity zones (0 to 0.15)
    pub biodiversity_penalty: f64,
}

impl EnvironmentBreakdown {
    /// Derive the components from a tally of environment assets.
    pub fn from_tally(tally: &CategoryTally) -> Self {
        let industrial = tally.count(AssetCategory::LandIndustrial) as f64;
        let residential = tally.count(AssetCategory::LandResidential) as f64;
        let forest = tally.count(AssetCategory::LandForest) as f64;
        let land_suitability =
            ((industrial * 0.15).min(0.3) - residential * 0.02 - forest * 0.08).max(0.0);

        let zoning_penalty = tally
            .proximity(AssetCategory::RestrictedZone)
            .map_or(0.0, |p| p * 0.2);

        let water_count = tally.count(AssetCategory::WaterSources) as f64;
        let water_availability = tally
            .proximity(AssetCategory::WaterSources)
            .map_or(0.0, |p| (water_count * 0.1 + p * 0.1).min(0.2));

        let resilient = tally.count(AssetCategory::DisasterResilientZone) as f64;
        let prone_penalty = tally
            .proximity(AssetCategory::DisasterProneZone)
            .map_or(0.0, |p| p * 0.1);
        let climate_resilience = ((resilient * 0.08).min(0.15) - prone_penalty).max(0.0);

        let biodiversity_penalty = tally
            .proximity(AssetCategory::BiodiversityZone)
            .map_or(0.0, |p| p * 0.15);

        Self {
            land_suitability,
            zoning_penalty,
            water_availability,
            climate_resilience,
            biodiversity_penalty,
        }
    }

    /// Bonuses minus penalties, clamped to `[0, 1]`.
    pub fn total(&self) -> f64 {
        (self.land_suitability + self.water_availability + self.climate_resilience
            - self.zoning_penalty
            - self.biodiversity_penalty)
            .clamp(0.0, 1.0)
    }
}

/// Environment breakdown for the site at `center`.
pub fn environment_breakdown(
    center: GeoPoint,
    radius_km: f64,
    assets: &[Asset],
) -> EnvironmentBreakdown {
    let tally = CategoryTally::collect(center, radius_km, assets, Factor::Environment);
    let breakdown = EnvironmentBreakdown::from_tally(&tally);
    tracing::debug!(assets = tally.total(), ?breakdown, "environment score");
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: GeoPoint = GeoPoint::new(77.5946, 12.9716);

    fn at(category: AssetCategory, lon: f64, lat: f64) -> Asset {
        Asset::new(category.label(), category.label(), category.label(), GeoPoint::new(lon, lat))
    }

    #[test]
    fn test_empty_scores_zero() {
        let breakdown = environment_breakdown(CENTER, 10.0, &[]);
        assert_eq!(breakdown, EnvironmentBreakdown::default());
        assert_eq!(breakdown.total(), 0.0);
    }

    #[test]
    fn test_land_suitability() {
        let assets = vec![
            at(AssetCategory::LandIndustrial, 77.5946, 12.9712),
            at(AssetCategory::LandIndustrial, 77.6000, 12.9800),
            at(AssetCategory::LandIndustrial, 77.5800, 12.9650),
            at(AssetCategory::LandResidential, 77.5900, 12.9750),
        ];
        let breakdown = environment_breakdown(CENTER, 10.0, &assets);
        assert!((breakdown.land_suitability - 0.28).abs() < 1e-12);
    }

    #[test]
    fn test_forest_floors_at_zero() {
        let assets = vec![
            at(AssetCategory::LandIndustrial, 77.5946, 12.9712),
            at(AssetCategory::LandForest, 77.6000, 12.9800),
            at(AssetCategory::LandForest, 77.5800, 12.9650),
        ];
        let breakdown = environment_breakdown(CENTER, 10.0, &assets);
        assert_eq!(breakdown.land_suitability, 0.0);
    }

    #[test]
    fn test_water_capped() {
        let assets = vec![
            at(AssetCategory::WaterSources, 77.5947, 12.9713),
            at(AssetCategory::WaterSources, 77.5980, 12.9780),
        ];
        let breakdown = environment_breakdown(CENTER, 10.0, &assets);
        assert!((breakdown.water_availability - 0.2).abs() < 1e-12);
        assert!((breakdown.total() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_penalties_clamp_total() {
        let assets = vec![
            at(AssetCategory::RestrictedZone, 77.5946, 12.9716),
            at(AssetCategory::BiodiversityZone, 77.5946, 12.9716),
        ];
        let breakdown = environment_breakdown(CENTER, 10.0, &assets);
        assert!((breakdown.zoning_penalty - 0.2).abs() < 1e-12);
        assert!((breakdown.biodiversity_penalty - 0.15).abs() < 1e-12);
        assert_eq!(breakdown.total(), 0.0);
    }

    #[test]
    fn test_prone_zone_cancels_resilience() {
        let assets = vec![
            at(AssetCategory::DisasterResilientZone, 77.6025, 12.9840),
            at(AssetCategory::DisasterProneZone, 77.5946, 12.9716),
        ];
        let breakdown = environment_breakdown(CENTER, 10.0, &assets);
        assert_eq!(breakdown.climate_resilience, 0.0);
    }
}
