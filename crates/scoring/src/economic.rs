//! Economic and policy drivers score.

use crate::category::{AssetCategory, CategoryTally, Factor};
use h2site_geo::{haversine_distance, Asset, GeoPoint};
use serde::Serialize;

/// Capex at which the efficiency term starts to fall below 1.
const CAPEX_BASELINE: f64 = 200.0;
/// Opex at which the efficiency term starts to fall below 1.
const OPEX_BASELINE: f64 = 100.0;

/// Components of the economic score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EconomicBreakdown {
    /// Capex/opex efficiency of nearby clusters (0 to 0.35)
    pub capex_opex: f64,
    /// Subsidy zone count and proximity (0 to 0.35)
    pub regulatory: f64,
    /// Industrial/urban cluster count and proximity (0 to 0.30)
    pub cluster_proximity: f64,
}

impl EconomicBreakdown {
    /// Sum of the components, clamped to `[0, 1]`.
    pub fn total(&self) -> f64 {
        (self.capex_opex + self.regulatory + self.cluster_proximity).clamp(0.0, 1.0)
    }
}

/// Capex/opex efficiency from the estimates of nearby clusters.
///
/// Missing estimates count as 0. Lower averages score higher.
pub fn capex_opex_score(capex: &[f64], opex: &[f64]) -> f64 {
    if capex.is_empty() || opex.is_empty() {
        return 0.0;
    }
    let avg_capex = capex.iter().sum::<f64>() / capex.len() as f64;
    let avg_opex = opex.iter().sum::<f64>() / opex.len() as f64;

    let norm_capex = (CAPEX_BASELINE / (avg_capex + 1.0)).clamp(0.0, 1.0);
    let norm_opex = (OPEX_BASELINE / (avg_opex + 1.0)).clamp(0.0, 1.0);

    0.35 * ((norm_capex + norm_opex) / 2.0)
}

/// Economic breakdown for the site at `center`.
pub fn economic_breakdown(center: GeoPoint, radius_km: f64, assets: &[Asset]) -> EconomicBreakdown {
    let tally = CategoryTally::collect(center, radius_km, assets, Factor::Economic);

    let (capex, opex): (Vec<f64>, Vec<f64>) = assets
        .iter()
        .filter(|a| AssetCategory::of(a) == Some(AssetCategory::IndustrialUrbanCluster))
        .filter(|a| {
            a.coordinates.is_valid() && haversine_distance(&center, &a.coordinates) <= radius_km
        })
        .map(|a| {
            (
                a.attributes.capex_estimate.unwrap_or(0.0),
                a.attributes.opex_estimate.unwrap_or(0.0),
            )
        })
        .unzip();

    let subsidies = tally.count(AssetCategory::SubsidyZone) as f64;
    let regulatory = tally
        .proximity(AssetCategory::SubsidyZone)
        .map_or(0.0, |p| (subsidies * 0.2 + p * 0.15).min(0.35));

    let clusters = tally.count(AssetCategory::IndustrialUrbanCluster) as f64;
    let cluster_proximity = tally
        .proximity(AssetCategory::IndustrialUrbanCluster)
        .map_or(0.0, |p| (clusters * 0.1 + p * 0.2).min(0.30));

    let breakdown = EconomicBreakdown {
        capex_opex: capex_opex_score(&capex, &opex),
        regulatory,
        cluster_proximity,
    };
    tracing::debug!(assets = tally.total(), ?breakdown, "economic score");
    breakdown
}
