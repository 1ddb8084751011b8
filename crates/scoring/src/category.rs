//! Asset categories as stored by the asset back-end.
//!
//! Labels are matched exactly, including the back-end's spelling quirks, so
//! records created through the dashboard keep scoring the same way.

use h2site_geo::{haversine_distance, Asset, GeoPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which sub-score a category contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Infrastructure,
    Environment,
    Economic,
}

/// Known asset categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    HydrogenPlants,
    HydrogenStorage,
    HydrogenDistributionHubs,
    Ports,
    AirportsRailwayStations,
    RenewableEnergyFarms,
    LandResidential,
    LandIndustrial,
    LandForest,
    WaterSources,
    DisasterResilientZone,
    DisasterProneZone,
    BiodiversityZone,
    RestrictedZone,
    SubsidyZone,
    IndustrialUrbanCluster,
}

impl AssetCategory {
    /// Every category, in back-end order.
    pub const ALL: [AssetCategory; 16] = [
        Self::HydrogenPlants,
        Self::HydrogenStorage,
        Self::HydrogenDistributionHubs,
        Self::Ports,
        Self::AirportsRailwayStations,
        Self::RenewableEnergyFarms,
        Self::LandResidential,
        Self::LandIndustrial,
        Self::LandForest,
        Self::WaterSources,
        Self::DisasterResilientZone,
        Self::DisasterProneZone,
        Self::BiodiversityZone,
        Self::RestrictedZone,
        Self::SubsidyZone,
        Self::IndustrialUrbanCluster,
    ];

    /// The label stored in asset records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HydrogenPlants => "Hydrogen Plants",
            Self::HydrogenStorage => {
                "Hydrogen Storage Facilities (tanks, underground storage, others)"
            }
            // Unbalanced parenthesis is how the back-end stores it.
            Self::HydrogenDistributionHubs => {
                "Hydrogen Distribution Hubs (refuelling stations, industrial hubs, others"
            }
            Self::Ports => "Ports (import/export potential)",
            Self::AirportsRailwayStations => "Airports/Railway Stations",
            Self::RenewableEnergyFarms => {
                "Renewable Energy Farms (solar, wind, hydro, biomass, others)"
            }
            Self::LandResidential => "Land Suitability - Residencial",
            Self::LandIndustrial => "Land Suitability - Industrial",
            Self::LandForest => "Land Suitability - Forest",
            Self::WaterSources => "Water Sources (rivers, reservoirs, groundwater, others)",
            Self::DisasterResilientZone => "Natural Disaster Resilient Zone",
            Self::DisasterProneZone => "Natural Disaster Prone Zone",
            Self::BiodiversityZone => "National Park / Biodiversity Zone",
            Self::RestrictedZone => "Restricted/Protected Zone",
            Self::SubsidyZone => "Subsidy / Incentive Zone",
            Self::IndustrialUrbanCluster => "Proximity to Industrial/Urban Cluster",
        }
    }

    /// Look up a category by its exact stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// The sub-score this category feeds.
    pub fn factor(&self) -> Factor {
        match self {
            Self::HydrogenPlants
            | Self::HydrogenStorage
            | Self::HydrogenDistributionHubs
            | Self::Ports
            | Self::AirportsRailwayStations
            | Self::RenewableEnergyFarms => Factor::Infrastructure,
            Self::SubsidyZone | Self::IndustrialUrbanCluster => Factor::Economic,
            _ => Factor::Environment,
        }
    }

    /// Category of an asset, if its type label is known.
    pub fn of(asset: &Asset) -> Option<Self> {
        Self::from_label(&asset.asset_type)
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Count and closest distance for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryStat {
    pub count: usize,
    pub closest_km: f64,
}

/// Per-category counts and closest distances within a radius.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTally {
    stats: HashMap<AssetCategory, CategoryStat>,
    radius_km: f64,
}

impl CategoryTally {
    /// Tally assets of `factor` within `radius_km` of `center` (inclusive).
    ///
    /// Assets with unknown categories or invalid coordinates are ignored.
    pub fn collect(center: GeoPoint, radius_km: f64, assets: &[Asset], factor: Factor) -> Self {
        let mut stats: HashMap<AssetCategory, CategoryStat> = HashMap::new();

        for asset in assets {
            let Some(category) = AssetCategory::of(asset).filter(|c| c.factor() == factor) else {
                continue;
            };
            if !asset.coordinates.is_valid() {
                continue;
            }
            let distance = haversine_distance(&center, &asset.coordinates);
            if distance > radius_km {
                continue;
            }
            stats
                .entry(category)
                .and_modify(|s| {
                    s.count += 1;
                    s.closest_km = s.closest_km.min(distance);
                })
                .or_insert(CategoryStat {
                    count: 1,
                    closest_km: distance,
                });
        }

        Self { stats, radius_km }
    }

    /// Number of assets in `category`.
    pub fn count(&self, category: AssetCategory) -> usize {
        self.stats.get(&category).map_or(0, |s| s.count)
    }

    /// `1 - closest/radius` for `category`: 1 at the center, 0 at the edge,
    /// `None` when the category has no assets in range.
    pub fn proximity(&self, category: AssetCategory) -> Option<f64> {
        self.stats
            .get(&category)
            .map(|s| 1.0 - s.closest_km / self.radius_km)
    }

    /// Total number of tallied assets.
    pub fn total(&self) -> usize {
        self.stats.values().map(|s| s.count).sum()
    }
}
