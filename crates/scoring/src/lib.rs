//! Site scoring for hydrogen infrastructure siting.
//!
//! This crate provides:
//! - Infrastructure, environment and economic sub-scores computed from an
//!   asset catalogue around a candidate site
//! - Baseline and model aggregates, blended with user slider weights
//! - Exact matching of the back-end's asset category labels
//!
//! # Example
//!
//! ```
//! use h2site_geo::{Asset, GeoPoint};
//! use h2site_scoring::{SiteScorer, Weights};
//!
//! let catalogue = vec![Asset::new("p1", "Plant", "Hydrogen Plants", GeoPoint::new(72.58, 23.03))];
//! let scorer = SiteScorer::new(catalogue);
//!
//! let scores = scorer.score(GeoPoint::new(72.5714, 23.0225), 10.0, &Weights::equal()).unwrap();
//! assert!(scores.infrastructure > 0.0);
//! assert!(scores.user_preference <= 1.0);
//! ```

mod aggregate;
pub mod category;
mod economic;
mod environment;
mod error;
mod infrastructure;

pub use aggregate::{
    baseline_aggregate, slider_weighted_aggregate, AggregateModel, BaselineModel, FactorScores,
    Weights, DEFAULT_BLENDING_FACTOR,
};
pub use category::{AssetCategory, CategoryTally, Factor};
pub use economic::{capex_opex_score, economic_breakdown, EconomicBreakdown};
pub use environment::{environment_breakdown, EnvironmentBreakdown};
pub use error::{Result, ScoringError};
pub use infrastructure::{infrastructure_score, score_from_distances, DEFAULT_TOP_K};

use h2site_geo::{Asset, GeoPoint};
use serde::Serialize;

/// The six scores reported for a site, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteScores {
    pub infrastructure: f64,
    pub environment: f64,
    pub economic: f64,
    /// Unweighted mean of the three sub-scores
    pub average: f64,
    /// Output of the aggregate model
    pub model_aggregate: f64,
    /// Model aggregate blended with the slider weights
    pub user_preference: f64,
    /// Environment components
    pub environment_breakdown: EnvironmentBreakdown,
    /// Economic components
    pub economic_breakdown: EconomicBreakdown,
}

impl SiteScores {
    /// The three sub-scores.
    pub fn factors(&self) -> FactorScores {
        FactorScores {
            infrastructure: self.infrastructure,
            environment: self.environment,
            economic: self.economic,
        }
    }
}

/// Scores candidate sites against an asset catalogue.
pub struct SiteScorer {
    assets: Vec<Asset>,
    model: Box<dyn AggregateModel>,
    top_k: usize,
    blending_factor: f64,
}

impl std::fmt::Debug for SiteScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteScorer")
            .field("assets", &self.assets.len())
            .field("model", &self.model.name())
            .field("top_k", &self.top_k)
            .field("blending_factor", &self.blending_factor)
            .finish()
    }
}

impl SiteScorer {
    /// Scorer with the baseline model and default parameters.
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets,
            model: Box::new(BaselineModel),
            top_k: DEFAULT_TOP_K,
            blending_factor: DEFAULT_BLENDING_FACTOR,
        }
    }

    /// Use a different aggregate model.
    #[must_use]
    pub fn with_model(mut self, model: impl AggregateModel + 'static) -> Self {
        self.model = Box::new(model);
        self
    }

    /// Number of nearest infrastructure assets considered.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Share of the model aggregate in the user-preference score.
    pub fn with_blending_factor(mut self, blending_factor: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&blending_factor) {
            return Err(ScoringError::InvalidBlendingFactor(blending_factor.to_string()));
        }
        self.blending_factor = blending_factor;
        Ok(self)
    }

    /// Name of the aggregate model in use.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Score the site at `center` within `radius_km`.
    pub fn score(&self, center: GeoPoint, radius_km: f64, weights: &Weights) -> Result<SiteScores> {
        center.validate()?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ScoringError::InvalidRadius(format!(
                "{} km; must be finite and greater than zero",
                radius_km
            )));
        }
        weights.validate()?;

        let infrastructure = infrastructure_score(center, radius_km, &self.assets, self.top_k);
        let environment_breakdown = environment_breakdown(center, radius_km, &self.assets);
        let economic_breakdown = economic_breakdown(center, radius_km, &self.assets);

        let factors = FactorScores {
            infrastructure,
            environment: environment_breakdown.total(),
            economic: economic_breakdown.total(),
        };
        let model_aggregate = self.model.predict(&factors);
        let user_preference =
            slider_weighted_aggregate(model_aggregate, &factors, weights, self.blending_factor)?;

        tracing::info!(
            center = %center,
            radius_km,
            model = self.model.name(),
            user_preference,
            "scored site"
        );

        Ok(SiteScores {
            infrastructure: factors.infrastructure,
            environment: factors.environment,
            economic: factors.economic,
            average: baseline_aggregate(&factors),
            model_aggregate,
            user_preference,
            environment_breakdown,
            economic_breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BENGALURU: GeoPoint = GeoPoint::new(77.5946, 12.9716);

    fn catalogue() -> Vec<Asset> {
        let water = AssetCategory::WaterSources.label();
        let subsidy = AssetCategory::SubsidyZone.label();
        vec![
            Asset::new("p1", "Plant 1", "Hydrogen Plants", GeoPoint::new(77.5946, 12.9712)),
            Asset::new("p2", "Plant 2", "Hydrogen Plants", GeoPoint::new(77.6000, 12.9800)),
            Asset::new("p3", "Plant 3", "Hydrogen Plants", GeoPoint::new(77.5700, 12.9600)),
            Asset::new("w1", "Lake", water, GeoPoint::new(77.5947, 12.9713)),
            Asset::new("s1", "Zone", subsidy, GeoPoint::new(77.5940, 12.9710)),
            Asset::new("x1", "Unknown", "Electrolyzer Facility", GeoPoint::new(77.5946, 12.9716)),
        ]
    }

    struct Fixed(f64);

    impl AggregateModel for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, _scores: &FactorScores) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_scores_in_unit_range() {
        let scores = SiteScorer::new(catalogue())
            .score(BENGALURU, 10.0, &Weights::equal())
            .unwrap();

        for s in [
            scores.infrastructure,
            scores.environment,
            scores.economic,
            scores.average,
            scores.model_aggregate,
            scores.user_preference,
        ] {
            assert!((0.0..=1.0).contains(&s), "score out of range: {s}");
        }
        assert!(scores.infrastructure >= 0.55);
        assert!(scores.economic > 0.0);
        assert!((scores.average - baseline_aggregate(&scores.factors())).abs() < 1e-12);
    }

    #[test]
    fn test_baseline_model_equals_average() {
        let scores = SiteScorer::new(catalogue())
            .score(BENGALURU, 10.0, &Weights::equal())
            .unwrap();
        assert!((scores.model_aggregate - scores.average).abs() < 1e-12);
        // Equal weights blend the mean with itself
        assert!((scores.user_preference - scores.average).abs() < 1e-12);
    }

    #[test]
    fn test_custom_model() {
        let scorer = SiteScorer::new(catalogue()).with_model(Fixed(1.0));
        assert_eq!(scorer.model_name(), "fixed");

        let scores = scorer.score(BENGALURU, 10.0, &Weights::equal()).unwrap();
        assert_eq!(scores.model_aggregate, 1.0);
        let expected = 0.7 + 0.3 * scores.average;
        assert!((scores.user_preference - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_catalogue_scores_zero() {
        let scores = SiteScorer::new(Vec::new())
            .score(BENGALURU, 25.0, &Weights::equal())
            .unwrap();
        assert_eq!(scores.user_preference, 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let scorer = SiteScorer::new(catalogue());
        assert!(matches!(
            scorer.score(BENGALURU, 0.0, &Weights::equal()),
            Err(ScoringError::InvalidRadius(_))
        ));
        assert!(matches!(
            scorer.score(BENGALURU, f64::NAN, &Weights::equal()),
            Err(ScoringError::InvalidRadius(_))
        ));
        assert!(matches!(
            scorer.score(GeoPoint::new(0.0, 95.0), 10.0, &Weights::equal()),
            Err(ScoringError::Geo(_))
        ));
        assert!(SiteScorer::new(Vec::new()).with_blending_factor(-0.1).is_err());
    }
}
