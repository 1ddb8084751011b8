//! Combining the three sub-scores.
//!
//! The hosted recommendation model sits behind [`AggregateModel`]; the
//! user-preference score blends its output with the slider weights.

use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};

/// Default share of the model aggregate in the user-preference score.
pub const DEFAULT_BLENDING_FACTOR: f64 = 0.7;

/// The three sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub infrastructure: f64,
    pub environment: f64,
    pub economic: f64,
}

/// User slider weights for the three factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub infrastructure: f64,
    pub environment: f64,
    pub economic: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self::equal()
    }
}

impl Weights {
    /// All three weights at 1.
    pub const fn equal() -> Self {
        Self {
            infrastructure: 1.0,
            environment: 1.0,
            economic: 1.0,
        }
    }

    /// Reject negative or non-finite weights.
    pub fn validate(&self) -> Result<()> {
        let values = [self.infrastructure, self.environment, self.economic];
        if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ScoringError::InvalidWeights(format!(
                "infrastructure={}, environment={}, economic={}",
                self.infrastructure, self.environment, self.economic
            )));
        }
        Ok(())
    }

    /// Weights scaled to sum to 1. An all-zero set is left as is.
    pub fn normalized(&self) -> Self {
        let mut sum = self.infrastructure + self.environment + self.economic;
        if sum == 0.0 {
            sum = 1.0;
        }
        Self {
            infrastructure: self.infrastructure / sum,
            environment: self.environment / sum,
            economic: self.economic / sum,
        }
    }
}

/// A model that maps the three sub-scores to a recommendation score.
pub trait AggregateModel: Send + Sync {
    /// Short identifier shown in reports.
    fn name(&self) -> &str;

    /// Recommendation score for `scores`.
    fn predict(&self, scores: &FactorScores) -> f64;
}

/// Unweighted mean of the three sub-scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineModel;

impl AggregateModel for BaselineModel {
    fn name(&self) -> &str {
        "baseline"
    }

    fn predict(&self, scores: &FactorScores) -> f64 {
        baseline_aggregate(scores)
    }
}

/// Mean of the three sub-scores.
pub fn baseline_aggregate(scores: &FactorScores) -> f64 {
    (scores.infrastructure + scores.environment + scores.economic) / 3.0
}

/// Blend the model aggregate with the slider-weighted sub-scores.
///
/// `blending_factor * model + (1 - blending_factor) * Σ(ŵ·s)` with the
/// weights normalized to sum to 1.
pub fn slider_weighted_aggregate(
    model_score: f64,
    scores: &FactorScores,
    weights: &Weights,
    blending_factor: f64,
) -> Result<f64> {
    if !(0.0..=1.0).contains(&blending_factor) {
        return Err(ScoringError::InvalidBlendingFactor(blending_factor.to_string()));
    }
    weights.validate()?;

    let w = weights.normalized();
    let weighted = w.infrastructure * scores.infrastructure
        + w.environment * scores.environment
        + w.economic * scores.economic;

    Ok(blending_factor * model_score + (1.0 - blending_factor) * weighted)
}
