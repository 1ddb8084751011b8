//! Configuration schema definitions
//!
//! Every field has a default, so an empty or partial `h2site.toml` is valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub explore: ExploreConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        self.explore.validate()?;
        self.scoring.validate()?;
        Ok(())
    }
}

/// Site exploration defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExploreConfig {
    /// Analysis radius preselected in the radius picker (km)
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Context radius; assets beyond it are not shown (km)
    #[serde(default = "default_secondary_radius_km")]
    pub secondary_radius_km: f64,

    /// Radii offered to the user (km)
    #[serde(default = "default_radius_options")]
    pub radius_options: Vec<f64>,

    /// Fallback center `[lon, lat]` when no location has been chosen
    #[serde(default = "default_center")]
    pub default_center: [f64; 2],
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            secondary_radius_km: default_secondary_radius_km(),
            radius_options: default_radius_options(),
            default_center: default_center(),
        }
    }
}

impl ExploreConfig {
    fn validate(&self) -> Result<()> {
        let radii = std::iter::once(self.default_radius_km)
            .chain(std::iter::once(self.secondary_radius_km))
            .chain(self.radius_options.iter().copied());

        for radius in radii {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(Error::invalid_config(format!(
                    "explore: radius {} must be a positive number of kilometers",
                    radius
                )));
            }
        }

        if self.secondary_radius_km < self.default_radius_km {
            return Err(Error::invalid_config(format!(
                "explore.secondary_radius_km ({}) is smaller than default_radius_km ({})",
                self.secondary_radius_km, self.default_radius_km
            )));
        }

        Ok(())
    }
}

fn default_radius_km() -> f64 {
    10.0
}

fn default_secondary_radius_km() -> f64 {
    100.0
}

fn default_radius_options() -> Vec<f64> {
    vec![5.0, 10.0, 25.0, 50.0]
}

fn default_center() -> [f64; 2] {
    // Ahmedabad
    [72.5714, 23.0225]
}

/// Site scoring defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Weight of the model aggregate in the user-preference score (0..=1)
    #[serde(default = "default_blending_factor")]
    pub blending_factor: f64,

    /// Nearest infrastructure assets considered per site
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Default slider weights
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            blending_factor: default_blending_factor(),
            top_k: default_top_k(),
            weights: WeightsConfig::default(),
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.blending_factor) {
            return Err(Error::invalid_config(format!(
                "scoring.blending_factor ({}) must be between 0 and 1",
                self.blending_factor
            )));
        }
        if self.top_k == 0 {
            return Err(Error::invalid_config("scoring.top_k must be at least 1"));
        }
        let w = &self.weights;
        if [w.infrastructure, w.environment, w.economic]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(Error::invalid_config(
                "scoring.weights must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

fn default_blending_factor() -> f64 {
    0.7
}

fn default_top_k() -> usize {
    15
}

/// Slider weights for the three sub-scores
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeightsConfig {
    #[serde(default = "default_weight")]
    pub infrastructure: f64,
    #[serde(default = "default_weight")]
    pub environment: f64,
    #[serde(default = "default_weight")]
    pub economic: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            infrastructure: default_weight(),
            environment: default_weight(),
            economic: default_weight(),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,

    /// Directory for daily-rolling log files; stderr only when unset
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            directory: None,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.explore.default_radius_km, 10.0);
        assert_eq!(schema.explore.secondary_radius_km, 100.0);
        assert_eq!(schema.scoring.blending_factor, 0.7);
        assert_eq!(schema.scoring.top_k, 15);
        assert_eq!(schema.scoring.weights.economic, 1.0);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [explore]
            default_radius_km = 25.0

            [scoring.weights]
            economic = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(schema.explore.default_radius_km, 25.0);
        assert_eq!(schema.explore.secondary_radius_km, 100.0);
        assert_eq!(schema.scoring.weights.economic, 2.0);
        assert_eq!(schema.scoring.weights.infrastructure, 1.0);
        assert_eq!(schema.logging.level, "warn");
    }

    #[test]
    fn test_validate_rejects_bad_blending_factor() {
        let mut schema = ConfigSchema::default();
        schema.scoring.blending_factor = 1.5;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_radius() {
        let mut schema = ConfigSchema::default();
        schema.explore.radius_options.push(-5.0);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_radii() {
        let mut schema = ConfigSchema::default();
        schema.explore.secondary_radius_km = 5.0;
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigValidationError);
    }
}
