//! The analysis back-end's response and its normalized score card.
//!
//! The back-end transports scores as strings (`"0.8123"`), sometimes as
//! numbers. Both are coerced to `f64` once, at deserialization; anything
//! unparseable becomes 0.

use crate::error::Result;
use crate::narrative::{segment_summary, NarrativeSummary};
use serde::{Deserialize, Deserializer, Serialize};

/// Response of the `analyse` endpoint, with scores normalized to `f64`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default, deserialize_with = "de::number_or_string")]
    pub s_infra: f64,
    #[serde(default, deserialize_with = "de::number_or_string")]
    pub s_env: f64,
    #[serde(default, deserialize_with = "de::number_or_string")]
    pub s_econ: f64,
    #[serde(default, deserialize_with = "de::number_or_string")]
    pub s_avg: f64,
    #[serde(default, deserialize_with = "de::number_or_string")]
    pub s_xgboost_aggregate: f64,
    #[serde(default, deserialize_with = "de::number_or_string")]
    pub s_user_custom_pref: f64,
    #[serde(default)]
    pub ai_summary: String,
}

impl AnalysisResponse {
    /// Parse a response body or a saved report message.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Scores as rounded percentages.
    pub fn score_card(&self) -> ScoreCard {
        ScoreCard {
            infrastructure: percent(self.s_infra),
            environmental: percent(self.s_env),
            economic: percent(self.s_econ),
            average: percent(self.s_avg),
            model_aggregate: percent(self.s_xgboost_aggregate),
            user_preference: percent(self.s_user_custom_pref),
        }
    }

    /// The AI summary split into display sections.
    pub fn narrative(&self) -> NarrativeSummary {
        segment_summary(&self.ai_summary)
    }
}

/// Score in `[0, 1]` as a whole percentage, rounding halves up.
pub fn percent(score: f64) -> i64 {
    (score * 100.0 + 0.5).floor() as i64
}

/// The six scores as whole percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub infrastructure: i64,
    pub environmental: i64,
    pub economic: i64,
    pub average: i64,
    pub model_aggregate: i64,
    pub user_preference: i64,
}

impl ScoreCard {
    /// `(label, percent)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, i64); 6] {
        [
            ("Infrastructure", self.infrastructure),
            ("Environmental", self.environmental),
            ("Economic", self.economic),
            ("Average", self.average),
            ("Model Aggregate", self.model_aggregate),
            ("User Preference", self.user_preference),
        ]
    }
}

/// Qualitative band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    /// Band for an overall report score: 80 and up is high, 60 and up medium.
    pub fn for_report(score: f64) -> Self {
        if score >= 80.0 {
            Self::High
        } else if score >= 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Band for a single factor on the score card: under 30 is low, under 50 medium.
    pub fn for_factor(percent: i64) -> Self {
        if percent < 30 {
            Self::Low
        } else if percent < 50 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) mod de {
    use super::*;
    use once_cell::sync::Lazy;
    use regex::Regex;

    static LEADING_NUMBER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap());

    /// Leading decimal number of `s`, ignoring surrounding whitespace; 0 if none.
    pub fn lenient_f64(s: &str) -> f64 {
        LEADING_NUMBER
            .find(s.trim())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
        Other(serde_json::Value),
    }

    pub fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) if n.is_finite() => n,
            NumberOrString::String(s) => lenient_f64(&s),
            _ => 0.0,
        })
    }
}

pub use de::lenient_f64;
