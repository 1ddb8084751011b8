//! Saved report listing, search and statistics.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Processing state of a saved report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Completed,
    Processing,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Processing => "processing",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "processing" => Ok(Self::Processing),
            "failed" => Ok(Self::Failed),
            _ => Err(ReportError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A saved analysis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub generated_at: String,
    pub status: ReportStatus,
    /// Human-readable file size, e.g. "2.4 MB"
    #[serde(default)]
    pub size: String,
    pub analysis_radius: f64,
    /// Overall score out of 100; 0 when not yet scored
    #[serde(default)]
    pub score: f64,
}

/// Search text and status filter for the report list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Case-insensitive substring of the name or location
    pub query: Option<String>,
    /// Only reports in this status; all when `None`
    pub status: Option<ReportStatus>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether `record` passes the filter.
    pub fn matches(&self, record: &ReportRecord) -> bool {
        let matches_search = self.query.as_deref().is_none_or(|q| {
            let q = q.to_lowercase();
            record.name.to_lowercase().contains(&q) || record.location.to_lowercase().contains(&q)
        });
        let matches_status = self.status.is_none_or(|s| s == record.status);
        matches_search && matches_status
    }

    /// Records passing the filter, in their original order.
    pub fn apply<'a>(&self, records: &'a [ReportRecord]) -> Vec<&'a ReportRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Whether any criterion is set.
    pub fn is_active(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.is_empty()) || self.status.is_some()
    }
}

/// Summary counters over a report list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total: usize,
    pub completed: usize,
    pub processing: usize,
    /// Sum of positive completed scores over the completed count; 0 when none
    pub average_score: f64,
}

impl ReportStats {
    pub fn from_records(records: &[ReportRecord]) -> Self {
        let completed = records
            .iter()
            .filter(|r| r.status == ReportStatus::Completed)
            .count();
        let processing = records
            .iter()
            .filter(|r| r.status == ReportStatus::Processing)
            .count();
        let scored_sum: f64 = records
            .iter()
            .filter(|r| r.status == ReportStatus::Completed && r.score > 0.0)
            .map(|r| r.score)
            .sum();

        let average_score = if completed == 0 {
            0.0
        } else {
            scored_sum / completed as f64
        };

        Self {
            total: records.len(),
            completed,
            processing,
            average_score,
        }
    }
}
