//! Reports for hydrogen site analyses.
//!
//! This crate provides:
//! - Normalization of the analysis back-end's response (string or number scores)
//! - Segmentation of the AI summary into insights and recommendations
//! - The downloadable plain-text report
//! - Listing, search and statistics over saved reports

mod analysis;
mod error;
mod listing;
mod narrative;
mod render;

pub use analysis::{lenient_f64, percent, AnalysisResponse, ScoreBand, ScoreCard};
pub use error::{ReportError, Result};
pub use listing::{ReportFilter, ReportRecord, ReportStats, ReportStatus};
pub use narrative::{
    segment_summary, NarrativeSummary, FALLBACK_INSIGHT, FALLBACK_RECOMMENDATION,
};
pub use render::{render_report_text, report_file_name, ReportLocation};
