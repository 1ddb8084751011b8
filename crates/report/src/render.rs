//! Plain-text report download.

use crate::analysis::AnalysisResponse;
use chrono::{DateTime, TimeZone, Utc};
use h2site_geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Where an analysis was run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLocation {
    /// Place name from geocoding, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coordinates: GeoPoint,
    pub radius_km: f64,
}

impl ReportLocation {
    /// The place name, or `lat, lon` when unnamed.
    pub fn label(&self) -> String {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!(
                "{}, {}",
                self.coordinates.latitude, self.coordinates.longitude
            ),
        }
    }
}

/// Render the downloadable text report.
///
/// `generated_at` is printed in the caller's time zone, US-style
/// (`1/15/2025, 2:30:00 PM`).
pub fn render_report_text<Tz>(
    response: &AnalysisResponse,
    location: &ReportLocation,
    generated_at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Hydrogen Site Analysis Report");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%-m/%-d/%Y, %-I:%M:%S %p"));
    let _ = writeln!(out, "Location: {}", location.label());
    let _ = writeln!(out, "Radius: {} km", location.radius_km);
    let _ = writeln!(out);
    let _ = writeln!(out, "SCORES:");

    let scores = [
        ("Infrastructure", response.s_infra),
        ("Environmental", response.s_env),
        ("Economic", response.s_econ),
        ("Average", response.s_avg),
        ("Model Aggregate", response.s_xgboost_aggregate),
        ("User Preference", response.s_user_custom_pref),
    ];
    for (label, score) in scores {
        let _ = writeln!(out, "- {}: {:.1}%", label, score * 100.0);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "AI SUMMARY:");
    out.push_str(&response.ai_summary);

    out.trim().to_string()
}

/// File name for a report downloaded at `at`, e.g. `hydrogen-analysis-2025-01-15.txt`.
pub fn report_file_name(at: &DateTime<Utc>) -> String {
    format!("hydrogen-analysis-{}.txt", at.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> AnalysisResponse {
        AnalysisResponse {
            s_infra: 0.8123,
            s_env: 0.45,
            s_econ: 0.3,
            s_avg: 0.5208,
            s_xgboost_aggregate: 0.61,
            s_user_custom_pref: 0.59,
            ai_summary: "The site is promising.\n".to_string(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 5).unwrap()
    }

    #[test]
    fn test_render_named_location() {
        let location = ReportLocation {
            name: Some("Ahmedabad".to_string()),
            coordinates: GeoPoint::new(72.5714, 23.0225),
            radius_km: 25.0,
        };
        let text = render_report_text(&response(), &location, &at());

        let expected = "Hydrogen Site Analysis Report\n\
                        Generated: 1/15/2025, 2:30:05 PM\n\
                        Location: Ahmedabad\n\
                        Radius: 25 km\n\
                        \n\
                        SCORES:\n\
                        - Infrastructure: 81.2%\n\
                        - Environmental: 45.0%\n\
                        - Economic: 30.0%\n\
                        - Average: 52.1%\n\
                        - Model Aggregate: 61.0%\n\
                        - User Preference: 59.0%\n\
                        \n\
                        AI SUMMARY:\n\
                        The site is promising.";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_unnamed_location_uses_lat_lon() {
        let location = ReportLocation {
            name: None,
            coordinates: GeoPoint::new(72.5714, 23.0225),
            radius_km: 10.0,
        };
        assert_eq!(location.label(), "23.0225, 72.5714");

        let text = render_report_text(&response(), &location, &at());
        assert!(text.contains("Location: 23.0225, 72.5714"));
        assert!(text.contains("Radius: 10 km"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(report_file_name(&at()), "hydrogen-analysis-2025-01-15.txt");
    }
}
