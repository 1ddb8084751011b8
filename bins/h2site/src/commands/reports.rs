//! Reports commands - saved analyses and cross-report comparison

use crate::commands::summarize::load_response;
use crate::context::Context;
use anyhow::{Context as _, Result};
use h2site_api_client::{CompareRequest, ReportSummary};
use h2site_cli::output::{format_count, Status};
use h2site_cli::progress;
use h2site_geo::GeoPoint;
use h2site_report::{ReportFilter, ReportLocation, ReportRecord, ReportStats, ReportStatus};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ListOutput<'a> {
    stats: ReportStats,
    reports: Vec<&'a ReportRecord>,
}

/// List saved reports, filtered by search text and status
pub async fn list(
    ctx: &Context,
    email: &str,
    query: Option<String>,
    status: Option<&str>,
) -> Result<()> {
    let mut filter = ReportFilter::new();
    if let Some(query) = query {
        filter = filter.with_query(query);
    }
    if let Some(status) = status {
        filter = filter.with_status(status.parse::<ReportStatus>()?);
    }

    let client = ctx.client()?;
    let pb = progress::spinner("Fetching saved reports...");
    let records = match client.reports().list(email).await {
        Ok(records) => {
            pb.finish_and_clear();
            records
        }
        Err(e) => {
            progress::finish_error(&pb, "Failed to fetch reports");
            return Err(e.into());
        }
    };

    let stats = ReportStats::from_records(&records);
    let shown = filter.apply(&records);

    if ctx.is_json() {
        return ctx.print_json(&ListOutput {
            stats,
            reports: shown,
        });
    }

    Status::header("Saved Reports");
    println!(
        "  Total: {}   Completed: {}   Processing: {}   Avg score: {:.0}",
        stats.total, stats.completed, stats.processing, stats.average_score
    );
    println!();

    if shown.is_empty() {
        if filter.is_active() {
            Status::info("No reports match the filter");
        } else {
            Status::info("No saved reports yet");
        }
        return Ok(());
    }

    for record in &shown {
        let status = match record.status {
            ReportStatus::Completed => record.status.as_str().green().to_string(),
            ReportStatus::Processing => record.status.as_str().yellow().to_string(),
            ReportStatus::Failed => record.status.as_str().red().to_string(),
        };
        println!(
            "  {:<28} {:<24} {:>5} km  {:<10} {}",
            record.name,
            record.location.dimmed(),
            record.analysis_radius,
            status,
            record.generated_at.dimmed()
        );
    }
    if filter.is_active() {
        println!();
        println!(
            "  {}",
            format!("{} of {}", shown.len(), format_count(records.len(), "report", "reports"))
                .dimmed()
        );
    }
    Ok(())
}

/// Save an analysis response file to the account
pub async fn save(
    ctx: &Context,
    input: &Path,
    center: GeoPoint,
    radius_km: f64,
    name: Option<String>,
    email: &str,
) -> Result<()> {
    center.validate()?;
    let response = load_response(input)?;
    let location = ReportLocation {
        name,
        coordinates: center,
        radius_km,
    };

    let saved = ctx
        .client()?
        .reports()
        .save(&response, &location, email)
        .await?;

    if ctx.is_json() {
        return ctx.print_json(&saved);
    }
    Status::success(&format!("Saved report for {}", location.label()));
    Ok(())
}

/// Compare analyses against a question
pub async fn compare(
    ctx: &Context,
    inputs: &[PathBuf],
    question: String,
    email: String,
) -> Result<()> {
    let reports = inputs
        .iter()
        .map(|path| {
            let response = load_response(path)?;
            Ok(ReportSummary {
                name: report_name(path),
                summary: response.ai_summary,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let request = CompareRequest {
        reports,
        user_question: question,
        user_email: email,
    };
    request.validate()?;

    let client = ctx.client()?;
    let pb = progress::spinner(&format!(
        "Comparing {}...",
        format_count(request.reports.len(), "report", "reports")
    ));
    let answer = match client.reports().compare(&request).await {
        Ok(answer) => {
            pb.finish_and_clear();
            answer
        }
        Err(e) => {
            progress::finish_error(&pb, "Comparison failed");
            return Err(e).context("Report comparison failed");
        }
    };

    if ctx.is_json() {
        return ctx.print_json(&answer);
    }
    Status::header(&request.user_question);
    println!("{}", answer.msg);
    Ok(())
}

/// Report name from its file name, e.g. `kutch.json` -> `kutch`
fn report_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_name() {
        assert_eq!(report_name(Path::new("/tmp/kutch.json")), "kutch");
        assert_eq!(report_name(Path::new("ahmedabad")), "ahmedabad");
    }
}
