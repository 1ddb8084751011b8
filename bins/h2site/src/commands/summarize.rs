//! Summarize and render commands - AI summary sections and the text report

use crate::context::Context;
use anyhow::{bail, Context as _, Result};
use chrono::{Local, Utc};
use h2site_cli::output::{colored_factor, Status};
use h2site_geo::GeoPoint;
use h2site_report::{
    render_report_text, report_file_name, segment_summary, AnalysisResponse, NarrativeSummary,
    ReportLocation,
};
use owo_colors::OwoColorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Run the summarize command
pub fn run(ctx: &Context, text: Option<String>, input: Option<&Path>) -> Result<()> {
    let text = match (text, input) {
        (Some(text), _) => text,
        (None, Some(path)) => load_response(path)?.ai_summary,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read summary from stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        bail!("Summary text is empty");
    }

    let narrative = segment_summary(&text);
    if ctx.is_json() {
        return ctx.print_json(&narrative);
    }
    print_narrative(&narrative);
    Ok(())
}

/// Run the render command
pub fn render(
    ctx: &Context,
    input: &Path,
    center: GeoPoint,
    radius_km: f64,
    name: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    center.validate()?;
    let response = load_response(input)?;
    let location = ReportLocation {
        name,
        coordinates: center,
        radius_km,
    };
    let text = render_report_text(&response, &location, &Local::now());

    match output {
        Some(output) => {
            let path = write_report(&text, output)?;
            if ctx.is_json() {
                ctx.print_json(&serde_json::json!({ "path": path }))?;
            } else {
                Status::success(&format!("Report written to {}", path.display()));
            }
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Read a saved analysis response
pub fn load_response(path: &Path) -> Result<AnalysisResponse> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let response = AnalysisResponse::from_json(&raw)
        .with_context(|| format!("Invalid analysis response {}", path.display()))?;
    debug!(path = %path.display(), "Loaded analysis response");
    Ok(response)
}

/// Write a rendered report to `output`, or into it under today's report name
/// when it is a directory. Returns the written path.
pub fn write_report(text: &str, output: &Path) -> Result<PathBuf> {
    let path = if output.is_dir() {
        output.join(report_file_name(&Utc::now()))
    } else {
        output.to_path_buf()
    };
    std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Report written");
    Ok(path)
}

/// Score card and summary sections of an analysis
pub fn print_response(response: &AnalysisResponse) {
    let card = response.score_card();
    Status::subheader("Scores");
    for (label, value) in card.entries() {
        println!("  {:<16} {:>5}", label, colored_factor(value));
    }
    print_narrative(&response.narrative());
}

fn print_narrative(narrative: &NarrativeSummary) {
    Status::subheader("Key Insights");
    for insight in &narrative.insights {
        println!("  {} {}", "•".cyan(), insight);
    }

    Status::subheader("Recommendations");
    for recommendation in &narrative.recommendations {
        println!("  {} {}", "→".green(), recommendation);
    }
}
