//! Analyze command - back-end site analysis with AI summary

use crate::commands::summarize::{print_response, write_report};
use crate::context::Context;
use crate::WeightArgs;
use anyhow::Result;
use chrono::Local;
use h2site_api_client::{AnalysisRequest, ApiError};
use h2site_cli::output::{format_km, Status};
use h2site_cli::progress;
use h2site_geo::GeoPoint;
use h2site_report::{render_report_text, AnalysisResponse, ReportLocation};
use h2site_telemetry::Event;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

/// Arguments for [`run`]
pub struct AnalyzeArgs {
    pub center: GeoPoint,
    pub radius_km: Option<f64>,
    pub weights: WeightArgs,
    pub description: String,
    pub email: Option<String>,
    pub save: bool,
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    location: &'a ReportLocation,
    #[serde(flatten)]
    response: &'a AnalysisResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_path: Option<PathBuf>,
    saved: bool,
}

/// Run the analyze command
pub async fn run(ctx: &Context, args: AnalyzeArgs) -> Result<()> {
    let schema = ctx.schema();
    let radius_km = args.radius_km.unwrap_or(schema.explore.default_radius_km);
    let weights = args.weights.resolve(&schema.scoring.weights);

    let email = args.email.filter(|e| !e.trim().is_empty());
    if args.save && email.is_none() {
        return Err(ApiError::validation(
            "--save needs an account email (--email or H2SITE_USER_EMAIL)",
        )
        .into());
    }

    let mut request = AnalysisRequest::new(args.center, radius_km)
        .with_weights(weights.infrastructure, weights.environment, weights.economic)
        .with_description(args.description);
    if let Some(email) = &email {
        request = request.with_user_email(email.clone());
    }
    request.validate()?;

    let client = ctx.client()?;

    let pb = progress::spinner("Analysing site...");
    let response = match client.analysis().analyse(&request).await {
        Ok(response) => {
            progress::finish_success(&pb, "Analysis complete");
            response
        }
        Err(e) => {
            progress::finish_error(&pb, "Analysis failed");
            return Err(e.into());
        }
    };

    let place = client.geocoding().reverse_or_fallback(args.center).await;
    let location = ReportLocation {
        name: Some(place.name),
        coordinates: args.center,
        radius_km,
    };

    let report_path = match &args.output {
        Some(output) => {
            let text = render_report_text(&response, &location, &Local::now());
            Some(write_report(&text, output)?)
        }
        None => None,
    };

    let saved = match (&email, args.save) {
        (Some(email), true) => {
            client.reports().save(&response, &location, email).await?;
            Event::new("report_saved", json!({ "location": location.label() })).log();
            true
        }
        _ => false,
    };

    if ctx.is_json() {
        return ctx.print_json(&AnalyzeOutput {
            location: &location,
            response: &response,
            report_path,
            saved,
        });
    }

    Status::header(&format!("{} ({})", location.label(), format_km(radius_km)));
    print_response(&response);

    println!();
    if let Some(path) = report_path {
        Status::success(&format!("Report written to {}", path.display()));
    }
    if saved {
        Status::success("Saved to your reports");
    }
    Ok(())
}
