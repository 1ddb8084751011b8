//! Classify command - primary and secondary asset rings around a site

use crate::catalogue;
use crate::context::Context;
use anyhow::Result;
use h2site_cli::output::{format_count, format_km, Status};
use h2site_geo::{ClassifiedAsset, DualRadiusFilter, GeoPoint, InvalidAssetPolicy};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    center: GeoPoint,
    primary_radius_km: f64,
    secondary_radius_km: f64,
    primary_count: usize,
    secondary_count: usize,
    assets: &'a [ClassifiedAsset],
    rejected: Vec<RejectedOutput<'a>>,
}

#[derive(Serialize)]
struct RejectedOutput<'a> {
    index: usize,
    id: &'a str,
    error: String,
}

/// Run the classify command
pub fn run(
    ctx: &Context,
    center: GeoPoint,
    radius: Option<f64>,
    secondary: Option<f64>,
    assets_path: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let explore = &ctx.schema().explore;
    let primary_km = radius.unwrap_or(explore.default_radius_km);
    let secondary_km = secondary.unwrap_or(explore.secondary_radius_km);

    let policy = if strict {
        InvalidAssetPolicy::Abort
    } else {
        InvalidAssetPolicy::Skip
    };
    let filter = DualRadiusFilter::new(primary_km, secondary_km)?.with_policy(policy);

    let assets = catalogue::load(assets_path)?;
    let classification = filter.classify(center, &assets)?;
    info!(
        primary = classification.primary_count(),
        secondary = classification.secondary_count(),
        rejected = classification.rejected.len(),
        "Classified assets"
    );

    if ctx.is_json() {
        let output = ClassifyOutput {
            center,
            primary_radius_km: primary_km,
            secondary_radius_km: secondary_km,
            primary_count: classification.primary_count(),
            secondary_count: classification.secondary_count(),
            assets: &classification.assets,
            rejected: classification
                .rejected
                .iter()
                .map(|r| RejectedOutput {
                    index: r.index,
                    id: &r.id,
                    error: r.error.to_string(),
                })
                .collect(),
        };
        return ctx.print_json(&output);
    }

    Status::header(&format!(
        "Assets around {:.4}, {:.4}",
        center.latitude, center.longitude
    ));
    println!(
        "  Primary ring:   {} within {}",
        format_count(classification.primary_count(), "asset", "assets").green(),
        format_km(primary_km)
    );
    println!(
        "  Secondary ring: {} within {}",
        format_count(classification.secondary_count(), "asset", "assets").cyan(),
        format_km(secondary_km)
    );

    if classification.assets.is_empty() {
        println!();
        Status::info("No assets in range");
    } else {
        println!();
        for classified in &classification.assets {
            let marker = if classified.is_primary {
                "●".green().to_string()
            } else {
                "○".dimmed().to_string()
            };
            println!(
                "  {} {:<10} {:>9}  {} {}",
                marker,
                classified.id(),
                format_km(classified.distance_km),
                classified.asset.name,
                format!("({})", classified.asset.asset_type).dimmed()
            );
        }
    }

    for rejected in &classification.rejected {
        Status::warning(&format!(
            "Skipped asset {} (#{}): {}",
            rejected.id, rejected.index, rejected.error
        ));
    }

    Ok(())
}
