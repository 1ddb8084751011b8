//! Nearby command - closest catalogue assets to a site

use crate::catalogue;
use crate::context::Context;
use anyhow::Result;
use h2site_cli::output::{format_count, format_km, Status};
use h2site_geo::{nearby, Asset, GeoPoint};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct NearbyOutput<'a> {
    #[serde(flatten)]
    asset: &'a Asset,
    distance_km: f64,
}

/// Run the nearby command
pub fn run(
    ctx: &Context,
    center: GeoPoint,
    radius: Option<f64>,
    top: Option<usize>,
    category: Option<&str>,
    assets_path: Option<&Path>,
) -> Result<()> {
    center.validate()?;
    let radius_km = radius.unwrap_or(ctx.schema().explore.default_radius_km);
    let top_k = top.unwrap_or(ctx.schema().scoring.top_k);

    let mut assets = catalogue::load(assets_path)?;
    if let Some(category) = category {
        assets.retain(|a| a.asset_type == category);
    }

    let found = nearby(center, radius_km, &assets, Some(top_k), |a| Some(a.coordinates));

    if ctx.is_json() {
        let output: Vec<NearbyOutput> = found
            .iter()
            .map(|n| NearbyOutput {
                asset: n.item,
                distance_km: n.distance_km,
            })
            .collect();
        return ctx.print_json(&output);
    }

    Status::header(&format!(
        "Closest assets within {} of {:.4}, {:.4}",
        format_km(radius_km),
        center.latitude,
        center.longitude
    ));

    if found.is_empty() {
        Status::info("No assets in range");
        return Ok(());
    }

    for (rank, n) in found.iter().enumerate() {
        println!(
            "  {:>2}. {:>9}  {} {}",
            rank + 1,
            format_km(n.distance_km),
            n.item.name,
            format!("[{}]", n.item.asset_type).dimmed()
        );
    }
    println!();
    println!("  {}", format_count(found.len(), "asset", "assets").dimmed());

    Ok(())
}
