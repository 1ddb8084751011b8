//! Assets commands - back-end asset catalogue management

use crate::context::Context;
use anyhow::Result;
use h2site_api_client::{AssetDraft, AssetRecord};
use h2site_cli::output::{format_count, Status};
use h2site_cli::progress;
use h2site_geo::GeoPoint;
use h2site_telemetry::Event;
use owo_colors::OwoColorize;
use serde_json::json;

/// List the catalogue, optionally narrowed to one category label
pub async fn list(ctx: &Context, category: Option<&str>) -> Result<()> {
    let client = ctx.client()?;

    let pb = progress::spinner("Fetching assets...");
    let mut records = match client.assets().list().await {
        Ok(records) => {
            pb.finish_and_clear();
            records
        }
        Err(e) => {
            progress::finish_error(&pb, "Failed to fetch assets");
            return Err(e.into());
        }
    };

    if let Some(category) = category {
        records.retain(|r| r.category == category);
    }

    if ctx.is_json() {
        return ctx.print_json(&records);
    }

    Status::header(&format!(
        "Asset catalogue ({})",
        format_count(records.len(), "asset", "assets")
    ));
    for record in &records {
        print_row(record);
    }
    Ok(())
}

/// Show one asset
pub async fn get(ctx: &Context, id: &str) -> Result<()> {
    let record = ctx.client()?.assets().get(id).await?;

    if ctx.is_json() {
        return ctx.print_json(&record);
    }

    Status::header(&record.name);
    println!("  ID:          {}", record.id);
    println!("  Category:    {}", record.category);
    match record.location {
        Some(point) => println!("  Location:    {:.5}, {:.5}", point.latitude, point.longitude),
        None => println!("  Location:    {}", "unknown".dimmed()),
    }
    for (label, value) in [
        ("Capacity:   ", &record.capacity),
        ("Status:     ", &record.status),
        ("Ownership:  ", &record.ownership),
        ("Description:", &record.description),
    ] {
        if let Some(value) = value {
            println!("  {label} {value}");
        }
    }
    if let Some(capex) = record.capex_estimate {
        println!("  CAPEX:       {capex}");
    }
    if let Some(opex) = record.opex_estimate {
        println!("  OPEX:        {opex}");
    }
    Ok(())
}

/// Create an asset
pub async fn create(
    ctx: &Context,
    name: String,
    category: String,
    location: GeoPoint,
    capex: Option<f64>,
    opex: Option<f64>,
    description: Option<String>,
) -> Result<()> {
    let mut draft = AssetDraft::new(name, category, location).with_costs(capex, opex);
    if let Some(description) = description {
        draft = draft.with_description(description);
    }
    draft.validate()?;

    let record = ctx.client()?.assets().create(&draft).await?;
    Event::new("asset_created", json!({ "id": record.id, "category": record.category })).log();

    if ctx.is_json() {
        return ctx.print_json(&record);
    }
    Status::success(&format!("Created {} ({})", record.name, record.id));
    Ok(())
}

/// Delete an asset
pub async fn delete(ctx: &Context, id: &str) -> Result<()> {
    ctx.client()?.assets().delete(id).await?;
    Event::new("asset_deleted", json!({ "id": id })).log();

    if ctx.is_json() {
        return ctx.print_json(&json!({ "deleted": id }));
    }
    Status::success(&format!("Deleted asset {id}"));
    Ok(())
}

fn print_row(record: &AssetRecord) {
    let location = record.location.map_or_else(
        || "-".to_string(),
        |p| format!("{:.4}, {:.4}", p.latitude, p.longitude),
    );
    println!(
        "  {:<8} {:<40} {:<20} {}",
        record.id,
        record.name,
        location.dimmed(),
        record.category.dimmed()
    );
}
