//! Geocode commands - place search and reverse lookup

use crate::context::Context;
use anyhow::Result;
use h2site_cli::output::Status;
use h2site_cli::progress;
use h2site_geo::GeoPoint;
use owo_colors::OwoColorize;

/// Search places by name
pub async fn forward(ctx: &Context, query: &str) -> Result<()> {
    let client = ctx.client()?;

    let pb = progress::spinner(&format!("Searching for {query}..."));
    let locations = match client.geocoding().forward(query).await {
        Ok(locations) => {
            pb.finish_and_clear();
            locations
        }
        Err(e) => {
            progress::finish_error(&pb, "Search failed");
            return Err(e.into());
        }
    };

    if ctx.is_json() {
        return ctx.print_json(&locations);
    }

    if locations.is_empty() {
        Status::info(&format!("No places found for \"{query}\""));
        return Ok(());
    }

    Status::header(&format!("Places matching \"{query}\""));
    for location in &locations {
        println!(
            "  {} {}",
            location.name.bold(),
            format!(
                "({:.4}, {:.4})",
                location.coordinates.latitude, location.coordinates.longitude
            )
            .dimmed()
        );
        println!("    {}", location.address);
    }
    Ok(())
}

/// Name the place at a point
///
/// Lookup failures degrade to the unnamed fallback location.
pub async fn reverse(ctx: &Context, point: GeoPoint) -> Result<()> {
    point.validate()?;
    let client = ctx.client()?;

    let location = client.geocoding().reverse_or_fallback(point).await;

    if ctx.is_json() {
        return ctx.print_json(&location);
    }

    println!("{}", location.name.bold());
    println!("  {}", location.address);
    Ok(())
}
