//! Score command - offline site scoring from the asset catalogue

use crate::catalogue;
use crate::context::Context;
use crate::WeightArgs;
use anyhow::Result;
use h2site_cli::output::{colored_factor, format_km, score_bar, Status};
use h2site_geo::GeoPoint;
use h2site_report::percent;
use h2site_scoring::SiteScorer;
use serde::Serialize;
use std::path::Path;

const BAR_WIDTH: usize = 20;

#[derive(Serialize)]
struct ScoreOutput<'a> {
    center: GeoPoint,
    radius_km: f64,
    model: &'a str,
    #[serde(flatten)]
    scores: &'a h2site_scoring::SiteScores,
}

/// Run the score command
pub fn run(
    ctx: &Context,
    center: GeoPoint,
    radius: Option<f64>,
    weights: WeightArgs,
    blend: Option<f64>,
    assets_path: Option<&Path>,
) -> Result<()> {
    let schema = ctx.schema();
    let radius_km = radius.unwrap_or(schema.explore.default_radius_km);
    let weights = weights.resolve(&schema.scoring.weights);

    let assets = catalogue::load(assets_path)?;
    let scorer = SiteScorer::new(assets)
        .with_top_k(schema.scoring.top_k)
        .with_blending_factor(blend.unwrap_or(schema.scoring.blending_factor))?;

    let scores = {
        h2site_telemetry::timed_span!("score_site", radius_km);
        scorer.score(center, radius_km, &weights)?
    };

    if ctx.is_json() {
        return ctx.print_json(&ScoreOutput {
            center,
            radius_km,
            model: scorer.model_name(),
            scores: &scores,
        });
    }

    Status::header(&format!(
        "Site score at {:.4}, {:.4} ({})",
        center.latitude,
        center.longitude,
        format_km(radius_km)
    ));

    let rows = [
        ("Infrastructure", scores.infrastructure),
        ("Environmental", scores.environment),
        ("Economic", scores.economic),
        ("Average", scores.average),
        ("Model Aggregate", scores.model_aggregate),
        ("User Preference", scores.user_preference),
    ];
    for (label, score) in rows {
        println!(
            "  {:<16} {} {:>5}",
            label,
            score_bar(score, BAR_WIDTH),
            colored_factor(percent(score))
        );
    }

    let env = &scores.environment_breakdown;
    Status::subheader("Environment");
    println!("  Land suitability     {:+.3}", env.land_suitability);
    println!("  Zoning penalty       {:+.3}", env.zoning_penalty);
    println!("  Water availability   {:+.3}", env.water_availability);
    println!("  Climate resilience   {:+.3}", env.climate_resilience);
    println!("  Biodiversity penalty {:+.3}", env.biodiversity_penalty);

    let econ = &scores.economic_breakdown;
    Status::subheader("Economic");
    println!("  CAPEX/OPEX           {:+.3}", econ.capex_opex);
    println!("  Regulatory           {:+.3}", econ.regulatory);
    println!("  Cluster proximity    {:+.3}", econ.cluster_proximity);

    println!();
    Status::quiet(&format!("Aggregate model: {}", scorer.model_name()));
    Ok(())
}
