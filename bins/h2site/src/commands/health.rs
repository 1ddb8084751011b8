//! Health command - back-end availability

use crate::context::Context;
use anyhow::{bail, Result};
use h2site_cli::output::format_duration;
use owo_colors::OwoColorize;
use serde_json::json;

/// Run the health check
pub async fn run(ctx: &Context, detailed: bool) -> Result<()> {
    let client = ctx.client()?;
    let (health, elapsed) = if detailed {
        let (health, elapsed) = client.health().check_timed().await?;
        (health, Some(elapsed))
    } else {
        (client.health().check().await?, None)
    };

    if ctx.is_json() {
        let mut output = json!({
            "url": client.base_url(),
            "status": health.status,
            "message": health.message,
            "healthy": health.is_healthy(),
        });
        if let Some(elapsed) = elapsed {
            output["response_time_ms"] = json!(elapsed.as_millis() as u64);
            output["circuit"] = json!(client.circuit_state());
            output["rate_limit"] = json!(client.rate_limit_status("backend"));
        }
        ctx.print_json(&output)?;
    } else {
        let time_str = elapsed.map_or_else(String::new, |e| format!(" ({})", format_duration(e)));
        print!("  {}: ", client.base_url());
        if health.is_healthy() {
            println!("{}{}", "✓ OK".green(), time_str.dimmed());
        } else {
            println!("{} ({}){}", "✗ Unhealthy".red(), health.status, time_str.dimmed());
        }
        if !health.message.is_empty() {
            println!("    └─ {}", health.message.dimmed());
        }
        if detailed {
            let budget = client.rate_limit_status("backend");
            println!("    └─ Circuit:    {:?}", client.circuit_state());
            println!("    └─ Rate limit: {}/{} requests left", budget.available, budget.max);
        }
    }

    if !health.is_healthy() {
        bail!("Back-end reported status \"{}\"", health.status);
    }
    Ok(())
}
