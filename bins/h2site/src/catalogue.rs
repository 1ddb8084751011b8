//! Offline asset catalogue

use anyhow::{Context as _, Result};
use h2site_geo::Asset;
use std::path::Path;
use tracing::debug;

/// Catalogue shipped with the binary: the reference hydrogen assets
/// around Gujarat and a handful of far-away sites.
const BUNDLED: &str = include_str!("../data/assets.json");

/// Load assets from `path`, or the bundled catalogue.
pub fn load(path: Option<&Path>) -> Result<Vec<Asset>> {
    let assets: Vec<Asset> = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalogue {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid catalogue {}", path.display()))?
        }
        None => serde_json::from_str(BUNDLED).context("Invalid bundled catalogue")?,
    };
    h2site_telemetry::metrics().gauge("catalogue.size", assets.len() as u64);
    debug!(count = assets.len(), "Loaded asset catalogue");
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalogue_parses() {
        let assets = load(None).unwrap();
        assert_eq!(assets.len(), 47);
        assert!(assets.iter().all(|a| a.coordinates.is_valid()));
        assert_eq!(assets[0].id, "ahd-1");
    }

    #[test]
    fn test_missing_file() {
        assert!(load(Some(Path::new("/nonexistent/assets.json"))).is_err());
    }
}
