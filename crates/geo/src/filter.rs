//! Dual-radius asset classification.
//!
//! Every asset within the secondary (context) radius is kept and tagged as
//! primary when it also lies within the user-chosen primary radius. Anything
//! farther than the secondary radius is dropped. Output keeps input order so
//! callers can rely on it when layering primary assets over secondary ones.

use crate::{haversine_distance, Asset, ClassifiedAsset, GeoError, GeoPoint, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do with an asset whose coordinates are invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidAssetPolicy {
    /// Leave the asset out and report it in [`Classification::rejected`]
    #[default]
    Skip,
    /// Fail the whole classification on the first invalid asset
    Abort,
}

/// An asset left out of the result because its coordinates were invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedAsset {
    /// Position in the input slice
    pub index: usize,
    /// Asset ID
    pub id: String,
    /// Why it was rejected
    pub error: GeoError,
}

/// Result of a dual-radius classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Retained assets, in input order
    pub assets: Vec<ClassifiedAsset>,
    /// Assets skipped under [`InvalidAssetPolicy::Skip`]
    pub rejected: Vec<RejectedAsset>,
}

impl Classification {
    /// Assets inside the primary radius
    pub fn primary(&self) -> impl Iterator<Item = &ClassifiedAsset> {
        self.assets.iter().filter(|a| a.is_primary)
    }

    /// Assets between the primary and secondary radius
    pub fn secondary(&self) -> impl Iterator<Item = &ClassifiedAsset> {
        self.assets.iter().filter(|a| !a.is_primary)
    }

    /// Number of primary assets
    pub fn primary_count(&self) -> usize {
        self.primary().count()
    }

    /// Number of secondary assets
    pub fn secondary_count(&self) -> usize {
        self.assets.len() - self.primary_count()
    }

    /// Consumes the classification, returning only the retained assets
    pub fn into_assets(self) -> Vec<ClassifiedAsset> {
        self.assets
    }
}

/// Classifies assets into primary and secondary rings around a center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualRadiusFilter {
    /// User-chosen analysis radius in kilometers
    pub primary_km: f64,
    /// Context radius in kilometers; hard outer cutoff
    pub secondary_km: f64,
    /// Handling of assets with invalid coordinates
    #[serde(default)]
    pub policy: InvalidAssetPolicy,
}

impl DualRadiusFilter {
    /// Creates a filter with the default [`InvalidAssetPolicy::Skip`] policy.
    ///
    /// A secondary radius smaller than the primary one is accepted: the
    /// secondary radius stays the outer cutoff either way.
    pub fn new(primary_km: f64, secondary_km: f64) -> Result<Self> {
        validate_radius("primary", primary_km)?;
        validate_radius("secondary", secondary_km)?;
        Ok(Self {
            primary_km,
            secondary_km,
            policy: InvalidAssetPolicy::default(),
        })
    }

    /// Builder-style method to set the invalid-asset policy
    #[must_use]
    pub fn with_policy(mut self, policy: InvalidAssetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Classifies `assets` relative to `center`.
    ///
    /// # Errors
    /// * `InvalidCoordinate` if `center` is invalid, or if an asset is invalid
    ///   under [`InvalidAssetPolicy::Abort`] (first offender in input order)
    /// * `InvalidRadius` if the filter was built by hand with a bad radius
    pub fn classify(&self, center: GeoPoint, assets: &[Asset]) -> Result<Classification> {
        validate_radius("primary", self.primary_km)?;
        validate_radius("secondary", self.secondary_km)?;
        center
            .validate()
            .map_err(|e| GeoError::InvalidCoordinate(format!("center {}", detail(&e))))?;

        let outcomes = self.measure_all(&center, assets);

        let mut classification = Classification::default();
        for (index, (asset, outcome)) in assets.iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(Some(classified)) => classification.assets.push(classified),
                Ok(None) => {}
                Err(error) => {
                    if self.policy == InvalidAssetPolicy::Abort {
                        return Err(error);
                    }
                    warn!(asset_id = %asset.id, index, error = %error, "Skipping asset");
                    classification.rejected.push(RejectedAsset {
                        index,
                        id: asset.id.clone(),
                        error,
                    });
                }
            }
        }

        debug!(
            total = assets.len(),
            primary = classification.primary_count(),
            secondary = classification.secondary_count(),
            rejected = classification.rejected.len(),
            "Classified assets"
        );

        Ok(classification)
    }

    /// Per-asset outcome in input order: `Ok(None)` means outside the cutoff.
    fn measure_all(
        &self,
        center: &GeoPoint,
        assets: &[Asset],
    ) -> Vec<Result<Option<ClassifiedAsset>>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            assets
                .par_iter()
                .map(|asset| self.measure(center, asset))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            assets
                .iter()
                .map(|asset| self.measure(center, asset))
                .collect()
        }
    }

    #[inline]
    fn measure(&self, center: &GeoPoint, asset: &Asset) -> Result<Option<ClassifiedAsset>> {
        asset.coordinates.validate().map_err(|e| {
            GeoError::InvalidCoordinate(format!("asset '{}' {}", asset.id, detail(&e)))
        })?;

        let distance_km = haversine_distance(center, &asset.coordinates);
        if distance_km > self.secondary_km {
            return Ok(None);
        }

        Ok(Some(ClassifiedAsset {
            asset: asset.clone(),
            distance_km,
            is_primary: distance_km <= self.primary_km,
        }))
    }
}

/// Classifies assets with the skip-and-continue policy.
///
/// Returns the retained assets in input order; assets with invalid
/// coordinates are logged and left out.
///
/// # Example
/// ```
/// use h2site_geo::{classify, Asset, GeoPoint};
///
/// let center = GeoPoint::new(72.5714, 23.0225);
/// let assets = vec![
///     Asset::new("near", "Hub", "Hydrogen Production Plant", GeoPoint::new(72.5714, 23.0225)),
///     Asset::new("far", "NYC", "Hydrogen Storage Facility", GeoPoint::new(-74.0060, 40.7128)),
/// ];
///
/// let result = classify(center, 10.0, 100.0, &assets).unwrap();
/// assert_eq!(result.len(), 1);
/// assert!(result[0].is_primary);
/// ```
pub fn classify(
    center: GeoPoint,
    primary_radius_km: f64,
    secondary_radius_km: f64,
    assets: &[Asset],
) -> Result<Vec<ClassifiedAsset>> {
    DualRadiusFilter::new(primary_radius_km, secondary_radius_km)?
        .classify(center, assets)
        .map(Classification::into_assets)
}

fn validate_radius(which: &str, radius_km: f64) -> Result<()> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(())
    } else {
        Err(GeoError::InvalidRadius(format!(
            "{which} radius must be a finite, non-negative number of km, got {radius_km}"
        )))
    }
}

fn detail(err: &GeoError) -> String {
    match err {
        GeoError::InvalidCoordinate(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const AHMEDABAD: GeoPoint = GeoPoint::new(72.5714, 23.0225);
    const GANDHINAGAR: GeoPoint = GeoPoint::new(72.6369, 23.2156);
    const NEW_YORK: GeoPoint = GeoPoint::new(-74.0060, 40.7128);

    fn asset(id: &str, coordinates: GeoPoint) -> Asset {
        Asset::new(id, id, "Hydrogen Production Plant", coordinates)
    }

    fn ids(assets: &[ClassifiedAsset]) -> Vec<&str> {
        assets.iter().map(ClassifiedAsset::id).collect()
    }

    #[test]
    fn test_known_distance_scenario() {
        let assets = vec![asset("ahd-2", GANDHINAGAR)];

        let narrow = classify(AHMEDABAD, 10.0, 100.0, &assets).unwrap();
        assert_eq!(narrow.len(), 1);
        assert!(!narrow[0].is_primary);
        assert!((narrow[0].distance_km - 22.5).abs() < 1.0);

        let wide = classify(AHMEDABAD, 30.0, 100.0, &assets).unwrap();
        assert_eq!(wide.len(), 1);
        assert!(wide[0].is_primary);
    }

    #[test]
    fn test_empty_input() {
        assert!(classify(AHMEDABAD, 10.0, 100.0, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_asset_outside_secondary_excluded() {
        let assets = vec![asset("nyc", NEW_YORK)];
        assert!(classify(AHMEDABAD, 10.0, 100.0, &assets).unwrap().is_empty());
    }

    #[test]
    fn test_zero_primary_radius_only_center_is_primary() {
        let assets = vec![asset("center", AHMEDABAD), asset("gandhinagar", GANDHINAGAR)];
        let result = classify(AHMEDABAD, 0.0, 100.0, &assets).unwrap();

        assert_eq!(result.len(), 2);
        assert!(result[0].is_primary);
        assert_eq!(result[0].distance_km, 0.0);
        assert!(!result[1].is_primary);
    }

    #[test]
    fn test_boundary_inclusive() {
        let assets = vec![asset("ahd-2", GANDHINAGAR)];
        let exact = haversine_distance(&AHMEDABAD, &GANDHINAGAR);

        let result = classify(AHMEDABAD, exact, exact, &assets).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].is_primary);
        assert_eq!(result[0].distance_km, exact);
    }

    #[test]
    fn test_secondary_smaller_than_primary_is_outer_cutoff() {
        let assets = vec![asset("center", AHMEDABAD), asset("gandhinagar", GANDHINAGAR)];
        let result = classify(AHMEDABAD, 50.0, 10.0, &assets).unwrap();

        assert_eq!(ids(&result), vec!["center"]);
        assert!(result[0].is_primary);
    }

    #[test]
    fn test_duplicates_are_independent() {
        let assets = vec![asset("a", GANDHINAGAR), asset("b", GANDHINAGAR)];
        let result = classify(AHMEDABAD, 30.0, 100.0, &assets).unwrap();
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_order_preserved_not_sorted_by_distance() {
        let assets = vec![
            asset("far", GANDHINAGAR),
            asset("nyc", NEW_YORK),
            asset("near", AHMEDABAD),
        ];
        let result = classify(AHMEDABAD, 10.0, 100.0, &assets).unwrap();
        assert_eq!(ids(&result), vec!["far", "near"]);
    }

    #[test]
    fn test_invalid_center_fails() {
        let assets = vec![asset("a", AHMEDABAD)];
        let err = classify(GeoPoint::new(f64::NAN, 0.0), 10.0, 100.0, &assets).unwrap_err();
        assert!(matches!(err, GeoError::InvalidCoordinate(msg) if msg.contains("center")));
    }

    #[test]
    fn test_invalid_asset_skipped_by_default() {
        let assets = vec![
            asset("ok", AHMEDABAD),
            asset("bad", GeoPoint::new(72.0, 95.0)),
            asset("nan", GeoPoint::new(f64::NAN, 23.0)),
        ];

        let classification = DualRadiusFilter::new(10.0, 100.0)
            .unwrap()
            .classify(AHMEDABAD, &assets)
            .unwrap();

        assert_eq!(ids(&classification.assets), vec!["ok"]);
        assert_eq!(classification.rejected.len(), 2);
        assert_eq!(classification.rejected[0].index, 1);
        assert_eq!(classification.rejected[1].id, "nan");
        assert!(classification
            .rejected
            .iter()
            .all(|r| matches!(r.error, GeoError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_invalid_asset_aborts_with_policy() {
        let assets = vec![
            asset("ok", AHMEDABAD),
            asset("bad", GeoPoint::new(181.0, 0.0)),
            asset("worse", GeoPoint::new(f64::NAN, f64::NAN)),
        ];

        let err = DualRadiusFilter::new(10.0, 100.0)
            .unwrap()
            .with_policy(InvalidAssetPolicy::Abort)
            .classify(AHMEDABAD, &assets)
            .unwrap_err();

        assert!(matches!(err, GeoError::InvalidCoordinate(msg) if msg.contains("'bad'")));
    }

    #[test]
    fn test_invalid_radius_rejected() {
        assert!(matches!(
            DualRadiusFilter::new(-1.0, 100.0),
            Err(GeoError::InvalidRadius(_))
        ));
        assert!(matches!(
            classify(AHMEDABAD, 10.0, f64::NAN, &[]),
            Err(GeoError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_ring_counts() {
        let assets = vec![
            asset("center", AHMEDABAD),
            asset("gandhinagar", GANDHINAGAR),
            asset("nyc", NEW_YORK),
        ];
        let classification = DualRadiusFilter::new(10.0, 100.0)
            .unwrap()
            .classify(AHMEDABAD, &assets)
            .unwrap();

        assert_eq!(classification.primary_count(), 1);
        assert_eq!(classification.secondary_count(), 1);
        assert_eq!(classification.secondary().next().unwrap().id(), "gandhinagar");
    }

    fn arb_point() -> impl Strategy<Value = GeoPoint> {
        (-180.0f64..=180.0, -90.0f64..=90.0).prop_map(|(lon, lat)| GeoPoint::new(lon, lat))
    }

    fn arb_assets() -> impl Strategy<Value = Vec<Asset>> {
        prop::collection::vec(
            (69.0f64..76.0, 20.0f64..26.0)
                .prop_map(|(lon, lat)| GeoPoint::new(lon, lat)),
            0..40,
        )
        .prop_map(|points| {
            points
                .into_iter()
                .enumerate()
                .map(|(i, p)| asset(&format!("asset-{i}"), p))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_identity_at_center(center in arb_point(), r in 0.0f64..500.0) {
            let result = classify(center, r, r + 100.0, &[asset("self", center)]).unwrap();
            prop_assert_eq!(result.len(), 1);
            prop_assert!(result[0].is_primary);
        }

        #[test]
        fn prop_outer_cutoff(assets in arb_assets(), primary in 0.0f64..300.0, secondary in 0.0f64..400.0) {
            for classified in classify(AHMEDABAD, primary, secondary, &assets).unwrap() {
                prop_assert!(classified.distance_km <= secondary);
            }
        }

        #[test]
        fn prop_monotonic_ring_membership(
            assets in arb_assets(),
            r1 in 0.0f64..200.0,
            grow in 0.0f64..200.0,
        ) {
            let secondary = 300.0;
            let narrow = classify(AHMEDABAD, r1, secondary, &assets).unwrap();
            let wide = classify(AHMEDABAD, r1 + grow, secondary, &assets).unwrap();

            prop_assert_eq!(narrow.len(), wide.len());
            for (n, w) in narrow.iter().zip(&wide) {
                prop_assert_eq!(n.id(), w.id());
                prop_assert!(!n.is_primary || w.is_primary);
            }
        }

        #[test]
        fn prop_order_preserved(assets in arb_assets(), primary in 0.0f64..300.0) {
            let result = classify(AHMEDABAD, primary, 250.0, &assets).unwrap();
            let positions: Vec<usize> = result
                .iter()
                .map(|c| assets.iter().position(|a| a.id == c.asset.id).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
