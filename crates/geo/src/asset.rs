//! Point assets and their classified form.

use crate::GeoPoint;
use serde::{Deserialize, Serialize};

/// A hydrogen-infrastructure point of interest.
///
/// Reference data for the geo filter; the filter never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Category, e.g. "Hydrogen Production Plant"
    #[serde(rename = "type")]
    pub asset_type: String,
    /// `[longitude, latitude]`
    pub coordinates: GeoPoint,
    /// Free-form descriptive attributes
    #[serde(flatten)]
    pub attributes: AssetAttributes,
}

/// Optional descriptive attributes carried through classification untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Capital expenditure estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capex_estimate: Option<f64>,
    /// Operating expenditure estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opex_estimate: Option<f64>,
}

impl Asset {
    /// Creates an asset with no extra attributes.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        asset_type: impl Into<String>,
        coordinates: GeoPoint,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            asset_type: asset_type.into(),
            coordinates,
            attributes: AssetAttributes::default(),
        }
    }

    /// Builder-style method to set attributes
    #[must_use]
    pub fn with_attributes(mut self, attributes: AssetAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// An asset annotated with its distance from a search center.
///
/// Created fresh on every filter invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedAsset {
    #[serde(flatten)]
    pub asset: Asset,
    /// Great-circle distance from the center in kilometers
    #[serde(rename = "distance")]
    pub distance_km: f64,
    /// Inside the user-chosen radius
    #[serde(rename = "isPrimary")]
    pub is_primary: bool,
}

impl ClassifiedAsset {
    /// Asset ID shortcut
    pub fn id(&self) -> &str {
        &self.asset.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_asset_deserialize_catalogue_entry() {
        let value = json!({
            "id": "ahd-1",
            "name": "Gujarat Green Hydrogen Hub",
            "type": "Hydrogen Production Plant",
            "coordinates": [72.5714, 23.0225],
            "capacity": "50 MW",
            "status": "Operational"
        });

        let asset: Asset = serde_json::from_value(value).unwrap();
        assert_eq!(asset.asset_type, "Hydrogen Production Plant");
        assert_eq!(asset.coordinates, GeoPoint::new(72.5714, 23.0225));
        assert_eq!(asset.attributes.capacity.as_deref(), Some("50 MW"));
        assert!(asset.attributes.capex_estimate.is_none());
    }

    #[test]
    fn test_classified_asset_serializes_flat() {
        let classified = ClassifiedAsset {
            asset: Asset::new("a", "A", "Hydrogen Storage Facility", GeoPoint::new(1.0, 2.0)),
            distance_km: 4.5,
            is_primary: true,
        };

        let value = serde_json::to_value(&classified).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["type"], "Hydrogen Storage Facility");
        assert_eq!(value["distance"], 4.5);
        assert_eq!(value["isPrimary"], true);
        assert!(value.get("capacity").is_none());
    }
}
