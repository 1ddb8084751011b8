//! Asset catalogue endpoints
//!
//! The back-end has stored assets under several historical shapes; every
//! record is normalized here, once, into [`AssetRecord`].

use crate::client::H2SiteClient;
use crate::error::{ApiError, ApiResult};
use h2site_geo::{parse_point, Asset, AssetAttributes, GeoJsonPoint, GeoPoint};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

const ASSETS_PATH: &str = "api/v3/assets/";

/// Asset catalogue API interface
#[derive(Clone)]
pub struct AssetsApi {
    client: H2SiteClient,
}

impl AssetsApi {
    /// Create a new assets API interface
    pub(crate) fn new(client: H2SiteClient) -> Self {
        Self { client }
    }

    /// List every asset
    ///
    /// GET /api/v3/assets/
    pub async fn list(&self) -> ApiResult<Vec<AssetRecord>> {
        let envelope: AssetList = self.client.get(ASSETS_PATH).await?;
        let records = envelope.into_records();
        debug!(count = records.len(), "Fetched asset catalogue");
        Ok(records)
    }

    /// List assets converted for the geo filter, dropping records without a location
    pub async fn catalogue(&self) -> ApiResult<Vec<Asset>> {
        let records = self.list().await?;
        let total = records.len();
        let assets: Vec<Asset> = records
            .into_iter()
            .filter_map(|record| match record.to_asset() {
                Ok(asset) => Some(asset),
                Err(e) => {
                    warn!(id = %record.id, error = %e, "Skipping asset");
                    None
                }
            })
            .collect();
        debug!(total, usable = assets.len(), "Converted asset catalogue");
        Ok(assets)
    }

    /// Get a single asset by ID
    ///
    /// GET /api/v3/assets/{id}/
    pub async fn get(&self, id: &str) -> ApiResult<AssetRecord> {
        self.client.get(&item_path(id)).await
    }

    /// Create a new asset
    ///
    /// POST /api/v3/assets/
    pub async fn create(&self, draft: &AssetDraft) -> ApiResult<AssetRecord> {
        draft.validate()?;
        self.client.post(ASSETS_PATH, draft).await
    }

    /// Replace an existing asset
    ///
    /// PUT /api/v3/assets/{id}/
    pub async fn update(&self, id: &str, draft: &AssetDraft) -> ApiResult<AssetRecord> {
        draft.validate()?;
        self.client.put(&item_path(id), draft).await
    }

    /// Delete an asset
    ///
    /// DELETE /api/v3/assets/{id}/
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let _: serde_json::Value = self.client.delete(&item_path(id)).await?;
        Ok(())
    }
}

fn item_path(id: &str) -> String {
    format!("{ASSETS_PATH}{}/", id.trim())
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Asset list response, bare or wrapped
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AssetList {
    Bare(Vec<AssetRecord>),
    Wrapped {
        #[serde(alias = "assets", alias = "results")]
        data: Vec<AssetRecord>,
    },
}

impl AssetList {
    fn into_records(self) -> Vec<AssetRecord> {
        match self {
            Self::Bare(records) | Self::Wrapped { data: records } => records,
        }
    }
}

/// An asset as stored by the back-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub name: String,
    #[serde(alias = "type", alias = "asset_type")]
    pub category: String,
    /// GeoJSON point; older records carry a bare pair or WKT
    #[serde(
        default,
        alias = "coordinates",
        deserialize_with = "de::location",
        serialize_with = "ser::location"
    )]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ownership: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "capex", alias = "capex_estimate", deserialize_with = "de::optional_number")]
    pub capex_estimate: Option<f64>,
    #[serde(default, alias = "opex", alias = "opex_estimate", deserialize_with = "de::optional_number")]
    pub opex_estimate: Option<f64>,
}

impl AssetRecord {
    /// Converts to the geo filter's asset type.
    ///
    /// Fails when the record has no usable location.
    pub fn to_asset(&self) -> ApiResult<Asset> {
        let coordinates = self
            .location
            .filter(GeoPoint::is_valid)
            .ok_or_else(|| ApiError::validation(format!("asset {} has no valid location", self.id)))?;

        Ok(
            Asset::new(&self.id, &self.name, &self.category, coordinates).with_attributes(
                AssetAttributes {
                    capacity: self.capacity.clone(),
                    status: self.status.clone(),
                    ownership: self.ownership.clone(),
                    description: self.description.clone(),
                    capex_estimate: self.capex_estimate,
                    opex_estimate: self.opex_estimate,
                },
            ),
        )
    }
}

/// Payload for creating or replacing an asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDraft {
    pub name: String,
    pub category: String,
    #[serde(default, serialize_with = "ser::location")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capex_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opex_estimate: Option<f64>,
}

impl AssetDraft {
    /// Create a draft with the required fields
    pub fn new(name: impl Into<String>, category: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            location: Some(location),
            ..Self::default()
        }
    }

    /// Builder-style method to set cost estimates
    #[must_use]
    pub fn with_costs(mut self, capex: Option<f64>, opex: Option<f64>) -> Self {
        self.capex_estimate = capex;
        self.opex_estimate = opex;
        self
    }

    /// Builder-style method to set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name, category and a valid location are required.
    pub fn validate(&self) -> ApiResult<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("asset name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(ApiError::validation("asset category is required"));
        }
        match self.location {
            None => Err(ApiError::validation("asset location is required")),
            Some(point) => point
                .validate()
                .map_err(|e| ApiError::validation(e.to_string())),
        }?;
        for (name, value) in [("capex", self.capex_estimate), ("opex", self.opex_estimate)] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(ApiError::validation(format!(
                    "{name} estimate must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

mod de {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Text(String),
        Other(serde_json::Value),
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Scalar::deserialize(deserializer)? {
            Scalar::Int(n) => Ok(n.to_string()),
            Scalar::Float(n) => Ok(n.to_string()),
            Scalar::Text(s) => Ok(s),
            Scalar::Other(v) => Err(serde::de::Error::custom(format!("unsupported id: {v}"))),
        }
    }

    /// Numbers pass through; numeric strings are parsed; anything else is absent.
    pub fn optional_number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Int(n) => Some(n as f64),
            Scalar::Float(n) => Some(n),
            Scalar::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            Scalar::Other(_) => None,
        }
        .filter(|v| v.is_finite()))
    }

    pub fn location<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<GeoPoint>, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(parse_point(&value))
    }
}

mod ser {
    use super::*;

    pub fn location<S: Serializer>(point: &Option<GeoPoint>, serializer: S) -> Result<S::Ok, S::Error> {
        point.map(GeoJsonPoint::from).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_geojson_and_string_costs() {
        let record: AssetRecord = serde_json::from_value(json!({
            "id": 12,
            "name": "Kandla Port",
            "category": "Ports",
            "location": {"type": "Point", "coordinates": [70.2167, 23.0333]},
            "capexEstimate": "150",
            "opexEstimate": 80
        }))
        .unwrap();

        assert_eq!(record.id, "12");
        assert_eq!(record.location, Some(GeoPoint::new(70.2167, 23.0333)));
        assert_eq!(record.capex_estimate, Some(150.0));
        assert_eq!(record.opex_estimate, Some(80.0));
    }

    #[test]
    fn test_record_cost_aliases() {
        let snake: AssetRecord = serde_json::from_value(json!({
            "id": "a", "name": "A", "type": "Ports",
            "coordinates": [70.0, 23.0],
            "capex_estimate": 10.5, "opex_estimate": "4"
        }))
        .unwrap();
        assert_eq!(snake.category, "Ports");
        assert_eq!(snake.capex_estimate, Some(10.5));
        assert_eq!(snake.opex_estimate, Some(4.0));

        let short: AssetRecord = serde_json::from_value(json!({
            "id": "b", "name": "B", "category": "Ports",
            "location": "POINT(70 23)",
            "capex": "1,200", "opex": "n/a"
        }))
        .unwrap();
        assert_eq!(short.capex_estimate, Some(1200.0));
        assert_eq!(short.opex_estimate, None);
        assert_eq!(short.location, Some(GeoPoint::new(70.0, 23.0)));
    }

    #[test]
    fn test_to_asset() {
        let record: AssetRecord = serde_json::from_value(json!({
            "id": "guj-3", "name": "Mundra Solar Park", "category": "Renewable Energy Farms",
            "location": {"type": "Point", "coordinates": [69.7, 22.8]},
            "capacity": "750 MW", "capexEstimate": 90
        }))
        .unwrap();

        let asset = record.to_asset().unwrap();
        assert_eq!(asset.id, "guj-3");
        assert_eq!(asset.asset_type, "Renewable Energy Farms");
        assert_eq!(asset.coordinates, GeoPoint::new(69.7, 22.8));
        assert_eq!(asset.attributes.capacity.as_deref(), Some("750 MW"));
        assert_eq!(asset.attributes.capex_estimate, Some(90.0));
    }

    #[test]
    fn test_to_asset_requires_location() {
        let record: AssetRecord =
            serde_json::from_value(json!({"id": "x", "name": "X", "category": "Ports"})).unwrap();
        assert!(matches!(record.to_asset(), Err(ApiError::Validation(_))));

        let bad: AssetRecord = serde_json::from_value(json!({
            "id": "y", "name": "Y", "category": "Ports", "location": [200.0, 0.0]
        }))
        .unwrap();
        assert!(bad.to_asset().is_err());
    }

    #[test]
    fn test_list_envelopes() {
        let bare: AssetList = serde_json::from_value(json!([
            {"id": 1, "name": "A", "category": "Ports"}
        ]))
        .unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped: AssetList = serde_json::from_value(json!({
            "assets": [{"id": 1, "name": "A", "category": "Ports"}, {"id": 2, "name": "B", "category": "Ports"}]
        }))
        .unwrap();
        assert_eq!(wrapped.into_records().len(), 2);
    }

    #[test]
    fn test_draft_validation() {
        let draft = AssetDraft::new("Dahej Storage", "Hydrogen Storage Facilities", GeoPoint::new(72.6, 21.7));
        assert!(draft.validate().is_ok());

        let mut nameless = draft.clone();
        nameless.name = "  ".into();
        assert!(nameless.validate().is_err());

        let mut uncategorized = draft.clone();
        uncategorized.category.clear();
        assert!(uncategorized.validate().is_err());

        let mut unplaced = draft.clone();
        unplaced.location = None;
        assert!(unplaced.validate().is_err());

        let negative = draft.with_costs(Some(-1.0), None);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_draft_serializes_geojson() {
        let draft = AssetDraft::new("A", "Ports", GeoPoint::new(70.0, 23.0)).with_costs(Some(5.0), None);
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["location"], json!({"type": "Point", "coordinates": [70.0, 23.0]}));
        assert_eq!(value["capexEstimate"], json!(5.0));
        assert!(value.get("opexEstimate").is_none());
    }

    #[test]
    fn test_create_rejects_invalid_draft_without_network() {
        let client = H2SiteClient::with_config(crate::ClientConfig::development()).unwrap();
        let result = tokio_test::block_on(client.assets().create(&AssetDraft::default()));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
