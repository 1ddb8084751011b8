//! Geocoding endpoints (Mapbox places API)

use crate::client::H2SiteClient;
use crate::error::{ApiError, ApiResult};
use h2site_geo::GeoPoint;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const FORWARD_TYPES: &str = "place,locality,neighborhood,address,poi";
const REVERSE_TYPES: &str = "place,locality,neighborhood,address";
const FORWARD_LIMIT: &str = "5";

/// Name used when reverse geocoding finds nothing
pub const FALLBACK_LOCATION_NAME: &str = "Selected Location";

/// Geocoding API interface
#[derive(Clone)]
pub struct GeocodingApi {
    client: H2SiteClient,
}

impl GeocodingApi {
    /// Create a new geocoding API interface
    pub(crate) fn new(client: H2SiteClient) -> Self {
        Self { client }
    }

    /// Search places by free text; at most five results, best first
    ///
    /// GET /mapbox.places/{query}.json
    pub async fn forward(&self, query: &str) -> ApiResult<Vec<LocationData>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.places_url(
            &format!("{query}.json"),
            &[
                ("types", FORWARD_TYPES),
                ("limit", FORWARD_LIMIT),
                ("language", "en"),
            ],
        )?;
        let collection: FeatureCollection = self.client.get_url(&url).await?;
        let locations = collection.into_locations();
        debug!(query, results = locations.len(), "Forward geocoded");
        Ok(locations)
    }

    /// Name the place at a point
    ///
    /// GET /mapbox.places/{lon},{lat}.json
    ///
    /// An empty result yields the fallback location rather than an error.
    pub async fn reverse(&self, point: GeoPoint) -> ApiResult<LocationData> {
        point
            .validate()
            .map_err(|e| ApiError::validation(e.to_string()))?;

        let url = self.places_url(
            &format!("{},{}.json", point.longitude, point.latitude),
            &[("types", REVERSE_TYPES)],
        )?;
        let collection: FeatureCollection = self.client.get_url(&url).await?;

        Ok(collection
            .features
            .into_iter()
            .next()
            .map_or_else(|| LocationData::fallback(point), |f| f.at(point)))
    }

    /// [`Self::reverse`], degrading to the fallback location on any failure
    pub async fn reverse_or_fallback(&self, point: GeoPoint) -> LocationData {
        match self.reverse(point).await {
            Ok(location) => location,
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                LocationData::fallback(point)
            }
        }
    }

    fn places_url(&self, resource: &str, params: &[(&str, &str)]) -> ApiResult<Url> {
        let config = self.client.config();
        let token = config
            .mapbox_token
            .as_deref()
            .ok_or_else(|| ApiError::missing_env("MAPBOX_ACCESS_TOKEN"))?;

        places_url(&config.geocoding_url, resource, token, params)
    }
}

fn places_url(base: &str, resource: &str, token: &str, params: &[(&str, &str)]) -> ApiResult<Url> {
    let mut url = Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push("mapbox.places")
        .push(resource);

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("access_token", token);
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub name: String,
    /// `[longitude, latitude]`
    pub coordinates: GeoPoint,
    pub address: String,
}

impl LocationData {
    /// Unnamed point, addressed as `lat, lon` to four decimals
    pub fn fallback(point: GeoPoint) -> Self {
        Self {
            name: FALLBACK_LOCATION_NAME.to_string(),
            coordinates: point,
            address: format!("{:.4}, {:.4}", point.latitude, point.longitude),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

impl FeatureCollection {
    fn into_locations(self) -> Vec<LocationData> {
        self.features
            .into_iter()
            .filter_map(|feature| {
                let center = feature.center.filter(GeoPoint::is_valid)?;
                Some(feature.at(center))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    place_name: Option<String>,
    #[serde(default)]
    center: Option<GeoPoint>,
}

impl Feature {
    fn at(self, coordinates: GeoPoint) -> LocationData {
        let text = self.text.filter(|t| !t.is_empty());
        let place_name = self.place_name.filter(|p| !p.is_empty());

        let name = text
            .clone()
            .or_else(|| {
                place_name
                    .as_deref()
                    .and_then(|p| p.split(',').next())
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_else(|| FALLBACK_LOCATION_NAME.to_string());

        let address = place_name
            .or(text)
            .unwrap_or_else(|| LocationData::fallback(coordinates).address);

        LocationData {
            name,
            coordinates,
            address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_places_url_encodes_query() {
        let url = places_url(
            "https://api.mapbox.com/geocoding/v5",
            "Ahmedabad, Gujarat.json",
            "pk.test",
            &[("types", FORWARD_TYPES), ("limit", "5"), ("language", "en")],
        )
        .unwrap();

        assert_eq!(
            url.path(),
            "/geocoding/v5/mapbox.places/Ahmedabad,%20Gujarat.json"
        );
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("access_token".into(), "pk.test".into()));
        assert!(pairs.contains(&("types".into(), FORWARD_TYPES.into())));
        assert!(pairs.contains(&("limit".into(), "5".into())));
    }

    #[test]
    fn test_places_url_trailing_slash_base() {
        let url = places_url("https://geo.example.com/v5/", "1,2.json", "t", &[]).unwrap();
        assert_eq!(url.path(), "/v5/mapbox.places/1,2.json");
    }

    #[test]
    fn test_feature_collection_to_locations() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "features": [
                {"text": "Ahmedabad", "place_name": "Ahmedabad, Gujarat, India", "center": [72.58, 23.03]},
                {"place_name": "Gandhinagar, Gujarat, India", "center": [72.64, 23.22]},
                {"text": "Nowhere"}
            ]
        }))
        .unwrap();

        let locations = collection.into_locations();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].name, "Ahmedabad");
        assert_eq!(locations[0].address, "Ahmedabad, Gujarat, India");
        assert_eq!(locations[0].coordinates, GeoPoint::new(72.58, 23.03));
        assert_eq!(locations[1].name, "Gandhinagar");
    }

    #[test]
    fn test_fallback_location() {
        let location = LocationData::fallback(GeoPoint::new(72.571_43, 23.022_51));
        assert_eq!(location.name, "Selected Location");
        assert_eq!(location.address, "23.0225, 72.5714");
    }

    #[test]
    fn test_missing_token() {
        let config = crate::ClientConfig::development();
        let config = crate::ClientConfig {
            mapbox_token: None,
            ..config
        };
        let client = H2SiteClient::with_config(config).unwrap();
        let result = tokio_test::block_on(client.geocoding().forward("Kutch"));
        assert!(matches!(result, Err(ApiError::MissingEnvVar(_))));
    }

    #[test]
    fn test_blank_query_is_empty() {
        let client = H2SiteClient::with_config(crate::ClientConfig::development()).unwrap();
        let result = tokio_test::block_on(client.geocoding().forward("   ")).unwrap();
        assert!(result.is_empty());
    }
}
