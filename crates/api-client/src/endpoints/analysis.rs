//! Site analysis endpoint

use crate::client::H2SiteClient;
use crate::error::{ApiError, ApiResult};
use h2site_geo::GeoPoint;
use h2site_report::AnalysisResponse;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Site analysis API interface
#[derive(Clone)]
pub struct AnalysisApi {
    client: H2SiteClient,
}

impl AnalysisApi {
    /// Create a new analysis API interface
    pub(crate) fn new(client: H2SiteClient) -> Self {
        Self { client }
    }

    /// Score a candidate site and get the AI summary
    ///
    /// POST /analyse
    pub async fn analyse(&self, request: &AnalysisRequest) -> ApiResult<AnalysisResponse> {
        request.validate()?;
        let response: AnalysisResponse = self.client.post("analyse", request).await?;
        info!(
            lat = request.curr_lat,
            lon = request.curr_lon,
            radius_km = request.curr_range,
            average = response.s_avg,
            "Site analysed"
        );
        Ok(response)
    }
}

/// Analysis request, in the back-end's field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub curr_lat: f64,
    pub curr_lon: f64,
    /// Radius in kilometers
    pub curr_range: f64,
    pub w_infra: f64,
    pub w_econ: f64,
    pub w_env: f64,
    /// Free-text intent passed to the summary prompt
    #[serde(default)]
    pub description: String,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

impl AnalysisRequest {
    /// Request with equal factor weights and no description
    pub fn new(center: GeoPoint, radius_km: f64) -> Self {
        Self {
            curr_lat: center.latitude,
            curr_lon: center.longitude,
            curr_range: radius_km,
            w_infra: 1.0,
            w_econ: 1.0,
            w_env: 1.0,
            description: String::new(),
            user_email: None,
        }
    }

    /// Builder-style method to set the slider weights
    #[must_use]
    pub fn with_weights(mut self, infrastructure: f64, environment: f64, economic: f64) -> Self {
        self.w_infra = infrastructure;
        self.w_env = environment;
        self.w_econ = economic;
        self
    }

    /// Builder-style method to set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style method to set the requesting user
    #[must_use]
    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    /// Center of the analysis
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.curr_lon, self.curr_lat)
    }

    /// Rejects an invalid center, a non-positive radius, or bad weights.
    pub fn validate(&self) -> ApiResult<()> {
        self.center()
            .validate()
            .map_err(|e| ApiError::validation(e.to_string()))?;

        if !self.curr_range.is_finite() || self.curr_range <= 0.0 {
            return Err(ApiError::validation(format!(
                "radius must be a positive number of kilometers, got {}",
                self.curr_range
            )));
        }

        for (name, weight) in [
            ("infrastructure", self.w_infra),
            ("environment", self.w_env),
            ("economic", self.w_econ),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ApiError::validation(format!(
                    "{name} weight must be a non-negative number, got {weight}"
                )));
            }
        }

        Ok(())
    }
}
