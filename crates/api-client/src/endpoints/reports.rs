//! Saved report endpoints

use crate::client::H2SiteClient;
use crate::error::{ApiError, ApiResult};
use h2site_report::{AnalysisResponse, ReportLocation, ReportRecord};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Saved report API interface
#[derive(Clone)]
pub struct ReportsApi {
    client: H2SiteClient,
}

impl ReportsApi {
    /// Create a new reports API interface
    pub(crate) fn new(client: H2SiteClient) -> Self {
        Self { client }
    }

    /// Save an analysis under the user's account
    ///
    /// POST /reports/save
    pub async fn save(
        &self,
        response: &AnalysisResponse,
        location: &ReportLocation,
        email: &str,
    ) -> ApiResult<serde_json::Value> {
        let request = SaveReportRequest::new(response, location, email)?;
        let saved = self.client.post("reports/save", &request).await?;
        info!(location = %location.label(), "Report saved");
        Ok(saved)
    }

    /// List the user's saved reports
    ///
    /// GET /reports/saved?email=<email>
    pub async fn list(&self, email: &str) -> ApiResult<Vec<ReportRecord>> {
        require("email", email)?;
        let base = format!("{}/reports/saved", self.client.base_url().trim_end_matches('/'));
        let url = Url::parse_with_params(&base, &[("email", email)])
            .map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        self.client.get_url(&url).await
    }

    /// Ask the back-end to compare saved reports against a question
    ///
    /// POST /reports
    pub async fn compare(&self, request: &CompareRequest) -> ApiResult<CompareResponse> {
        request.validate()?;
        self.client.post("reports", request).await
    }
}

fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        Err(ApiError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Save request: `message` is the serialized analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReportRequest {
    pub message: String,
    pub email: String,
}

#[derive(Serialize)]
struct SavedAnalysis<'a> {
    location: &'a ReportLocation,
    #[serde(flatten)]
    response: &'a AnalysisResponse,
}

impl SaveReportRequest {
    /// Serializes the analysis and its location into `message`.
    pub fn new(
        response: &AnalysisResponse,
        location: &ReportLocation,
        email: &str,
    ) -> ApiResult<Self> {
        require("email", email)?;
        let message = serde_json::to_string(&SavedAnalysis { location, response })?;
        Ok(Self {
            message,
            email: email.to_string(),
        })
    }
}

/// One report handed to the comparison prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub name: String,
    pub summary: String,
}

/// Comparison request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub reports: Vec<ReportSummary>,
    pub user_question: String,
    pub user_email: String,
}

impl CompareRequest {
    /// Non-empty reports, question and email are required.
    pub fn validate(&self) -> ApiResult<()> {
        if self.reports.is_empty() {
            return Err(ApiError::validation("at least one report is required"));
        }
        require("user_question", &self.user_question)?;
        require("user_email", &self.user_email)
    }
}

/// Comparison answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResponse {
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use h2site_geo::GeoPoint;
    use serde_json::json;

    fn compare_request() -> CompareRequest {
        CompareRequest {
            reports: vec![ReportSummary {
                name: "Kutch".into(),
                summary: "Strong renewables, weak water".into(),
            }],
            user_question: "Which site is cheaper to run?".into(),
            user_email: "analyst@example.com".into(),
        }
    }

    #[test]
    fn test_compare_validation() {
        assert!(compare_request().validate().is_ok());

        let mut empty = compare_request();
        empty.reports.clear();
        assert!(empty.validate().is_err());

        let mut silent = compare_request();
        silent.user_question = " ".into();
        assert!(silent.validate().is_err());

        let mut anonymous = compare_request();
        anonymous.user_email.clear();
        assert!(anonymous.validate().is_err());
    }

    #[test]
    fn test_compare_wire_format() {
        let value = serde_json::to_value(compare_request()).unwrap();
        assert_eq!(value["reports"][0]["name"], "Kutch");
        assert_eq!(value["user_question"], "Which site is cheaper to run?");
        assert_eq!(value["user_email"], "analyst@example.com");

        let answer: CompareResponse = serde_json::from_value(json!({"msg": "Kutch"})).unwrap();
        assert_eq!(answer.msg, "Kutch");
    }

    #[test]
    fn test_save_request_embeds_analysis() {
        let response = AnalysisResponse {
            s_infra: 0.8,
            ai_summary: "Good site.".into(),
            ..AnalysisResponse::default()
        };
        let location = ReportLocation {
            name: Some("Ahmedabad".into()),
            coordinates: GeoPoint::new(72.5714, 23.0225),
            radius_km: 10.0,
        };

        let request = SaveReportRequest::new(&response, &location, "analyst@example.com").unwrap();
        let message: serde_json::Value = serde_json::from_str(&request.message).unwrap();
        assert_eq!(message["s_infra"], json!(0.8));
        assert_eq!(message["location"]["name"], "Ahmedabad");
        assert_eq!(request.email, "analyst@example.com");

        assert!(SaveReportRequest::new(&response, &location, "").is_err());
    }
}
