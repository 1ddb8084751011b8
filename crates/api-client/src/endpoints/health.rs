//! Health check endpoints

use crate::client::H2SiteClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health check API interface
#[derive(Clone)]
pub struct HealthApi {
    client: H2SiteClient,
}

impl HealthApi {
    /// Create a new health API interface
    pub(crate) fn new(client: H2SiteClient) -> Self {
        Self { client }
    }

    /// Check back-end health
    ///
    /// GET /health
    pub async fn check(&self) -> ApiResult<HealthResponse> {
        self.client.get("health").await
    }

    /// Check health with timing information
    pub async fn check_timed(&self) -> ApiResult<(HealthResponse, Duration)> {
        self.client.timed_get("health").await
    }
}

/// Health check response from the back-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Human-readable status line
    #[serde(default)]
    pub message: String,
    /// Health status, e.g. "ok"
    pub status: String,
}

impl HealthResponse {
    /// Whether the reported status means the service is up
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(
            self.status.to_ascii_lowercase().as_str(),
            "ok" | "healthy" | "up"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_deserialize() {
        let json = r#"{"message": "Hydrogen site API is running", "status": "ok"}"#;

        let response: HealthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "ok");
        assert!(response.is_healthy());
    }

    #[test]
    fn test_unhealthy_status() {
        let response: HealthResponse = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(response.message.is_empty());
        assert!(!response.is_healthy());
    }
}
