//! Configuration for the h2site API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use h2site_core::rate_limit::RateLimitConfig;
use h2site_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default production analysis back-end
const DEFAULT_API_URL: &str = "https://api.h2site.dev";

/// Local back-end started with `uvicorn main:app`
const DEVELOPMENT_API_URL: &str = "http://localhost:8000";

/// Mapbox geocoding v5 base
pub const DEFAULT_GEOCODING_URL: &str = "https://api.mapbox.com/geocoding/v5";

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development back-end
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse from `H2SITE_ENV`
    pub fn from_env() -> Self {
        Self::parse(&env::var("H2SITE_ENV").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the analysis back-end (assets, analyse, reports, health)
    pub base_url: String,
    /// Base URL of the geocoding service
    pub geocoding_url: String,
    /// Geocoding access token; geocoding calls fail with `MissingEnvVar` without it
    #[serde(skip_serializing)]
    pub mapbox_token: Option<String>,
    /// Identity-provider ID token forwarded as a bearer token to the back-end
    #[serde(skip_serializing)]
    pub id_token: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            mapbox_token: None,
            id_token: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::per_minute(100),
            environment: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `H2SITE_API_URL`: Base URL of the analysis back-end
    /// - `H2SITE_GEOCODING_URL`: Geocoding service base URL
    /// - `MAPBOX_ACCESS_TOKEN`: Geocoding access token
    /// - `H2SITE_ID_TOKEN`: Bearer token for the back-end
    /// - `H2SITE_ENV`: Environment (development/staging/production)
    /// - `H2SITE_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let mut config = match Environment::from_env() {
            Environment::Development => Self::development(),
            Environment::Staging => Self::staging(),
            Environment::Production => Self::production(),
        };

        if let Ok(url) = env::var("H2SITE_API_URL") {
            config.base_url = url;
        }
        if let Ok(url) = env::var("H2SITE_GEOCODING_URL") {
            config.geocoding_url = url;
        }

        if let Ok(raw) = env::var("H2SITE_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ApiError::config(format!("H2SITE_TIMEOUT_SECS is not a number: {raw}")))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Create development configuration (local back-end)
    #[must_use]
    pub fn development() -> Self {
        Self {
            base_url: DEVELOPMENT_API_URL.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            mapbox_token: env::var("MAPBOX_ACCESS_TOKEN").ok(),
            id_token: env::var("H2SITE_ID_TOKEN").ok(),
            timeout: Duration::from_secs(10),
            retry: RetryConfig::quick(),
            rate_limit: RateLimitConfig::per_minute(1000),
            environment: Environment::Development,
        }
    }

    /// Create staging configuration
    #[must_use]
    pub fn staging() -> Self {
        Self {
            base_url: env::var("STAGING_H2SITE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            mapbox_token: env::var("MAPBOX_ACCESS_TOKEN").ok(),
            id_token: env::var("STAGING_H2SITE_ID_TOKEN")
                .or_else(|_| env::var("H2SITE_ID_TOKEN"))
                .ok(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::per_minute(200),
            environment: Environment::Staging,
        }
    }

    /// Create production configuration
    ///
    /// Analysis runs the scoring model and an LLM summary server-side, so the
    /// retry policy is the slow one.
    #[must_use]
    pub fn production() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            mapbox_token: env::var("MAPBOX_ACCESS_TOKEN").ok(),
            id_token: env::var("H2SITE_ID_TOKEN").ok(),
            timeout: Duration::from_secs(60),
            retry: RetryConfig::analysis(),
            rate_limit: RateLimitConfig::per_minute(100),
            environment: Environment::Production,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the geocoding URL
    #[must_use]
    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    /// Builder-style method to set the geocoding token
    #[must_use]
    pub fn with_mapbox_token(mut self, token: impl Into<String>) -> Self {
        self.mapbox_token = Some(token.into());
        self
    }

    /// Builder-style method to set the bearer token
    #[must_use]
    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (name, url) in [("base_url", &self.base_url), ("geocoding_url", &self.geocoding_url)] {
            if url.is_empty() {
                return Err(ApiError::config(format!("{name} cannot be empty")));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::config(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.id_token.is_none());
    }

    #[test]
    fn test_development_config() {
        let config = ClientConfig::development();
        assert!(config.base_url.contains("localhost"));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.retry, RetryConfig::quick());
    }

    #[test]
    fn test_production_uses_analysis_retry() {
        let config = ClientConfig::production();
        assert_eq!(config.retry, RetryConfig::analysis());
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("dev"), Environment::Development);
        assert_eq!(Environment::parse("STAGING"), Environment::Staging);
        assert_eq!(Environment::parse(""), Environment::Production);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("http://10.0.0.5:8000")
            .with_id_token("token")
            .with_timeout(Duration::from_secs(90));

        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.id_token.as_deref(), Some("token"));
        assert_eq!(config.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(ClientConfig::default().with_geocoding_url("ftp://x").validate().is_err());
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_tokens_not_serialized() {
        let config = ClientConfig::default().with_id_token("secret").with_mapbox_token("pk.x");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("pk.x"));
    }
}
