//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AnalysisApi, AssetsApi, GeocodingApi, HealthApi, ReportsApi};
use crate::error::{ApiError, ApiResult, ErrorContext};
use h2site_core::rate_limit::{RateLimitStatus, RateLimiter};
use h2site_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// h2site API client with built-in resilience patterns
///
/// This client wraps `reqwest` and adds:
/// - Automatic retry with exponential backoff
/// - Circuit breaker to prevent cascading failures
/// - Rate limiting per upstream service
/// - Request correlation IDs for tracing
///
/// Clones share the breaker and the limiter.
#[derive(Clone)]
pub struct H2SiteClient {
    inner: Client,
    config: Arc<ClientConfig>,
    circuit_breaker: Arc<CircuitBreaker>,
    rate_limiter: RateLimiter,
}

impl H2SiteClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("h2site-api-client/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()?;

        let circuit_breaker = Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default()));
        let rate_limiter = RateLimiter::new(config.rate_limit.clone());

        Ok(Self {
            inner,
            config: Arc::new(config),
            circuit_breaker,
            rate_limiter,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the back-end base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    /// Remaining request budget for an upstream service
    #[must_use]
    pub fn rate_limit_status(&self, service: &str) -> RateLimitStatus {
        self.rate_limiter.status(service)
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access asset catalogue endpoints
    #[must_use]
    pub fn assets(&self) -> AssetsApi {
        AssetsApi::new(self.clone())
    }

    /// Access site analysis endpoints
    #[must_use]
    pub fn analysis(&self) -> AnalysisApi {
        AnalysisApi::new(self.clone())
    }

    /// Access saved report endpoints
    #[must_use]
    pub fn reports(&self) -> ReportsApi {
        ReportsApi::new(self.clone())
    }

    /// Access geocoding endpoints
    #[must_use]
    pub fn geocoding(&self) -> GeocodingApi {
        GeocodingApi::new(self.clone())
    }

    /// Access health check endpoints
    #[must_use]
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods with resilience
    // -------------------------------------------------------------------------

    /// Perform a GET request with resilience patterns
    #[instrument(skip(self), fields(request_id))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::GET, path, Option::<&()>::None).await
    }

    /// Perform a GET request to an absolute URL
    #[instrument(skip(self, url), fields(request_id))]
    pub async fn get_url<T: DeserializeOwned>(&self, url: &Url) -> ApiResult<T> {
        self.request_url(Method::GET, url.as_str(), Option::<&()>::None)
            .await
    }

    /// Perform a POST request with resilience patterns
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Perform a PUT request with resilience patterns
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Perform a DELETE request with resilience patterns
    #[instrument(skip(self), fields(request_id))]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::DELETE, path, Option::<&()>::None).await
    }

    fn backend_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn is_backend(&self, url: &str) -> bool {
        same_service(&self.config.base_url, url)
    }

    /// Execute a request with full resilience patterns
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let url = self.backend_url(path);
        self.request_url(method, &url, body).await
    }

    /// Execute a request to an absolute URL with full resilience patterns
    async fn request_url<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let rate_limit_key = self.rate_limit_key(url);
        tracing::Span::current().record("request_id", request_id.as_str());

        // Check circuit breaker
        if !self.circuit_breaker.can_execute() {
            warn!(
                request_id = %request_id,
                url = %strip_query(url),
                "Circuit breaker is open, rejecting request"
            );
            return Err(ApiError::CircuitOpen);
        }

        // Check rate limiter
        if !self.rate_limiter.try_acquire(rate_limit_key) {
            warn!(
                request_id = %request_id,
                url = %strip_query(url),
                service = rate_limit_key,
                retry_after_ms = self.rate_limiter.time_until_available(rate_limit_key).as_millis(),
                "Rate limited"
            );
            return Err(ApiError::RateLimited);
        }

        let context = ErrorContext {
            request_id: Some(request_id),
            endpoint: strip_query(url).to_string(),
            method: method.to_string(),
        };

        // Execute with retry
        self.execute_with_retry(&context, method, url, body).await
    }

    /// Execute request with retry logic
    async fn execute_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        context: &ErrorContext,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let retry_config = &self.config.retry;
        let request_id = context.request_id.as_deref().unwrap_or_default();
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self
                .execute_single_request(request_id, method.clone(), url, body)
                .await;
            let elapsed = start.elapsed();

            match result {
                Ok(value) => {
                    self.circuit_breaker.record_success();
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => {
                    // Client errors say nothing about upstream health
                    if !e.is_client_error() {
                        self.circuit_breaker.record_failure();
                    }

                    if e.is_retryable() && attempt + 1 < retry_config.max_attempts {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, will retry"
                        );
                        last_error = Some(e);
                    } else {
                        warn!(
                            context = %context,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, not retrying"
                        );
                        return Err(e);
                    }
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single request without retry
    async fn execute_single_request<T: DeserializeOwned, B: Serialize>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, request_id);

        // The ID token only goes to our own back-end
        if let Some(ref token) = self.config.id_token {
            if self.is_backend(url) {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.config.timeout)
            } else {
                ApiError::from(e)
            }
        })?;
        self.handle_response(response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            // Some back-end routes answer 204 or an empty body on success
            if bytes.is_empty() {
                return Ok(serde_json::from_str("null")?);
            }
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }

    /// Get duration timing for a request
    pub async fn timed_get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<(T, Duration)> {
        let start = Instant::now();
        let result = self.get(path).await?;
        Ok((result, start.elapsed()))
    }

    /// Rate-limit bucket for a URL: one per upstream service
    fn rate_limit_key(&self, url: &str) -> &'static str {
        if self.is_backend(url) {
            "backend"
        } else if same_service(&self.config.geocoding_url, url) {
            "geocoding"
        } else {
            "external"
        }
    }
}

impl std::fmt::Debug for H2SiteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("H2SiteClient")
            .field("base_url", &self.config.base_url)
            .field("environment", &self.config.environment)
            .field("circuit_state", &self.circuit_state())
            .finish_non_exhaustive()
    }
}

/// Whether `url` is served by the service rooted at `base`: same scheme,
/// host and port, with a path under the base path.
fn same_service(base: &str, url: &str) -> bool {
    let (Ok(base), Ok(url)) = (Url::parse(base), Url::parse(url)) else {
        return false;
    };
    if base.scheme() != url.scheme()
        || base.host_str() != url.host_str()
        || base.port_or_known_default() != url.port_or_known_default()
    {
        return false;
    }

    let root = base.path().trim_end_matches('/');
    let path = url.path();
    root.is_empty()
        || path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// URL without its query string, so tokens never reach the logs
fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> H2SiteClient {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8000")
            .with_geocoding_url("https://api.mapbox.com/geocoding/v5");
        H2SiteClient::with_config(config).unwrap()
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(
            strip_query("https://api.mapbox.com/geocoding/v5/x.json?access_token=pk.1"),
            "https://api.mapbox.com/geocoding/v5/x.json"
        );
        assert_eq!(strip_query("http://localhost:8000/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_rate_limit_keys_per_service() {
        let client = client();
        assert_eq!(client.rate_limit_key("http://localhost:8000/analyse"), "backend");
        assert_eq!(
            client.rate_limit_key("https://api.mapbox.com/geocoding/v5/mapbox.places/a.json"),
            "geocoding"
        );
        assert_eq!(client.rate_limit_key("https://example.com/x"), "external");
    }

    #[test]
    fn test_same_service_compares_origin() {
        assert!(same_service("http://localhost:8000", "http://localhost:8000/analyse"));
        assert!(same_service("http://localhost:8000/", "http://localhost:8000"));
        assert!(!same_service("http://localhost:8000", "http://localhost:80001/analyse"));
        assert!(!same_service("http://localhost:8000", "https://localhost:8000/analyse"));
        assert!(!same_service("http://localhost:8000", "http://localhost.evil.com:8000/x"));
        assert!(same_service("https://api.example.com:443/v1", "https://api.example.com/v1/x"));
        assert!(!same_service("https://api.example.com/v1", "https://api.example.com/v10/x"));
        assert!(!same_service("not a url", "http://localhost:8000"));
    }

    #[test]
    fn test_id_token_only_for_backend() {
        let client = client();
        assert!(client.is_backend("http://localhost:8000/reports/save"));
        assert!(!client.is_backend("http://localhost:80001/reports/save"));
        assert!(!client.is_backend("https://api.mapbox.com/geocoding/v5/mapbox.places/a.json"));
    }

    #[test]
    fn test_backend_url_joins_slashes() {
        let client = H2SiteClient::with_config(
            ClientConfig::default().with_base_url("http://localhost:8000/"),
        )
        .unwrap();
        assert_eq!(client.backend_url("/health"), "http://localhost:8000/health");
        assert_eq!(client.backend_url("analyse"), "http://localhost:8000/analyse");
    }

    #[test]
    fn test_client_creation() {
        let client = H2SiteClient::with_config(ClientConfig::development());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().circuit_state(), CircuitState::Closed);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = H2SiteClient::with_config(ClientConfig::default().with_base_url("localhost"));
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_unreachable_backend_is_request_error() {
        // Port 9 (discard) is closed on loopback
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_retry(h2site_core::retry::RetryConfig::no_retry())
            .with_timeout(Duration::from_secs(2));
        let client = H2SiteClient::with_config(config).unwrap();

        let before = client.rate_limit_status("backend");
        let result: ApiResult<serde_json::Value> = tokio_test::block_on(client.get("health"));
        assert!(result.is_err());

        let after = client.rate_limit_status("backend");
        assert_eq!(after.max, before.max);
        assert!(after.available < before.available);
    }

    #[test]
    fn test_transport_error_hides_query_token() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_geocoding_url("http://127.0.0.1:9/geocoding/v5")
            .with_mapbox_token("pk.SECRET_TOKEN")
            .with_retry(h2site_core::retry::RetryConfig::no_retry())
            .with_timeout(Duration::from_secs(2));
        let client = H2SiteClient::with_config(config).unwrap();

        let err = tokio_test::block_on(client.geocoding().forward("Ahmedabad")).unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("SECRET_TOKEN"), "{message}");
        assert!(!format!("{err:?}").contains("SECRET_TOKEN"));
    }
}
