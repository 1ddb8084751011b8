//! Middleware components for request/response processing
//!
//! Re-exports the resilience primitives from `h2site-core` that the client is built on.

pub use h2site_core::rate_limit::{RateLimitConfig, RateLimitStatus, RateLimiter};
pub use h2site_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState, RetryConfig};
