//! Core utilities shared by the h2site crates
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: `h2site.toml` loading with defaults and validation
//! - **Retry / circuit breaker**: backoff policy for back-end calls
//! - **Rate limiting**: token buckets for outbound service quotas
//!
//! # Example
//!
//! ```rust,no_run
//! use h2site_core::config::Config;
//!
//! let config = Config::load(None)?;
//! println!("default radius: {} km", config.schema.explore.default_radius_km);
//! # Ok::<(), h2site_core::Error>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::retry::{CircuitBreaker, CircuitBreakerConfig, RetryConfig};
}
