//! Client-side rate limiting for outbound service calls
//!
//! A token bucket per key (one per upstream service, e.g. `"backend"` and
//! `"geocoding"`) keeps the CLI under the providers' request quotas.
//!
//! # Example
//!
//! ```
//! use h2site_core::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_minute(600));
//! assert!(limiter.try_acquire("geocoding"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests refilled per window
    pub max_requests: u32,
    /// Refill window
    pub window: Duration,
    /// Extra requests allowed in short bursts
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
            burst: 10,
        }
    }
}

impl RateLimitConfig {
    /// Per-second rate limit
    #[must_use]
    pub fn per_second(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(1),
            burst: max / 2,
        }
    }

    /// Per-minute rate limit
    #[must_use]
    pub fn per_minute(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(60),
            burst: max / 4,
        }
    }

    fn capacity(&self) -> f64 {
        f64::from(self.max_requests.saturating_add(self.burst))
    }

    fn refill_rate(&self) -> f64 {
        f64::from(self.max_requests) / self.window.as_secs_f64().max(f64::EPSILON)
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn full(config: &RateLimitConfig) -> Self {
        Self {
            tokens: config.capacity(),
            last_update: Instant::now(),
        }
    }

    fn refill(&mut self, config: &RateLimitConfig) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * config.refill_rate()).min(config.capacity());
        self.last_update = now;
    }
}

/// Keyed token-bucket rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    buckets: Arc<RwLock<HashMap<String, TokenBucket>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter; every key gets a bucket with `config`.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    fn buckets(&self) -> RwLockWriteGuard<'_, HashMap<String, TokenBucket>> {
        // Bucket contents remain valid after a panic elsewhere.
        self.buckets.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn with_bucket<R>(&self, key: &str, f: impl FnOnce(&mut TokenBucket) -> R) -> R {
        let mut buckets = self.buckets();
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::full(&self.config));
        bucket.refill(&self.config);
        f(bucket)
    }

    /// Try to take one token for `key`.
    #[must_use]
    pub fn try_acquire(&self, key: &str) -> bool {
        self.with_bucket(key, |bucket| {
            if bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                true
            } else {
                false
            }
        })
    }

    /// Time until a token is available for `key`.
    #[must_use]
    pub fn time_until_available(&self, key: &str) -> Duration {
        self.with_bucket(key, |bucket| {
            if bucket.tokens >= 1.0 {
                Duration::ZERO
            } else {
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.config.refill_rate())
            }
        })
    }

    /// Snapshot of the bucket for `key`
    #[must_use]
    pub fn status(&self, key: &str) -> RateLimitStatus {
        self.with_bucket(key, |bucket| RateLimitStatus {
            available: bucket.tokens as u32,
            max: self.config.max_requests.saturating_add(self.config.burst),
        })
    }
}

/// Rate limit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitStatus {
    /// Available tokens
    pub available: u32,
    /// Maximum tokens
    pub max: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(max_requests: u32) -> RateLimitConfig {
        RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
            burst: 0,
        }
    }

    #[test]
    fn test_rate_limiter_basic() {
        let limiter = RateLimiter::new(strict(3));

        assert!(limiter.try_acquire("backend"));
        assert!(limiter.try_acquire("backend"));
        assert!(limiter.try_acquire("backend"));
        assert!(!limiter.try_acquire("backend"));
        assert!(limiter.time_until_available("backend") > Duration::ZERO);
    }

    #[test]
    fn test_rate_limiter_with_burst() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
            burst: 2,
        });

        for _ in 0..4 {
            assert!(limiter.try_acquire("geocoding"));
        }
        assert!(!limiter.try_acquire("geocoding"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(strict(1));

        assert!(limiter.try_acquire("backend"));
        assert!(!limiter.try_acquire("backend"));
        assert!(limiter.try_acquire("geocoding"));
    }

    #[test]
    fn test_status() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 10,
            window: Duration::from_secs(60),
            burst: 5,
        });

        let status = limiter.status("backend");
        assert_eq!(status.max, 15);
        assert_eq!(status.available, 15);
    }
}
