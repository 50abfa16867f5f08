//! Per-client rate limiting configuration.
//!
//! Requests are metered with a token bucket keyed by client IP:
//!
//! - `RATE_LIMIT_ENABLED`: turn the limiter on or off (default: true)
//! - `RATE_LIMIT_PER_SECOND`: tokens replenished per second (default: 2)
//! - `RATE_LIMIT_BURST_SIZE`: bucket capacity (default: 30)
//!
//! A request that finds the bucket empty is rejected with `429 Too Many Requests`.

use std::num::NonZeroU32;

use governor::Quota;

use crate::{env_lookup, parse_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Rate at which tokens are replenished.
    pub per_second: u32,

    /// Maximum number of tokens that can accumulate, allowing short bursts
    /// above the steady rate.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 2,
            burst_size: 30,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            enabled: parse_or(&lookup, "RATE_LIMIT_ENABLED", defaults.enabled),
            per_second: parse_or(&lookup, "RATE_LIMIT_PER_SECOND", defaults.per_second),
            burst_size: parse_or(&lookup, "RATE_LIMIT_BURST_SIZE", defaults.burst_size),
        }
    }

    /// Governor quota for one client. Zero values are raised to one so the
    /// quota is always constructible.
    #[must_use]
    pub fn quota(&self) -> Quota {
        let per_second = NonZeroU32::new(self.per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(per_second).allow_burst(burst)
    }
}
