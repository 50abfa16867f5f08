//! Cross-cutting request middleware.
//!
//! - [`rate_limit`]: per-client token bucket, `429` when exhausted

pub mod rate_limit;
