//! # ClassFlow Config
//!
//! Configuration types for the ClassFlow API, loaded from environment
//! variables:
//!
//! - [`server`]: HTTP and metrics listeners
//! - [`database`]: PostgreSQL connection settings
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: per-client request quotas
//!
//! Every `from_env()` falls back to defaults for unset or unparseable
//! values. The `from_lookup()` variants take the lookup function explicitly.
//!
//! ```ignore
//! use classflow_config::{CorsConfig, DatabaseConfig, RateLimitConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let database = DatabaseConfig::from_env()?;
//! let cors = CorsConfig::from_env();
//! let rate_limit = RateLimitConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use database::{DatabaseConfig, MissingDatabaseUrl};
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Reads `key` through `lookup` and parses it, falling back to `default`.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
