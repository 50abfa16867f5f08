use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use classflow_config::{CorsConfig, DatabaseConfig, RateLimitConfig};
use classflow_db::init_db_pool;
use governor::{DefaultKeyedRateLimiter, RateLimiter};
use sqlx::PgPool;

/// Token buckets keyed by client address.
pub type ClientRateLimiter = DefaultKeyedRateLimiter<String>;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    /// `None` when rate limiting is disabled.
    pub rate_limiter: Option<Arc<ClientRateLimiter>>,
}

impl AppState {
    pub fn new(db: PgPool, cors_config: CorsConfig, rate_limit_config: RateLimitConfig) -> Self {
        let rate_limiter = rate_limit_config
            .enabled
            .then(|| Arc::new(RateLimiter::keyed(rate_limit_config.quota())));

        Self {
            db,
            cors_config,
            rate_limit_config,
            rate_limiter,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env()?;
    let db = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;

    Ok(AppState::new(
        db,
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
    ))
}
