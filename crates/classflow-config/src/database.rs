use std::fmt;

use crate::{env_lookup, parse_or};

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// `DATABASE_URL` is the one setting without a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingDatabaseUrl;

impl fmt::Display for MissingDatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DATABASE_URL must be set")
    }
}

impl std::error::Error for MissingDatabaseUrl {}

impl DatabaseConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

    pub fn from_env() -> Result<Self, MissingDatabaseUrl> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, MissingDatabaseUrl>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|u| !u.trim().is_empty())
            .ok_or(MissingDatabaseUrl)?;

        Ok(Self {
            url,
            max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                Self::DEFAULT_MAX_CONNECTIONS,
            )
            .max(1),
        })
    }
}

// Keeps credentials embedded in the URL out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
