//! Service configuration read from the environment.

use std::time::Duration;

use study_core::WrittenMatching;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration.
///
/// Env vars:
/// - DATABASE_URL: Postgres connection string (required)
/// - HOST / PORT: listen address (default 0.0.0.0:3000)
/// - AUTH_CACHE_TTL_SECS: how long a resolved login session is reused (default 30)
/// - AUTH_CACHE_CAPACITY: max cached login sessions (default 1000)
/// - STUDY_SESSION_TTL_SECS: idle lifetime of a study session (default 3600)
/// - STUDY_SESSION_CAPACITY: max live study sessions (default 10000)
/// - WRITTEN_MATCHING: "contains" or "similarity" (default contains)
/// - WRITTEN_SIMILARITY_THRESHOLD: threshold for "similarity" (default 0.8)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub auth_cache_ttl: Duration,
    pub auth_cache_capacity: usize,
    pub study_session_ttl: Duration,
    pub study_session_capacity: usize,
    pub written_matching: WrittenMatching,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let written_matching = match lookup("WRITTEN_MATCHING").as_deref() {
            None | Some("contains") => WrittenMatching::Contains,
            Some("similarity") => WrittenMatching::Similarity {
                threshold: parse_or(&lookup, "WRITTEN_SIMILARITY_THRESHOLD", 0.8)?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "WRITTEN_MATCHING",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            auth_cache_ttl: Duration::from_secs(parse_or(&lookup, "AUTH_CACHE_TTL_SECS", 30)?),
            auth_cache_capacity: parse_or(&lookup, "AUTH_CACHE_CAPACITY", 1000)?,
            study_session_ttl: Duration::from_secs(parse_or(&lookup, "STUDY_SESSION_TTL_SECS", 3600)?),
            study_session_capacity: parse_or(&lookup, "STUDY_SESSION_CAPACITY", 10_000)?,
            written_matching,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
