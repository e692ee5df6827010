use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:5173,http://localhost:3000,http://localhost:4173,http://localhost:8080";

/// Process-wide settings, read once at startup and never reloaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub cors_origins: Vec<String>,
    pub api_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {}", path.display());
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `load` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url =
            var(&lookup, "API_BASE_URL").ok_or(ConfigError::Missing("API_BASE_URL"))?;
        let cors_origins: String = try_load(&lookup, "CORS_ORIGINS", DEFAULT_CORS_ORIGINS)?;

        Ok(Self {
            port: try_load(&lookup, "PORT", "3001")?,
            api_base_url: normalize_base_url(&api_base_url),
            cors_origins: parse_origins(&cors_origins),
            api_timeout: Duration::from_millis(try_load(&lookup, "API_TIMEOUT_MS", "10000")?),
        })
    }
}

fn var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    let value = lookup(key).filter(|v| !v.trim().is_empty());
    if value.is_none() {
        warn!("Environment variable {key} not found");
    }

    value
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(lookup, key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

/// Upstream paths are appended with a leading slash, so the base never keeps a trailing one.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
