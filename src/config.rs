//! Configuration parsed from environment variables.
//!
//! - `TPMAIL_API_URL`: backend base URL (default `http://localhost:3000/api`)
//! - `PORT`: gateway listen port (default 3001)
//! - `DASHBOARD_DIR`: pre-built dashboard bundle served by the gateway
//!   (default `dashboard`)
//! - `COOKIE_FILE`: where the CLI keeps its credential cookie
//!   (default `.tpmail-session`)

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DASHBOARD_DIR: &str = "dashboard";
pub const DEFAULT_COOKIE_FILE: &str = ".tpmail-session";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: String, value: String },
}

// =============================================================================
// API
// =============================================================================

/// Where the backend lives. Fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env_string("TPMAIL_API_URL", DEFAULT_API_URL))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: u16,
    pub dashboard_dir: PathBuf,
}

impl GatewayConfig {
    /// Build gateway config from `PORT` and `DASHBOARD_DIR`.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: env_parse_strict("PORT", DEFAULT_PORT)?,
            dashboard_dir: PathBuf::from(env_string("DASHBOARD_DIR", DEFAULT_DASHBOARD_DIR)),
        })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Read `key`, falling back to `default` when unset or blank.
#[must_use]
pub fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Parse `key` when set; unset or blank means `default`, anything else must parse.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` if the value is present but does not parse.
pub fn env_parse_strict<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key).ok().map(|v| v.trim().to_owned()) {
        None => Ok(default),
        Some(raw) if raw.is_empty() => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key.to_owned(), value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
