//! Host configuration parsed from environment variables.
//!
//! Only the binary reads the environment. Library modules take typed config.

use crate::agent::config::LayoutServiceConfig;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing config: env var {0} not set")]
    Missing(String),

    /// An environment variable is set but unusable.
    #[error("invalid config {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "E_CONFIG_MISSING",
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub layout: LayoutServiceConfig,
}

impl AppConfig {
    /// Build host config from environment variables.
    ///
    /// - `PORT`: default 3000
    /// - `LAYOUT_SERVICE_URL` and timeouts: see [`LayoutServiceConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns an error if the layout service config is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse("PORT", DEFAULT_PORT);
        let layout = LayoutServiceConfig::from_env()?;
        Ok(Self { port, layout })
    }
}

/// Read and parse an env var, falling back to `default` when unset or unparsable.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_parse_u64(key: &str, default: u64) -> u64 {
    env_parse(key, default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
