//! Layout service configuration parsed from environment variables.

use crate::config::{ConfigError, env_parse_u64};

pub const DEFAULT_LAYOUT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LAYOUT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for LayoutTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_LAYOUT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LAYOUT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutServiceConfig {
    pub url: String,
    pub timeouts: LayoutTimeouts,
}

impl LayoutServiceConfig {
    /// Build typed layout service config from environment variables.
    ///
    /// Required:
    /// - `LAYOUT_SERVICE_URL`: endpoint that turns markdown into a layout
    ///
    /// Optional:
    /// - `LAYOUT_REQUEST_TIMEOUT_SECS`: default 60
    /// - `LAYOUT_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the URL is unset and
    /// [`ConfigError::Invalid`] if it is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("LAYOUT_SERVICE_URL").map_err(|_| ConfigError::Missing("LAYOUT_SERVICE_URL".into()))?;
        let url = parse_service_url(&raw)?;
        let timeouts = LayoutTimeouts {
            request_secs: env_parse_u64("LAYOUT_REQUEST_TIMEOUT_SECS", DEFAULT_LAYOUT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("LAYOUT_CONNECT_TIMEOUT_SECS", DEFAULT_LAYOUT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { url, timeouts })
    }
}

fn parse_service_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            var: "LAYOUT_SERVICE_URL".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
