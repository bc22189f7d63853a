//! HTTP layout source.
//!
//! Thin wrapper around a single POST endpoint. Decoding lives in
//! [`super::decode_response`] for testability.

use std::time::Duration;

use tracing::{debug, warn};

use super::config::LayoutServiceConfig;
use super::{GeneratedLayout, LayoutSource, decode_response};
use crate::layout::LayoutError;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpLayoutSource {
    http: reqwest::Client,
    url: String,
}

impl HttpLayoutSource {
    /// # Errors
    ///
    /// Returns [`LayoutError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: LayoutServiceConfig) -> Result<Self, LayoutError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| LayoutError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.url })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl LayoutSource for HttpLayoutSource {
    async fn generate(&self, key: &str) -> Result<GeneratedLayout, LayoutError> {
        let body = ApiRequest { markdown: key };

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LayoutError::Fetch(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LayoutError::Fetch(e.to_string()))?;

        if !(200..300).contains(&status) {
            warn!(status, key_len = key.len(), "layout service returned error status");
            return Err(LayoutError::ServiceStatus { status, body: text });
        }

        debug!(status, body_len = text.len(), "layout service responded");
        decode_response(key, &text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    markdown: &'a str,
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
