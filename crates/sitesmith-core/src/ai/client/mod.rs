//! HTTP client for Anthropic-compatible Messages APIs

mod config;
mod simple;

pub use config::AiClientConfig;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use thiserror::Error;

use crate::constants;

/// Failures talking to the model endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no API key configured (set SITESMITH_API_KEY or ANTHROPIC_API_KEY)")]
    MissingApiKey,

    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// Non-streaming messages client
#[derive(Debug, Clone)]
pub struct AiClient {
    http: reqwest::Client,
    config: AiClientConfig,
}

impl AiClient {
    pub fn new(config: AiClientConfig) -> Result<Self, ApiError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ApiError::MissingApiKey)?;

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(constants::ai::ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AiClientConfig {
        &self.config
    }

    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.post(url)
    }

    async fn handle_error_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "Model API error");
        Err(ApiError::Status { status, body })
    }
}
