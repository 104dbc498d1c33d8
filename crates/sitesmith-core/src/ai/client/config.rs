//! AI Client configuration

use crate::config::GeneratorConfig;
use crate::constants;

/// Configuration for the AI client
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    /// Model ID to use for API calls
    pub model: String,
    /// Maximum output tokens
    pub max_tokens: usize,
    /// Optional base URL override (defaults to the Anthropic endpoint)
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            model: constants::ai::DEFAULT_MODEL.to_string(),
            max_tokens: constants::ai::MAX_OUTPUT_TOKENS,
            base_url: None,
            api_key: None,
        }
    }
}

impl AiClientConfig {
    /// Get the API URL to use
    pub fn api_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| constants::ai::DEFAULT_API_URL.to_string())
    }
}

impl From<&GeneratorConfig> for AiClientConfig {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_defaults_and_overrides() {
        let config = AiClientConfig::default();
        assert_eq!(config.api_url(), constants::ai::DEFAULT_API_URL);

        let config = AiClientConfig {
            base_url: Some("http://localhost:9000/v1/messages".into()),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "http://localhost:9000/v1/messages");
    }
}
