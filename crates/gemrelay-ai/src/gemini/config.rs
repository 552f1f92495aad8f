//! Gemini API client configuration.

use std::time::Duration;

use gemrelay_config::ProviderConfig;

/// Gemini API client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from(&ProviderConfig {
            api_key: api_key.into(),
            ..ProviderConfig::default()
        })
    }
}

impl From<&ProviderConfig> for GeminiConfig {
    fn from(provider: &ProviderConfig) -> Self {
        Self {
            api_key: provider.api_key.clone(),
            api_base: provider.api_base.trim_end_matches('/').to_string(),
            max_tokens: provider.max_output_tokens,
            temperature: provider.temperature,
            connect_timeout: Duration::from_secs(provider.connect_timeout_secs),
            request_timeout: Duration::from_secs(provider.request_timeout_secs),
        }
    }
}
