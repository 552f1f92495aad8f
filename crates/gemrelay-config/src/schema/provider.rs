use serde::{Deserialize, Serialize};

/// Generative Language API connection and generation settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key. Usually supplied through `API_KEY` rather than the file.
    pub api_key: String,
    pub api_base: String,
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            max_output_tokens: 500,
            temperature: 0.7,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
