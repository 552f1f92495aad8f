use serde::{Deserialize, Serialize};

/// Candidate model names, tried in order until one answers a probe.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "gemini-pro",
    "gemini-1.0-pro",
    "gemini-1.5-pro",
    "models/gemini-pro",
    "models/gemini-1.0-pro",
    "models/gemini-1.5-pro",
];

/// Model selection policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub candidates: Vec<String>,
    /// Prompt sent when discovering the model to use.
    pub probe_prompt: String,
    /// Prompt sent by the availability listing.
    pub listing_prompt: String,
    /// Forget the selected model after a provider failure so the next
    /// request probes the candidates again.
    pub reprobe_on_provider_error: bool,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            probe_prompt: "Hello".into(),
            listing_prompt: "test".into(),
            reprobe_on_provider_error: false,
        }
    }
}
