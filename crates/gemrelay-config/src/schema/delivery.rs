use serde::{Deserialize, Serialize};

/// Pacing of the simulated stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Words per partial event (valid range: 1-100).
    pub chunk_word_count: u32,
    /// Pause between partial events in milliseconds (valid range: 0-10000).
    pub inter_chunk_delay_ms: u32,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            chunk_word_count: 3,
            inter_chunk_delay_ms: 50,
        }
    }
}
