use serde::{Deserialize, Serialize};

/// Conversation retention.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionsConfig {
    /// Drop sessions idle for longer than this many seconds. Unset keeps
    /// sessions until they are cleared or the process exits.
    pub idle_ttl_secs: Option<u64>,
}
