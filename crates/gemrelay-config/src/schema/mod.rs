//! Configuration schema types for the relay.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod delivery;
mod logging;
mod models;
mod provider;
mod server;
mod sessions;

pub use delivery::*;
pub use logging::*;
pub use models::*;
pub use provider::*;
pub use server::*;
pub use sessions::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub models: ModelsConfig,
    pub delivery: DeliveryConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}
