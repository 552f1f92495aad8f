//! Shared application state injected into every handler.

use std::sync::Arc;

use gemrelay_ai::{
    AiClient, AiError, DeliveryOptions, GeminiClient, GeminiConfig, ModelGateway, Relay,
    SessionStore,
};
use gemrelay_config::RelayConfig;

pub struct AppState {
    pub relay: Relay,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Wire the relay against the Gemini API.
    pub fn from_config(config: RelayConfig) -> Result<Self, AiError> {
        let client = GeminiClient::new(GeminiConfig::from(&config.provider))?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Wire the relay against any provider client.
    pub fn with_client(client: Arc<dyn AiClient>, config: RelayConfig) -> Self {
        let gateway = Arc::new(ModelGateway::new(client, &config.models));
        let relay = Relay::new(
            gateway,
            SessionStore::new(),
            DeliveryOptions::from(&config.delivery),
        );
        Self {
            relay,
            config: Arc::new(config),
        }
    }
}
