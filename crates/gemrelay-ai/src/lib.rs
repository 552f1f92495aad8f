//! Relay engine.
//!
//! Provides:
//! - The provider capability (`AiClient`) and its Gemini implementation
//! - Model discovery with single-flight memoization (`ModelGateway`)
//! - Per-session conversation history (`SessionStore`)
//! - Simulated streaming of a finished reply (`delivery`)
//! - The per-request state machine composing them (`Relay`)

pub mod delivery;
pub mod gateway;
pub mod gemini;
pub mod relay;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use gemrelay_common::RelayError;

pub use delivery::{deliver, plan_chunks, DeliveryEvent, DeliveryOptions, FALLBACK_REPLY};
pub use gateway::{Availability, ModelDescriptor, ModelGateway};
pub use gemini::{GeminiClient, GeminiConfig};
pub use relay::{Phase, Relay};
pub use session::{Conversation, Session, SessionStore};

/// The generation capability of the provider.
///
/// `messages` is the full conversation, oldest first, ending with the new
/// user message.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn send_message(&self, model: &str, messages: &[Message])
        -> Result<AiResponse, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

impl From<AiError> for RelayError {
    fn from(e: AiError) -> Self {
        RelayError::Provider(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn token_usage_total_saturates() {
        let usage = TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 1,
        };
        assert_eq!(usage.total_tokens(), u64::MAX);
    }

    #[test]
    fn ai_error_becomes_provider_error_with_detail() {
        let relay: RelayError = AiError::ApiError("HTTP 404: model not found".into()).into();
        assert_eq!(
            relay,
            RelayError::Provider("API error: HTTP 404: model not found".into())
        );

        let relay: RelayError = AiError::RateLimited.into();
        assert_eq!(relay.to_string(), "Rate limited");
    }
}
