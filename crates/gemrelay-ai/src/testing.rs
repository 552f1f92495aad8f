//! In-memory `AiClient` used by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{AiClient, AiError, AiResponse, Message, TokenUsage};

type ReplyFn = Box<dyn Fn(&[Message]) -> Result<String, AiError> + Send + Sync>;

/// Answers for a fixed set of models and records every call it receives.
pub(crate) struct ScriptedClient {
    available: HashSet<String>,
    reply: ReplyFn,
    latency: Duration,
    calls: Mutex<Vec<(String, Vec<Message>)>>,
}

impl ScriptedClient {
    /// Replies `"echo: <last message>"` for any model in `available`.
    pub(crate) fn new(available: &[&str]) -> Self {
        Self {
            available: available.iter().map(|s| s.to_string()).collect(),
            reply: Box::new(|messages| {
                let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
                Ok(format!("echo: {last}"))
            }),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_reply(
        mut self,
        reply: impl Fn(&[Message]) -> Result<String, AiError> + Send + Sync + 'static,
    ) -> Self {
        self.reply = Box::new(reply);
        self
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<Message>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(crate) fn calls_to(&self, model: &str) -> usize {
        self.calls().iter().filter(|(m, _)| m == model).count()
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<AiResponse, AiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((model.to_string(), messages.to_vec()));
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.available.contains(model) {
            return Err(AiError::ApiError(format!("HTTP 404 Not Found: {model}")));
        }
        Ok(AiResponse {
            content: (self.reply)(messages)?,
            usage: TokenUsage::default(),
        })
    }
}
