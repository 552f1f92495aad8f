//! Provider gateway: model discovery and reply generation.
//!
//! The first candidate that answers a probe becomes the selected model and
//! is reused for every later request. Discovery is single-flight: callers
//! that arrive while a probe sequence is running wait for its outcome
//! instead of starting their own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gemrelay_common::RelayError;
use gemrelay_config::ModelsConfig;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{AiClient, AiError, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Unknown,
    Available,
    Unavailable,
}

/// Last known state of one candidate model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub availability: Availability,
    pub last_error: Option<String>,
}

impl ModelDescriptor {
    fn unknown(name: &str) -> Self {
        Self {
            name: name.to_string(),
            availability: Availability::Unknown,
            last_error: None,
        }
    }
}

pub struct ModelGateway {
    client: Arc<dyn AiClient>,
    candidates: Vec<String>,
    probe_prompt: String,
    listing_prompt: String,
    reprobe_on_error: bool,
    selected: RwLock<Option<String>>,
    /// Held for the whole discovery sequence.
    probe_lock: Mutex<()>,
    /// Completed discovery sequences.
    discoveries: AtomicU64,
    descriptors: std::sync::Mutex<Vec<ModelDescriptor>>,
}

impl ModelGateway {
    pub fn new(client: Arc<dyn AiClient>, config: &ModelsConfig) -> Self {
        Self {
            client,
            descriptors: std::sync::Mutex::new(
                config
                    .candidates
                    .iter()
                    .map(|c| ModelDescriptor::unknown(c))
                    .collect(),
            ),
            candidates: config.candidates.clone(),
            probe_prompt: config.probe_prompt.clone(),
            listing_prompt: config.listing_prompt.clone(),
            reprobe_on_error: config.reprobe_on_provider_error,
            selected: RwLock::new(None),
            probe_lock: Mutex::new(()),
            discoveries: AtomicU64::new(0),
        }
    }

    /// Return the selected model, discovering it on first use.
    ///
    /// A failed discovery is not cached: the next caller that was not
    /// waiting on it starts a fresh probe sequence.
    pub async fn resolve_model(&self) -> Result<String, RelayError> {
        if let Some(model) = self.selected.read().await.clone() {
            return Ok(model);
        }

        let seen = self.discoveries.load(Ordering::Acquire);
        let _probe = self.probe_lock.lock().await;

        if let Some(model) = self.selected.read().await.clone() {
            return Ok(model);
        }
        if self.discoveries.load(Ordering::Acquire) != seen {
            // A sequence we were waiting on already found nothing.
            return Err(RelayError::NoModelAvailable);
        }

        let outcome = self.discover().await;
        self.discoveries.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn discover(&self) -> Result<String, RelayError> {
        for name in &self.candidates {
            match self.probe(name, &self.probe_prompt).await {
                Ok(()) => {
                    info!(model = %name, "Using model");
                    *self.selected.write().await = Some(name.clone());
                    return Ok(name.clone());
                }
                Err(e) => {
                    warn!(model = %name, error = %e, "Model not available");
                }
            }
        }
        Err(RelayError::NoModelAvailable)
    }

    /// Probe every candidate in order and report availability.
    ///
    /// Does not change the selected model.
    pub async fn probe_all(&self) -> Vec<ModelDescriptor> {
        let mut report = Vec::with_capacity(self.candidates.len());
        for name in &self.candidates {
            let result = self.probe(name, &self.listing_prompt).await;
            report.push(descriptor_for(name, result.as_ref().err()));
        }
        report
    }

    async fn probe(&self, model: &str, prompt: &str) -> Result<(), AiError> {
        let result = self
            .client
            .send_message(model, &[Message::user(prompt)])
            .await
            .map(|_| ());
        self.record(descriptor_for(model, result.as_ref().err()));
        result
    }

    fn record(&self, descriptor: ModelDescriptor) {
        if let Ok(mut descriptors) = self.descriptors.lock() {
            if let Some(slot) = descriptors.iter_mut().find(|d| d.name == descriptor.name) {
                *slot = descriptor;
            }
        }
    }

    /// Generate a reply to `message` given the prior `history`.
    ///
    /// Returns the provider text as-is, possibly empty.
    pub async fn generate_reply(
        &self,
        model: &str,
        history: &[Message],
        message: &str,
    ) -> Result<String, RelayError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(Message::user(message));

        match self.client.send_message(model, &messages).await {
            Ok(response) => {
                debug!(model = %model, chars = response.content.len(), "Reply generated");
                Ok(response.content)
            }
            Err(e) => {
                warn!(model = %model, error = %e, "Generation failed");
                if self.reprobe_on_error {
                    self.invalidate(model).await;
                }
                Err(e.into())
            }
        }
    }

    /// Forget `model` if it is still the selected one.
    pub async fn invalidate(&self, model: &str) {
        let mut selected = self.selected.write().await;
        if selected.as_deref() == Some(model) {
            info!(model = %model, "Dropping selected model; next request re-probes");
            *selected = None;
        }
    }

    pub async fn selected_model(&self) -> Option<String> {
        self.selected.read().await.clone()
    }

    /// Last known availability of each candidate, in priority order.
    pub fn descriptors(&self) -> Vec<ModelDescriptor> {
        self.descriptors
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

fn descriptor_for(name: &str, error: Option<&AiError>) -> ModelDescriptor {
    match error {
        None => ModelDescriptor {
            name: name.to_string(),
            availability: Availability::Available,
            last_error: None,
        },
        Some(e) => ModelDescriptor {
            name: name.to_string(),
            availability: Availability::Unavailable,
            last_error: Some(e.to_string()),
        },
    }
}
