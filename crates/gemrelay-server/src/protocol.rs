//! Wire format of the HTTP API.
//!
//! Streaming responses are server-sent events whose `data` is either a JSON
//! payload (`{"text": ...}` / `{"error": ...}`) or the literal `[DONE]`,
//! which always ends the stream.

use axum::response::sse::Event;
use gemrelay_ai::{Availability, DeliveryEvent, ModelDescriptor};
use gemrelay_common::SessionId;
use serde::Serialize;

/// Final SSE data line of every stream.
pub const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StreamPayload {
    Text { text: String },
    Error { error: String },
}

/// SSE frames for one delivery event. An error is followed by the done
/// marker so the stream ends the same way in every case.
pub fn sse_events(event: DeliveryEvent) -> Vec<Event> {
    match event {
        DeliveryEvent::Partial { text } => vec![json_event(&StreamPayload::Text { text })],
        DeliveryEvent::Done => vec![done_event()],
        DeliveryEvent::Error { message } => vec![
            json_event(&StreamPayload::Error { error: message }),
            done_event(),
        ],
    }
}

fn json_event(payload: &StreamPayload) -> Event {
    let data = serde_json::to_string(payload)
        .unwrap_or_else(|e| format!(r#"{{"error":"failed to encode event: {e}"}}"#));
    Event::default().data(data)
}

fn done_event() -> Event {
    Event::default().data(DONE_MARKER)
}

#[derive(Debug, Serialize)]
pub struct SimpleReply {
    pub text: String,
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
}

#[derive(Debug, Serialize)]
pub struct ClearReply {
    pub message: &'static str,
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
}

#[derive(Debug, Serialize)]
pub struct ModelsReply {
    pub models: Vec<ModelStatus>,
}

#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub name: String,
    pub status: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ModelDescriptor> for ModelStatus {
    fn from(d: ModelDescriptor) -> Self {
        Self {
            name: d.name,
            status: d.availability,
            error: d.last_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReply {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
