//! HTTP routes.
//!
//! | route | reply |
//! |---|---|
//! | `GET /api/gemini/stream?msg&sessionId` | SSE stream ending in `[DONE]` |
//! | `GET /api/gemini/simple?msg&sessionId` | `{text, sessionId}` |
//! | `POST /api/gemini/clear?sessionId` | `{message, sessionId}` |
//! | `GET /api/gemini/models` | `{models: [{name, status, error?}]}` |
//! | `GET /api/health` | `{status, message, timestamp}` |

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method};
use axum::response::sse::{Event, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use gemrelay_ai::DeliveryEvent;
use gemrelay_common::{RelayError, SessionId};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;
use crate::protocol::{self, ClearReply, HealthReply, ModelStatus, ModelsReply, SimpleReply};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    pub msg: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Build the application router.
pub fn build(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.server.cors_origin)?;

    Ok(Router::new()
        .route("/api/gemini/stream", get(stream_chat))
        .route("/api/gemini/simple", get(simple_chat))
        .route("/api/gemini/clear", post(clear_session))
        .route("/api/gemini/models", get(list_models))
        .route("/api/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    if origin.trim() == "*" {
        anyhow::bail!("server.cors_origin cannot be \"*\" with credentials allowed");
    }
    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.cors_origin '{origin}': {e}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Unreadable query strings are reported like any other invalid input.
fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, RelayError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| RelayError::Validation(rejection.body_text()))
}

async fn stream_chat(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChatQuery>, QueryRejection>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = match parse_query(query) {
        Ok(query) => {
            let session_id = SessionId::from_param(query.session_id.as_deref());
            debug!(session = %session_id, "Stream request");
            state.relay.stream(query.msg, session_id)
        }
        Err(e) => {
            debug!(error = %e, "Rejected stream request");
            stream::once(async move { DeliveryEvent::error(e.to_string()) }).boxed()
        }
    };

    let frames = events.flat_map(|event| {
        stream::iter(protocol::sse_events(event).into_iter().map(Ok::<_, Infallible>))
    });
    Sse::new(frames)
}

async fn simple_chat(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChatQuery>, QueryRejection>,
) -> Result<Json<SimpleReply>, ApiError> {
    let query = parse_query(query)?;
    let session_id = SessionId::from_param(query.session_id.as_deref());
    debug!(session = %session_id, "Simple request");

    let text = state
        .relay
        .answer(query.msg.as_deref(), &session_id)
        .await?;
    Ok(Json(SimpleReply { text, session_id }))
}

async fn clear_session(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<ClearReply>, ApiError> {
    let query = parse_query(query)?;
    let session_id = SessionId::from_param(query.session_id.as_deref());
    let existed = state.relay.sessions().clear(&session_id).await;
    debug!(session = %session_id, existed, "Clear request");

    Ok(Json(ClearReply {
        message: "Chat history cleared",
        session_id,
    }))
}

async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsReply> {
    let models = state
        .relay
        .gateway()
        .probe_all()
        .await
        .into_iter()
        .map(ModelStatus::from)
        .collect();
    Json(ModelsReply { models })
}

async fn health() -> Json<HealthReply> {
    Json(HealthReply {
        status: "OK",
        message: "Gemini server is running",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}
