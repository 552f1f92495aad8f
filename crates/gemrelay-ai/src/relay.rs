//! Per-request relay flow.
//!
//! Each request walks `Validating → ResolvingModel → Generating →
//! Delivering → Closed`, or ends in `Failed` from any open phase. The
//! streaming flow is an explicit state machine driven by `unfold`: once it
//! reaches `Closed` it yields nothing more, so a request cannot be closed
//! twice.

use std::sync::Arc;

use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use gemrelay_common::{new_correlation_id, RelayError, SessionId};
use tracing::{debug, warn};

use crate::delivery::{deliver, DeliveryEvent, DeliveryOptions, FALLBACK_REPLY};
use crate::gateway::ModelGateway;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    ResolvingModel,
    Generating,
    Delivering,
    Closed,
    Failed,
}

impl Phase {
    pub fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        match (self, next) {
            (Closed | Failed, _) => false,
            (_, Failed) => true,
            (Validating, ResolvingModel)
            | (ResolvingModel, Generating)
            | (Generating, Delivering)
            | (Delivering, Closed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Closed | Phase::Failed)
    }
}

/// Phase bookkeeping for one request.
struct RequestState {
    id: String,
    session: SessionId,
    phase: Phase,
}

impl RequestState {
    fn new(session: &SessionId) -> Self {
        Self {
            id: new_correlation_id(),
            session: session.clone(),
            phase: Phase::Validating,
        }
    }

    fn advance(&mut self, next: Phase) {
        if !self.phase.can_advance_to(next) {
            warn!(request = %self.id, from = ?self.phase, to = ?next, "Ignoring illegal phase change");
            return;
        }
        debug!(request = %self.id, session = %self.session, from = ?self.phase, to = ?next, "Phase");
        self.phase = next;
    }

    fn fail(&mut self, error: &RelayError) {
        if error.is_client_error() {
            debug!(request = %self.id, error = %error, "Request rejected");
        } else {
            warn!(request = %self.id, session = %self.session, phase = ?self.phase, error = %error, "Request failed");
        }
        self.advance(Phase::Failed);
    }
}

impl Drop for RequestState {
    fn drop(&mut self) {
        if !self.phase.is_terminal() {
            debug!(request = %self.id, phase = ?self.phase, "Client went away; request closed");
        }
    }
}

/// Streaming flow states.
enum Step {
    Pending {
        message: Option<String>,
        session_id: SessionId,
    },
    Delivering {
        events: BoxStream<'static, DeliveryEvent>,
        state: RequestState,
    },
    Closed,
}

/// Composes the gateway, session store and delivery engine.
#[derive(Clone)]
pub struct Relay {
    gateway: Arc<ModelGateway>,
    sessions: SessionStore,
    delivery: DeliveryOptions,
}

impl Relay {
    pub fn new(
        gateway: Arc<ModelGateway>,
        sessions: SessionStore,
        delivery: DeliveryOptions,
    ) -> Self {
        Self {
            gateway,
            sessions,
            delivery,
        }
    }

    pub fn gateway(&self) -> &Arc<ModelGateway> {
        &self.gateway
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Answer once with the full reply text.
    pub async fn answer(
        &self,
        message: Option<&str>,
        session_id: &SessionId,
    ) -> Result<String, RelayError> {
        let mut state = RequestState::new(session_id);
        match self.exchange(&mut state, message, session_id).await {
            Ok(reply) => {
                state.advance(Phase::Delivering);
                state.advance(Phase::Closed);
                Ok(or_fallback(reply))
            }
            Err(e) => {
                state.fail(&e);
                Err(e)
            }
        }
    }

    /// Answer as a stream of delivery events ending in exactly one terminal
    /// event. Dropping the stream abandons the request.
    pub fn stream(
        &self,
        message: Option<String>,
        session_id: SessionId,
    ) -> BoxStream<'static, DeliveryEvent> {
        let relay = self.clone();
        stream::unfold(
            Step::Pending {
                message,
                session_id,
            },
            move |step| {
                let relay = relay.clone();
                async move { relay.step(step).await }
            },
        )
        .fuse()
        .boxed()
    }

    async fn step(&self, mut step: Step) -> Option<(DeliveryEvent, Step)> {
        loop {
            step = match step {
                Step::Pending {
                    message,
                    session_id,
                } => {
                    let mut state = RequestState::new(&session_id);
                    match self
                        .exchange(&mut state, message.as_deref(), &session_id)
                        .await
                    {
                        Ok(reply) => {
                            state.advance(Phase::Delivering);
                            Step::Delivering {
                                events: deliver(&reply, &self.delivery),
                                state,
                            }
                        }
                        Err(e) => {
                            state.fail(&e);
                            return Some((DeliveryEvent::error(e.to_string()), Step::Closed));
                        }
                    }
                }
                Step::Delivering {
                    mut events,
                    mut state,
                } => {
                    return match events.next().await {
                        Some(event) if event.is_terminal() => {
                            state.advance(Phase::Closed);
                            Some((event, Step::Closed))
                        }
                        Some(event) => Some((event, Step::Delivering { events, state })),
                        None => {
                            state.advance(Phase::Closed);
                            Some((DeliveryEvent::Done, Step::Closed))
                        }
                    };
                }
                Step::Closed => return None,
            };
        }
    }

    /// Validate, resolve the model, generate, and record the exchange.
    ///
    /// The session stays locked from before the provider call until the
    /// exchange is appended. Returns the provider text unchanged.
    async fn exchange(
        &self,
        state: &mut RequestState,
        message: Option<&str>,
        session_id: &SessionId,
    ) -> Result<String, RelayError> {
        let message = match message {
            Some(m) if !m.is_empty() => m,
            _ => return Err(RelayError::message_required()),
        };

        let session = self.sessions.get_or_create(session_id).await;

        state.advance(Phase::ResolvingModel);
        let model = self.gateway.resolve_model().await?;

        state.advance(Phase::Generating);
        let mut conversation = session.lock().await;
        let reply = self
            .gateway
            .generate_reply(&model, conversation.messages(), message)
            .await?;

        let recorded = if reply.trim().is_empty() {
            FALLBACK_REPLY
        } else {
            reply.as_str()
        };
        conversation.append_exchange(message, recorded);
        debug!(
            request = %state.id,
            model = %model,
            exchanges = conversation.exchange_count(),
            "Exchange recorded"
        );

        Ok(reply)
    }
}

fn or_fallback(reply: String) -> String {
    if reply.trim().is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        reply
    }
}
