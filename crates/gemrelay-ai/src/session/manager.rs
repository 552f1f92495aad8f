//! Session struct and conversation access.

use std::time::{Duration, Instant};

use gemrelay_common::SessionId;
use tokio::sync::{Mutex, MutexGuard};

use crate::Message;

/// A conversation with its message history.
///
/// History is behind an async mutex: holding a [`Conversation`] across the
/// provider call serializes turns for this session without blocking others.
pub struct Session {
    id: SessionId,
    created_at: Instant,
    last_active: std::sync::Mutex<Instant>,
    history: Mutex<Vec<Message>>,
}

impl Session {
    pub(crate) fn new(id: SessionId) -> Self {
        let now = Instant::now();
        Self {
            id,
            created_at: now,
            last_active: std::sync::Mutex::new(now),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Wait for exclusive access to the history.
    pub async fn lock(&self) -> Conversation<'_> {
        let history = self.history.lock().await;
        self.touch();
        Conversation {
            session: self,
            history,
        }
    }

    /// Snapshot of the history.
    pub async fn messages(&self) -> Vec<Message> {
        self.history.lock().await.clone()
    }

    /// Time since the session was last locked or appended to.
    pub fn idle_for(&self, now: Instant) -> Duration {
        self.last_active
            .lock()
            .map(|last| now.saturating_duration_since(*last))
            .unwrap_or_default()
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_active.lock() {
            *last = Instant::now();
        }
    }
}

/// Exclusive view of a session's history.
pub struct Conversation<'a> {
    session: &'a Session,
    history: MutexGuard<'a, Vec<Message>>,
}

impl Conversation<'_> {
    pub fn messages(&self) -> &[Message] {
        &self.history
    }

    /// Record one completed user/assistant turn.
    pub fn append_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(Message::user(user));
        self.history.push(Message::assistant(assistant));
        self.session.touch();
    }

    pub fn exchange_count(&self) -> usize {
        self.history.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[tokio::test]
    async fn new_session_is_empty() {
        let session = Session::new(SessionId::default());
        assert_eq!(session.id().as_str(), "default");
        assert!(session.messages().await.is_empty());
        assert_eq!(session.lock().await.exchange_count(), 0);
    }

    #[tokio::test]
    async fn append_exchange_keeps_chronological_order() {
        let session = Session::new(SessionId::new("s"));
        {
            let mut conversation = session.lock().await;
            conversation.append_exchange("q1", "a1");
            conversation.append_exchange("q2", "a2");
            assert_eq!(conversation.exchange_count(), 2);
        }

        let messages = session.messages().await;
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(messages[2].content, "q2");
    }

    #[tokio::test]
    async fn idle_time_resets_on_lock() {
        let session = Session::new(SessionId::default());
        let later = Instant::now() + Duration::from_secs(30);
        assert!(session.idle_for(later) >= Duration::from_secs(30));

        drop(session.lock().await);
        assert!(session.idle_for(Instant::now()) < Duration::from_secs(1));
    }
}
