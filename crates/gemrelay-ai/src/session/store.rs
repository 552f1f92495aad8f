//! Session store: maps session ids to conversations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gemrelay_common::SessionId;
use tokio::sync::RwLock;

use super::manager::Session;

/// Thread-safe session store. Clones share the same map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `id`, creating an empty one on first use.
    pub async fn get_or_create(&self, id: &SessionId) -> Arc<Session> {
        if let Some(session) = self.sessions.read().await.get(id) {
            return session.clone();
        }

        let mut map = self.sessions.write().await;
        map.entry(id.clone())
            .or_insert_with(|| {
                tracing::debug!(session = %id, "Session created");
                Arc::new(Session::new(id.clone()))
            })
            .clone()
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Remove a session. Returns true if it existed.
    pub async fn clear(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::debug!(session = %id, "Session cleared");
        }
        removed
    }

    /// Append a completed exchange to the session for `id`.
    pub async fn append_exchange(&self, id: &SessionId, user: &str, assistant: &str) {
        let session = self.get_or_create(id).await;
        session.lock().await.append_exchange(user, assistant);
    }

    /// Remove sessions idle longer than `max_idle`. Returns how many went.
    ///
    /// A session still referenced by an in-flight request is kept.
    pub async fn reap_idle(&self, max_idle: Duration) -> usize {
        let mut map = self.sessions.write().await;
        let now = Instant::now();
        let before = map.len();
        map.retain(|id, session| {
            let stale = Arc::strong_count(session) == 1 && session.idle_for(now) > max_idle;
            if stale {
                tracing::info!(session = %id, "Reaping idle session");
            }
            !stale
        });
        before - map.len()
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
