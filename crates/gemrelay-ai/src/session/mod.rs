//! Conversation session management.
//!
//! A `Session` holds one caller's conversation history. The `SessionStore`
//! maps session ids to sessions and creates them lazily.

mod manager;
mod store;

pub use manager::{Conversation, Session};
pub use store::SessionStore;
