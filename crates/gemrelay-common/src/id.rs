use serde::{Deserialize, Serialize};
use std::fmt;

/// Session used whenever a caller does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Short hex id used to tie log lines of one request together.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Caller-supplied conversation identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build from an optional query value; absent or empty means `"default"`.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(id) if !id.is_empty() => Self(id.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(DEFAULT_SESSION_ID.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_id_length() {
        let cid = new_correlation_id();
        assert_eq!(cid.len(), 8);
    }

    #[test]
    fn correlation_id_is_hex() {
        let cid = new_correlation_id();
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn session_id_defaults_when_missing_or_empty() {
        assert_eq!(SessionId::from_param(None).as_str(), "default");
        assert_eq!(SessionId::from_param(Some("")).as_str(), "default");
        assert_eq!(SessionId::default().as_str(), DEFAULT_SESSION_ID);
    }

    #[test]
    fn session_id_keeps_caller_value() {
        let sid = SessionId::from_param(Some("abc-123"));
        assert_eq!(sid.as_str(), "abc-123");
        assert_eq!(sid.to_string(), "abc-123");
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let sid = SessionId::new("room-7");
        let json = serde_json::to_string(&sid).unwrap();
        assert_eq!(json, "\"room-7\"");
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sid);
    }

    #[test]
    fn session_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(SessionId::new("a"));
        set.insert(SessionId::new("a"));
        set.insert(SessionId::default());
        assert_eq!(set.len(), 2);
    }
}
