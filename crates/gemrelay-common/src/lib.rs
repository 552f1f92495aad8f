pub mod errors;
pub mod id;

pub use errors::{ConfigError, RelayError};
pub use id::{new_correlation_id, SessionId, DEFAULT_SESSION_ID};
