use std::path::PathBuf;

/// Message reported when a request arrives without a usable `msg`.
pub const MESSAGE_REQUIRED: &str = "Message required";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures a relay request can end in.
///
/// Every variant is converted into the endpoint's own error representation
/// at the request boundary; none of them is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    /// Required input missing or blank.
    #[error("{0}")]
    Validation(String),

    /// Every candidate model failed its probe.
    #[error("No available Gemini models found")]
    NoModelAvailable,

    /// Transport, quota or content failure reported by the provider.
    #[error("{0}")]
    Provider(String),
}

impl RelayError {
    pub fn message_required() -> Self {
        Self::Validation(MESSAGE_REQUIRED.into())
    }

    /// Whether the failure was caused by the caller rather than upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
