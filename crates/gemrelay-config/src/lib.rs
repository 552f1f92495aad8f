//! Relay configuration.
//!
//! TOML file (all sections defaulted, so partial files work) followed by
//! environment overrides and validation.
//!
//! ```rust,no_run
//! use gemrelay_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config.server.address());
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::apply_env_overrides;
pub use schema::{
    DeliveryConfig, LoggingConfig, ModelsConfig, ProviderConfig, RelayConfig, ServerConfig,
    SessionsConfig,
};

use std::path::Path;

use gemrelay_common::ConfigError;

/// Load, override from the environment, and validate.
///
/// With `path` the file must exist; without it the platform default is used
/// and created on first run.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    apply_env_overrides(&mut config)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string with the key redacted.
pub fn config_to_json(config: &RelayConfig) -> String {
    let mut redacted = config.clone();
    if !redacted.provider.api_key.is_empty() {
        redacted.provider.api_key = "[REDACTED]".into();
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&RelayConfig::default());
        assert!(json.contains("\"server\""));
        assert!(json.contains("\"provider\""));
        assert!(json.contains("\"models\""));
        assert!(json.contains("\"delivery\""));
        assert!(json.contains("\"sessions\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_to_json_redacts_api_key() {
        let mut config = RelayConfig::default();
        config.provider.api_key = "AIza-secret".into();
        let json = config_to_json(&config);
        assert!(!json.contains("AIza-secret"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn load_config_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[delivery]\nchunk_word_count = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
