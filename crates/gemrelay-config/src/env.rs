//! Environment variable overrides applied on top of the TOML file.

use gemrelay_common::ConfigError;
use tracing::debug;

use crate::schema::RelayConfig;

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut RelayConfig) -> Result<(), ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` to read variables.
///
/// `API_KEY` wins over `GEMINI_API_KEY`. Empty values are ignored.
pub fn apply_overrides_from(
    config: &mut RelayConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get("API_KEY").or_else(|| get("GEMINI_API_KEY")) {
        config.provider.api_key = key;
    }

    if let Some(port) = get("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|e| ConfigError::ParseError(format!("invalid PORT '{port}': {e}")))?;
        debug!(port = config.server.port, "port overridden from environment");
    }

    if let Some(bind) = get("GEMRELAY_BIND") {
        config.server.bind = bind;
    }

    if let Some(level) = get("GEMRELAY_LOG") {
        config.logging.level = level;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn api_key_prefers_api_key_over_gemini_api_key() {
        let mut config = RelayConfig::default();
        apply_overrides_from(
            &mut config,
            lookup(&[("API_KEY", "primary"), ("GEMINI_API_KEY", "secondary")]),
        )
        .unwrap();
        assert_eq!(config.provider.api_key, "primary");
    }

    #[test]
    fn gemini_api_key_used_as_fallback() {
        let mut config = RelayConfig::default();
        apply_overrides_from(&mut config, lookup(&[("GEMINI_API_KEY", "secondary")])).unwrap();
        assert_eq!(config.provider.api_key, "secondary");
    }

    #[test]
    fn port_and_bind_override() {
        let mut config = RelayConfig::default();
        apply_overrides_from(
            &mut config,
            lookup(&[("PORT", "7070"), ("GEMRELAY_BIND", "127.0.0.1")]),
        )
        .unwrap();
        assert_eq!(config.server.address(), "127.0.0.1:7070");
    }

    #[test]
    fn invalid_port_is_a_parse_error() {
        let mut config = RelayConfig::default();
        let err = apply_overrides_from(&mut config, lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut config = RelayConfig::default();
        apply_overrides_from(&mut config, lookup(&[("PORT", ""), ("GEMRELAY_LOG", "  ")])).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, RelayConfig::default().logging.level);
    }
}
