//! Full configuration validation.
//!
//! Checks numeric ranges and required lists, collecting every problem
//! into a single `ConfigError`.

mod helpers;


use crate::schema::RelayConfig;
use gemrelay_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RelayConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.server.port == 0 {
        errors.push("server.port must not be 0".into());
    }
    let origin = config.server.cors_origin.trim();
    if origin.is_empty() || origin == "*" {
        // Credentialed CORS needs one concrete origin.
        errors.push("server.cors_origin must be a single origin, not empty or \"*\"".into());
    }

    validate_range(
        &mut errors,
        "provider.max_output_tokens",
        config.provider.max_output_tokens,
        1,
        8192,
    );
    validate_range(
        &mut errors,
        "provider.temperature",
        config.provider.temperature,
        0.0,
        2.0,
    );

    if config.models.candidates.is_empty() {
        errors.push("models.candidates must list at least one model".into());
    }
    if config.models.candidates.iter().any(|c| c.trim().is_empty()) {
        errors.push("models.candidates must not contain blank names".into());
    }

    validate_range(
        &mut errors,
        "delivery.chunk_word_count",
        config.delivery.chunk_word_count,
        1,
        100,
    );
    validate_range(
        &mut errors,
        "delivery.inter_chunk_delay_ms",
        config.delivery.inter_chunk_delay_ms,
        0,
        10_000,
    );

    if config.sessions.idle_ttl_secs == Some(0) {
        errors.push("sessions.idle_ttl_secs must be positive when set".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
