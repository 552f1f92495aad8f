//! Core TOML config loading: read from path or platform default.

use crate::schema::RelayConfig;
use gemrelay_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. Validation is left to the
/// caller so env overrides can be applied first.
pub fn load_from_path(path: &Path) -> Result<RelayConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: RelayConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/gemrelay/config.toml`
///
/// If the file does not exist, writes a default config file and returns
/// defaults. Without a usable config directory the built-in defaults are
/// used.
pub fn load_default() -> Result<RelayConfig, ConfigError> {
    match default_config_path() {
        Ok(path) => load_or_create(&path),
        Err(e) => {
            warn!(error = %e, "no config directory; using built-in defaults");
            Ok(RelayConfig::default())
        }
    }
}

/// Load `path`, creating it with defaults when missing.
///
/// Failing to write the default file is not fatal.
pub fn load_or_create(path: &Path) -> Result<RelayConfig, ConfigError> {
    match load_from_path(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            if let Err(e) = create_default_config(path) {
                warn!(error = %e, "could not write default config; using built-in defaults");
            }
            Ok(RelayConfig::default())
        }
        Err(e) => Err(e),
    }
}
