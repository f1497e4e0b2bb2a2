//! Configuration management for starledger

use crate::error::LedgerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// How long a challenge stays valid after issuance, in seconds.
    #[serde(default = "default_challenge_window_secs")]
    pub challenge_window_secs: u64,
    /// Trailing tag of every challenge message.
    #[serde(default = "default_registry_tag")]
    pub registry_tag: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            challenge_window_secs: default_challenge_window_secs(),
            registry_tag: default_registry_tag(),
        }
    }
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file is absent or empty.
pub fn load_config(path: impl AsRef<Path>) -> Result<LedgerConfig, LedgerError> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let config: LedgerConfig = if config_str.is_empty() {
        LedgerConfig::default()
    } else {
        toml::from_str(&config_str).map_err(|e| LedgerError::Config(e.to_string()))?
    };

    // Validate critical values
    if config.challenge_window_secs == 0 {
        return Err(LedgerError::Config(
            "challenge_window_secs must be greater than zero".to_string(),
        ));
    }

    if config.registry_tag.is_empty() {
        return Err(LedgerError::Config(
            "registry_tag must not be empty".to_string(),
        ));
    }

    Ok(config)
}

fn default_challenge_window_secs() -> u64 {
    5 * 60
}

fn default_registry_tag() -> String {
    "starRegistry".to_string()
}
