//! Configuration handling
//!
//! Reads an optional `voltwire.toml` file.
//!
//! ## Environment Variables
//!
//! The following environment variables override config file settings:
//!
//! - `VOLTWIRE_MAX_MESSAGE_SIZE` - largest request the encoder will build
//! - `VOLTWIRE_MAX_FIELD_LEN` - largest string, byte array or row accepted when decoding
//!
//! These can be set in a `.env` file next to the config file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::protocol::ProtocolLimits;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "voltwire.toml";

/// Environment variable names
pub const ENV_MAX_MESSAGE_SIZE: &str = "VOLTWIRE_MAX_MESSAGE_SIZE";
pub const ENV_MAX_FIELD_LEN: &str = "VOLTWIRE_MAX_FIELD_LEN";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Encoder/decoder size bounds
    #[serde(default)]
    pub limits: ProtocolLimits,
}

impl Config {
    /// Load configuration from a directory
    ///
    /// Loads any `.env` file in the directory first. A missing config file
    /// yields the defaults.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let env_path = dir.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }

        let config_path = dir.join(CONFIG_FILE_NAME);
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Some(size) = env_usize(ENV_MAX_MESSAGE_SIZE) {
            self.limits.max_message_size = size;
        }
        if let Some(len) = env_usize(ENV_MAX_FIELD_LEN) {
            self.limits.max_field_len = len;
        }
    }

    /// Save configuration to a directory
    pub fn save(&self, dir: &Path) -> anyhow::Result<()> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    let value = std::env::var(name).ok()?;
    match value.parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a size", name, value);
            None
        }
    }
}
