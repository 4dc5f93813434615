//! Plugin configuration
//!
//! Optional JSON file named by `TRACKER_PLUGIN_CONFIG`:
//!
//! ```json
//! {
//!   "settings": { "frequency": 48000, "resampling_mode": "fir" },
//!   "log_filter": "tracker_plugin=debug"
//! }
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use crate::{EngineSettings, PluginError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "TRACKER_PLUGIN_CONFIG";

/// Plugin-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Engine output settings applied at plugin creation
    pub settings: EngineSettings,
    /// `tracing` filter directive; falls back to `TRACKER_PLUGIN_LOG`
    pub log_filter: Option<String>,
}

impl PluginConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| PluginError::Config(e.to_string()))
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {e}", path.display()))?;
        Self::from_json(&text)
    }

    /// Configuration named by [`CONFIG_ENV`], or defaults when it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
