//! Session configuration
//!
//! Stored as JSON. Missing fields fall back to their defaults so older
//! config files keep loading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// File name of the config inside the config directory
pub const CONFIG_FILE_NAME: &str = "session.json";

/// Tuning session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Simulated decode time of an upload, in milliseconds
    #[serde(default = "default_decode_delay_ms")]
    pub decode_delay_ms: u64,

    /// Inserted before the extension of exported file names
    #[serde(default = "default_export_suffix")]
    pub export_suffix: String,

    /// Accepted upload extensions, with leading dot
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_decode_delay_ms() -> u64 {
    2000
}

fn default_export_suffix() -> String {
    "_modified".to_string()
}

fn default_allowed_extensions() -> Vec<String> {
    [".bin", ".hex", ".s19", ".a2l"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            decode_delay_ms: default_decode_delay_ms(),
            export_suffix: default_export_suffix(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl SessionConfig {
    /// Default config location (`<config dir>/stagetune/session.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stagetune").join(CONFIG_FILE_NAME))
    }

    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a config file, or the defaults if it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the config, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Decode delay as a duration
    pub fn decode_delay(&self) -> Duration {
        Duration::from_millis(self.decode_delay_ms)
    }
}
