//! Configuration — loads optional ~/.prepwise/config.yaml.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings read from ~/.prepwise/config.yaml. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Preference profile location. None = ~/.prepwise/preferences.yaml.
    #[serde(default)]
    pub profile_path: Option<PathBuf>,
    /// Default tracing filter, e.g. "info" or "prepwise=debug".
    #[serde(default = "Config::default_log_level")]
    pub log_level: String,
}

impl Config {
    fn default_log_level() -> String {
        "info".to_string()
    }

    /// Load config from the standard path.
    /// Returns the defaults if the file is missing or unreadable.
    pub fn load() -> Self {
        config_path()
            .and_then(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from `path`, or None if it can't be read or parsed.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_path: None,
            log_level: Self::default_log_level(),
        }
    }
}

/// Get the config file path.
fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".prepwise").join("config.yaml"))
}
