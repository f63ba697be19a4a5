use crate::error::Result;
use crate::trigger::DEFAULT_TRIGGER;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// TriggerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    #[serde(default = "default_token")]
    pub token: String,
}

fn default_token() -> String {
    DEFAULT_TRIGGER.to_string()
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            token: default_token(),
        }
    }
}

// ---------------------------------------------------------------------------
// BatchConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Argv for the batch operation. The resolved file and the credential are
    /// not part of the argv — they travel through the subprocess environment.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Hard cap on the batch operation's wall-clock time.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_command() -> Vec<String> {
    vec!["onboard".to_string(), "process".to_string()]
}

fn default_timeout() -> u64 {
    1800
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_seconds: default_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Load `.onboard/config.yaml` under `root`, falling back to defaults
    /// when the file does not exist. A one-shot CI run should work without
    /// any on-disk setup.
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }
}

pub fn config_path(root: &Path) -> std::path::PathBuf {
    root.join(".onboard").join("config.yaml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
