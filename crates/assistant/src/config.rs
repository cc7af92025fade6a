//! Configuration for the workflow core
//!
//! Supports loading gateway settings from (in order of priority):
//! 1. JSON file (~/.config/replyflow/assistant.json)
//! 2. Runtime environment variables
//! 3. Built-in defaults (local development backend)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config filename in the Replyflow config directory
const CONFIG_FILE: &str = "assistant.json";

/// Default backend mount, matching the local assistant server
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api/email";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gateway settings for the assistant backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Base URL the four mail endpoints hang off of
    pub api_base_url: String,
    /// Transport-level deadline for each gateway call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AssistantConfig {
    /// Load configuration using the file -> environment -> default chain.
    pub fn load() -> Result<Self> {
        if config::config_exists(CONFIG_FILE) {
            return config::load_json(CONFIG_FILE)
                .context("Failed to load assistant configuration");
        }

        Ok(Self::from_env())
    }

    /// Build configuration from environment variables, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base_url =
            std::env::var("REPLYFLOW_API_URL").unwrap_or(defaults.api_base_url);
        let timeout_secs = std::env::var("REPLYFLOW_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            api_base_url,
            timeout_secs,
        }
    }

    /// Persist this configuration to the Replyflow config directory.
    pub fn save(&self) -> Result<()> {
        config::save_json(CONFIG_FILE, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_backend() {
        let config = AssistantConfig::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:5000/api/email");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_parse_config_file_with_missing_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assistant.json");
        std::fs::write(&path, r#"{"api_base_url": "https://api.example.com/mail"}"#).unwrap();

        let config: AssistantConfig = config::load_json_file(&path).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/mail");
        assert_eq!(config.timeout_secs, 30);
    }
}
