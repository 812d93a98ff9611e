//! Client configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default fixed delay between task-status polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_500;

/// Default attempt budget for task-status polling (~150 s ceiling).
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 100;

/// Polling parameters for asynchronous backend tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay between status requests.
    pub interval: Duration,
    /// Maximum number of status requests before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Application configuration persisted in config.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the advisory backend.
    pub api_base_url: String,
    /// Override for the poll interval, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,
    /// Override for the poll attempt budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_poll_attempts: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            poll_interval_ms: None,
            max_poll_attempts: None,
        }
    }
}

impl AppConfig {
    /// The effective polling parameters, applying any overrides.
    pub fn poll_config(&self) -> PollConfig {
        let defaults = PollConfig::default();
        PollConfig {
            interval: self
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            max_attempts: self.max_poll_attempts.unwrap_or(defaults.max_attempts),
        }
    }
}

/// Secret configuration loaded from secret.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    /// Gemini credentials for the direct advisory variant.
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model override; the client falls back to its default when absent.
    #[serde(default)]
    pub model_name: Option<String>,
}
