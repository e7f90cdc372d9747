//! Agent orchestration configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::agent::ModePreference;

use super::error::ValidationError;

/// Agent configuration
///
/// The API key is deliberately optional: mode selection treats its absence
/// as "run simulated" rather than a startup failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Requested agent mode (`auto`, `mock`, `live`)
    #[serde(default)]
    pub mode: ModePreference,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Completion model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat-completions endpoint base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on retryable completion failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AgentConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a completion credential is configured
    pub fn credential_present(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Returns the configured API key, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }

    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.is_empty() {
            return Err(ValidationError::MissingRequired("AGENT__MODEL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mode: ModePreference::default(),
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}
