//! Agent mode selection.
//!
//! The orchestrator runs in one of two modes: live (completion service with
//! tool calling) or mock (deterministic simulation). Selection is a pure
//! function of the configured preference and credential presence, so the
//! same inputs always resolve the same way.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configured preference for how the agent should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModePreference {
    /// Use the completion service when a credential is configured.
    #[default]
    Auto,
    /// Always simulate, even with a credential present.
    Mock,
    /// Use the completion service; downgrades to mock without a credential.
    Live,
}

impl ModePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModePreference::Auto => "auto",
            ModePreference::Mock => "mock",
            ModePreference::Live => "live",
        }
    }
}

impl std::fmt::Display for ModePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ModePreference::Auto),
            "mock" => Ok(ModePreference::Mock),
            "live" => Ok(ModePreference::Live),
            other => Err(format!("unknown agent mode preference: {}", other)),
        }
    }
}

/// Resolved execution mode for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    Mock,
    Live,
}

impl AgentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentMode::Mock => "mock",
            AgentMode::Live => "live",
        }
    }
}

impl std::fmt::Display for AgentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolves the execution mode from preference and credential presence.
///
/// Pure: no environment reads, no logging. An explicit mock preference
/// always wins; otherwise the credential decides.
pub fn select_mode(preference: ModePreference, credential_present: bool) -> AgentMode {
    match preference {
        ModePreference::Mock => AgentMode::Mock,
        ModePreference::Auto | ModePreference::Live => {
            if credential_present {
                AgentMode::Live
            } else {
                AgentMode::Mock
            }
        }
    }
}

/// Resolves the mode and reports a live-without-credential downgrade.
///
/// Call once at startup; per-request selection should use `select_mode`
/// so the log line does not repeat.
pub fn log_mode_resolution(preference: ModePreference, credential_present: bool) -> AgentMode {
    let mode = select_mode(preference, credential_present);
    if preference == ModePreference::Live && !credential_present {
        warn!(
            "live mode requested but no completion credential is configured; running in mock mode"
        );
    }
    mode
}
