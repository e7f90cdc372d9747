//! Agent domain module.
//!
//! Mode selection plus the deterministic simulation strategies used when
//! the orchestrator runs without a completion service.

mod mode;
mod simulation;

pub use mode::{log_mode_resolution, select_mode, AgentMode, ModePreference};
pub use simulation::{
    candidate_tools, compose_reply, mock_call_id, synthesize_arguments, MAX_SIMULATED_TOOLS,
};
