//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod activity;
pub mod agent;
pub mod conversation;
pub mod feedback;
