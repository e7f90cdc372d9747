//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `conversation` - Conversation aggregate: transcript, metrics, feedback, QA flags
//! - `tools` - Tool registry, catalog, execution audit, argument inference
//! - `agent` - Mode selection and the deterministic simulation strategies

pub mod agent;
pub mod conversation;
pub mod foundation;
pub mod tools;
