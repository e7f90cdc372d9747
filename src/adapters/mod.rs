//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion providers (OpenAI, scripted test double)
//! - `memory` - In-memory persistence for tests and development
//! - `messaging` - Outbound message dispatchers
//! - `postgres` - PostgreSQL-backed persistence

pub mod ai;
pub mod memory;
pub mod messaging;
pub mod postgres;

pub use ai::{OpenAIConfig, OpenAIProvider, ScriptedError, ScriptedProvider, ScriptedResponse};
pub use memory::{InMemoryAuditLog, InMemoryConversationStore};
pub use messaging::MockMessageDispatcher;
pub use postgres::{PostgresAuditLog, PostgresConversationStore};
