//! In-memory adapters.
//!
//! Thread-safe in-memory implementations of the persistence ports, used in
//! tests and local development.

mod audit_log;
mod conversation_store;

pub use audit_log::InMemoryAuditLog;
pub use conversation_store::InMemoryConversationStore;
