//! PostgreSQL adapters - Database implementations for persistence ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresConversationStore` - Conversation aggregates with JSONB transcripts
//! - `PostgresAuditLog` - Append-only tool execution records

mod audit_log;
mod conversation_store;

pub use audit_log::PostgresAuditLog;
pub use conversation_store::PostgresConversationStore;
