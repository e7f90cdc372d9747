//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Agent Ports
//!
//! - `CompletionProvider` - LLM completion service with tool calling
//!
//! ## Persistence Ports
//!
//! - `ConversationStore` - Conversation aggregate persistence
//! - `AuditLog` - Tool execution audit trail
//!
//! ## Messaging Ports
//!
//! - `MessageDispatcher` - Outbound customer messaging

mod audit_log;
mod completion_provider;
mod conversation_store;
mod message_dispatcher;

pub use audit_log::{AuditLog, AuditLogError, ToolActivityFilter, ToolActivityStats};
pub use completion_provider::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionResponse, ProviderInfo,
    ProviderMessage, ProviderRole, TokenUsage, ToolCallRequest, ToolChoice,
};
pub use conversation_store::{
    ConversationFilter, ConversationStore, ConversationStoreError, ConversationSummary, Page,
};
pub use message_dispatcher::{DeliveryReceipt, DispatchError, MessageDispatcher, OutboundMessage};
