//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers
//! (read); both sides stay thin and push the rules into the domain.

pub mod handlers;

pub use handlers::activity::{
    ListToolActivityError, ListToolActivityHandler, ListToolActivityQuery, ToolActivityReport,
};
pub use handlers::agent::{ActCommand, ActError, ActHandler, ActResult, ExecutedTool};
pub use handlers::conversation::{
    ListConversationsError, ListConversationsHandler, ListConversationsQuery,
    StartConversationCommand, StartConversationError, StartConversationHandler,
    StartConversationResult,
};
pub use handlers::feedback::{
    SubmitFeedbackCommand, SubmitFeedbackError, SubmitFeedbackHandler, SubmitFeedbackResult,
};
