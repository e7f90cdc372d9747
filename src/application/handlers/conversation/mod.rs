//! Conversation command and query handlers.

mod list_conversations;
mod start_conversation;

pub use list_conversations::{
    ListConversationsError, ListConversationsHandler, ListConversationsQuery,
};
pub use start_conversation::{
    StartConversationCommand, StartConversationError, StartConversationHandler,
    StartConversationResult,
};
