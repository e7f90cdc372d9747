//! StartConversation command handler.
//!
//! Opens a new conversation for a vendor, optionally seeded with a customer,
//! channel, tags, and a first vendor message. Also reports which agent mode
//! the session will run under so clients can surface it immediately.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::agent::AgentMode;
use crate::domain::conversation::{Channel, Conversation, Message};
use crate::domain::foundation::{ConversationId, CustomerId, VendorId};
use crate::ports::{ConversationStore, ConversationStoreError};

/// Command to open a conversation.
#[derive(Debug, Clone)]
pub struct StartConversationCommand {
    /// The vendor opening the conversation.
    pub vendor_id: VendorId,
    /// Customer the thread concerns, when known.
    pub customer_id: Option<CustomerId>,
    /// Channel label; unrecognized labels map to the unknown channel.
    pub channel: Option<String>,
    /// Initial tags. Blanks and duplicates are dropped.
    pub tags: Vec<String>,
    /// Optional first vendor message, appended before the first save.
    pub initial_message: Option<String>,
}

impl StartConversationCommand {
    /// Creates a command with no customer, channel, tags, or seed message.
    pub fn new(vendor_id: VendorId) -> Self {
        Self {
            vendor_id,
            customer_id: None,
            channel: None,
            tags: Vec::new(),
            initial_message: None,
        }
    }

    /// Attaches the customer the thread concerns.
    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Sets the channel label.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Sets the initial tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Seeds the conversation with a first vendor message.
    pub fn with_initial_message(mut self, message: impl Into<String>) -> Self {
        self.initial_message = Some(message.into());
        self
    }
}

/// Errors that can occur when opening a conversation.
#[derive(Debug, Clone, Error)]
pub enum StartConversationError {
    /// Conversation persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ConversationStoreError> for StartConversationError {
    fn from(err: ConversationStoreError) -> Self {
        StartConversationError::Storage(err.to_string())
    }
}

/// Result of opening a conversation.
#[derive(Debug, Clone)]
pub struct StartConversationResult {
    /// Id of the new conversation.
    pub conversation_id: ConversationId,
    /// The agent mode this session will run under.
    pub mode: AgentMode,
}

/// Handler for StartConversation commands.
pub struct StartConversationHandler<S>
where
    S: ConversationStore,
{
    store: Arc<S>,
    mode: AgentMode,
}

impl<S> StartConversationHandler<S>
where
    S: ConversationStore,
{
    /// Creates a new handler.
    pub fn new(store: Arc<S>, mode: AgentMode) -> Self {
        Self { store, mode }
    }

    /// Opens a conversation and saves it.
    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<StartConversationResult, StartConversationError> {
        let channel = cmd
            .channel
            .as_deref()
            .map(Channel::parse)
            .unwrap_or_default();

        let mut conversation = Conversation::new(ConversationId::new(), cmd.vendor_id, channel);
        if let Some(customer_id) = cmd.customer_id {
            conversation = conversation.with_customer(customer_id);
        }
        for tag in &cmd.tags {
            conversation.add_tag(tag.as_str());
        }
        if let Some(message) = cmd.initial_message.as_deref() {
            let trimmed = message.trim();
            if !trimmed.is_empty() {
                conversation.append_message(Message::vendor(trimmed));
            }
        }

        self.store.save(&conversation).await?;

        Ok(StartConversationResult {
            conversation_id: *conversation.id(),
            mode: self.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::domain::conversation::ConversationStatus;

    fn handler(
        store: Arc<InMemoryConversationStore>,
    ) -> StartConversationHandler<InMemoryConversationStore> {
        StartConversationHandler::new(store, AgentMode::Mock)
    }

    #[tokio::test]
    async fn opens_an_active_conversation_with_defaults() {
        let store = Arc::new(InMemoryConversationStore::new());
        let vendor_id = VendorId::new();

        let result = handler(Arc::clone(&store))
            .handle(StartConversationCommand::new(vendor_id))
            .await
            .unwrap();

        assert_eq!(result.mode, AgentMode::Mock);
        let saved = store
            .find_by_id(&result.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.vendor_id(), &vendor_id);
        assert_eq!(saved.status(), ConversationStatus::Active);
        assert_eq!(saved.channel(), Channel::Unknown);
        assert!(saved.customer_id().is_none());
        assert!(saved.messages().is_empty());
    }

    #[tokio::test]
    async fn parses_the_channel_label() {
        let store = Arc::new(InMemoryConversationStore::new());

        let result = handler(Arc::clone(&store))
            .handle(StartConversationCommand::new(VendorId::new()).with_channel("email"))
            .await
            .unwrap();

        let saved = store
            .find_by_id(&result.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.channel(), Channel::Email);
    }

    #[tokio::test]
    async fn unrecognized_channel_label_maps_to_unknown() {
        let store = Arc::new(InMemoryConversationStore::new());

        let result = handler(Arc::clone(&store))
            .handle(StartConversationCommand::new(VendorId::new()).with_channel("carrier pigeon"))
            .await
            .unwrap();

        let saved = store
            .find_by_id(&result.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.channel(), Channel::Unknown);
    }

    #[tokio::test]
    async fn attaches_the_customer() {
        let store = Arc::new(InMemoryConversationStore::new());
        let customer_id = CustomerId::new();

        let result = handler(Arc::clone(&store))
            .handle(StartConversationCommand::new(VendorId::new()).with_customer(customer_id))
            .await
            .unwrap();

        let saved = store
            .find_by_id(&result.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.customer_id(), Some(&customer_id));
    }

    #[tokio::test]
    async fn drops_blank_and_duplicate_tags() {
        let store = Arc::new(InMemoryConversationStore::new());
        let tags = vec![
            "vip".to_string(),
            "   ".to_string(),
            "vip".to_string(),
            "wholesale".to_string(),
        ];

        let result = handler(Arc::clone(&store))
            .handle(StartConversationCommand::new(VendorId::new()).with_tags(tags))
            .await
            .unwrap();

        let saved = store
            .find_by_id(&result.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.tags(), &["vip".to_string(), "wholesale".to_string()]);
    }

    #[tokio::test]
    async fn seeds_a_non_empty_initial_message() {
        let store = Arc::new(InMemoryConversationStore::new());

        let result = handler(Arc::clone(&store))
            .handle(
                StartConversationCommand::new(VendorId::new())
                    .with_initial_message("  Need help with bulk pricing  "),
            )
            .await
            .unwrap();

        let saved = store
            .find_by_id(&result.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.messages().len(), 1);
        assert!(saved.messages()[0].is_vendor());
        assert_eq!(saved.messages()[0].content(), "Need help with bulk pricing");
        assert_eq!(saved.metrics().total, 1);
        assert_eq!(saved.metrics().vendor, 1);
    }

    #[tokio::test]
    async fn skips_a_blank_initial_message() {
        let store = Arc::new(InMemoryConversationStore::new());

        let result = handler(Arc::clone(&store))
            .handle(StartConversationCommand::new(VendorId::new()).with_initial_message("   "))
            .await
            .unwrap();

        let saved = store
            .find_by_id(&result.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert!(saved.messages().is_empty());
    }
}
