//! In-Memory Conversation Store Adapter
//!
//! Stores conversations in memory. Useful for testing and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, VendorId};
use crate::ports::{
    ConversationFilter, ConversationStore, ConversationStoreError, ConversationSummary, Page,
};

/// In-memory conversation store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations (useful for tests).
    pub async fn count(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Clear all stored data (useful for tests).
    pub async fn clear(&self) {
        self.conversations.write().await.clear();
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationStoreError> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(*conversation.id(), conversation.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, ConversationStoreError> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(id).cloned())
    }

    async fn list_for_vendor(
        &self,
        vendor_id: &VendorId,
        filter: &ConversationFilter,
    ) -> Result<Page<ConversationSummary>, ConversationStoreError> {
        let conversations = self.conversations.read().await;

        let mut matching: Vec<&Conversation> = conversations
            .values()
            .filter(|conversation| conversation.vendor_id() == vendor_id)
            .filter(|conversation| {
                filter
                    .status
                    .map_or(true, |status| conversation.status() == status)
            })
            .filter(|conversation| {
                filter
                    .channel
                    .map_or(true, |channel| conversation.channel() == channel)
            })
            .filter(|conversation| {
                filter.tag.as_ref().map_or(true, |tag| {
                    conversation.tags().iter().any(|candidate| candidate == tag)
                })
            })
            .collect();

        // Newest activity first.
        matching.sort_by_key(|conversation| {
            std::cmp::Reverse(
                conversation
                    .last_message_at()
                    .copied()
                    .unwrap_or_else(|| *conversation.created_at()),
            )
        });

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .map(ConversationSummary::from_conversation)
            .collect();

        Ok(Page::new(items, total))
    }
}
