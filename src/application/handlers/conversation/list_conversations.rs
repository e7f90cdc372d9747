//! ListConversations query handler.
//!
//! Pages through a vendor's conversation summaries, newest activity first.
//! Filtering and ordering live in the store; this handler only scopes the
//! query to the requesting vendor.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::VendorId;
use crate::ports::{
    ConversationFilter, ConversationStore, ConversationStoreError, ConversationSummary, Page,
};

/// Query for a vendor's conversation listing.
#[derive(Debug, Clone)]
pub struct ListConversationsQuery {
    /// The vendor whose conversations to list.
    pub vendor_id: VendorId,
    /// Filter and pagination.
    pub filter: ConversationFilter,
}

impl ListConversationsQuery {
    /// Creates a query with the default filter (first page, no criteria).
    pub fn new(vendor_id: VendorId) -> Self {
        Self {
            vendor_id,
            filter: ConversationFilter::default(),
        }
    }

    /// Replaces the filter.
    pub fn with_filter(mut self, filter: ConversationFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Errors that can occur when listing conversations.
#[derive(Debug, Clone, Error)]
pub enum ListConversationsError {
    /// The listing query failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ConversationStoreError> for ListConversationsError {
    fn from(err: ConversationStoreError) -> Self {
        ListConversationsError::Storage(err.to_string())
    }
}

/// Handler for ListConversations queries.
pub struct ListConversationsHandler<S>
where
    S: ConversationStore,
{
    store: Arc<S>,
}

impl<S> ListConversationsHandler<S>
where
    S: ConversationStore,
{
    /// Creates a new handler.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists the vendor's conversations.
    pub async fn handle(
        &self,
        query: ListConversationsQuery,
    ) -> Result<Page<ConversationSummary>, ListConversationsError> {
        let page = self
            .store
            .list_for_vendor(&query.vendor_id, &query.filter)
            .await?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::domain::conversation::{Channel, Conversation, Message};
    use crate::domain::foundation::ConversationId;

    async fn seed(store: &InMemoryConversationStore, vendor_id: VendorId, tag: &str) {
        let mut conversation =
            Conversation::new(ConversationId::new(), vendor_id, Channel::Email);
        conversation.add_tag(tag);
        store.save(&conversation).await.unwrap();
    }

    #[tokio::test]
    async fn lists_only_the_requesting_vendors_conversations() {
        let store = Arc::new(InMemoryConversationStore::new());
        let vendor_id = VendorId::new();
        seed(&store, vendor_id, "mine").await;
        seed(&store, VendorId::new(), "theirs").await;

        let handler = ListConversationsHandler::new(Arc::clone(&store));
        let page = handler
            .handle(ListConversationsQuery::new(vendor_id))
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].tags, vec!["mine".to_string()]);
    }

    #[tokio::test]
    async fn orders_by_latest_activity_first() {
        let store = Arc::new(InMemoryConversationStore::new());
        let vendor_id = VendorId::new();

        let quiet = Conversation::new(ConversationId::new(), vendor_id, Channel::Email);
        let quiet_id = *quiet.id();
        store.save(&quiet).await.unwrap();

        let mut busy = Conversation::new(ConversationId::new(), vendor_id, Channel::Sms);
        busy.append_message(Message::vendor("Ping"));
        let busy_id = *busy.id();
        store.save(&busy).await.unwrap();

        let handler = ListConversationsHandler::new(Arc::clone(&store));
        let page = handler
            .handle(ListConversationsQuery::new(vendor_id))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(&page.items[0].id, &busy_id);
        assert_eq!(&page.items[1].id, &quiet_id);
    }

    #[tokio::test]
    async fn applies_the_tag_filter() {
        let store = Arc::new(InMemoryConversationStore::new());
        let vendor_id = VendorId::new();
        seed(&store, vendor_id, "vip").await;
        seed(&store, vendor_id, "wholesale").await;

        let handler = ListConversationsHandler::new(Arc::clone(&store));
        let query = ListConversationsQuery::new(vendor_id)
            .with_filter(ConversationFilter::default().with_tag("vip"));
        let page = handler.handle(query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].tags, vec!["vip".to_string()]);
    }
}
