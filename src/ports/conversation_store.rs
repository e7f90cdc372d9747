//! Conversation Store Port - Persistence interface for conversations.
//!
//! The aggregate is saved and loaded whole; listings go through a summary
//! projection so the read side never has to hydrate full message history.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::conversation::{Channel, Conversation, ConversationStatus};
use crate::domain::foundation::{ConversationId, Timestamp, VendorId};

/// Port for conversation persistence.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Saves the conversation, replacing any stored version.
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationStoreError>;

    /// Finds a conversation by id. Absence is not an error.
    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, ConversationStoreError>;

    /// Lists a vendor's conversations, newest activity first.
    async fn list_for_vendor(
        &self,
        vendor_id: &VendorId,
        filter: &ConversationFilter,
    ) -> Result<Page<ConversationSummary>, ConversationStoreError>;
}

/// Filter and pagination for conversation listings.
#[derive(Debug, Clone)]
pub struct ConversationFilter {
    /// Only conversations in this status.
    pub status: Option<ConversationStatus>,
    /// Only conversations on this channel.
    pub channel: Option<Channel>,
    /// Only conversations carrying this tag.
    pub tag: Option<String>,
    /// Page size.
    pub limit: u32,
    /// Offset into the filtered set.
    pub offset: u32,
}

impl Default for ConversationFilter {
    fn default() -> Self {
        Self {
            status: None,
            channel: None,
            tag: None,
            limit: 20,
            offset: 0,
        }
    }
}

impl ConversationFilter {
    /// Restricts to one status.
    pub fn with_status(mut self, status: ConversationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one channel.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Restricts to conversations carrying a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets pagination.
    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

/// One page of results plus the unfiltered-page total.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total items matching the filter, across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Creates an empty page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Listing projection of a conversation.
///
/// Carries enough for a back-office list row without the message bodies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub vendor_id: VendorId,
    pub channel: Channel,
    pub status: ConversationStatus,
    pub tags: Vec<String>,
    pub message_count: u64,
    pub rating_average: f64,
    pub rating_count: u64,
    pub open_flag_count: u64,
    pub last_message_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl ConversationSummary {
    /// Projects a summary from the full aggregate.
    pub fn from_conversation(conversation: &Conversation) -> Self {
        Self {
            id: *conversation.id(),
            vendor_id: *conversation.vendor_id(),
            channel: conversation.channel(),
            status: conversation.status(),
            tags: conversation.tags().to_vec(),
            message_count: conversation.metrics().total,
            rating_average: conversation.rating().average,
            rating_count: conversation.rating().count,
            open_flag_count: conversation.open_flags().len() as u64,
            last_message_at: conversation.last_message_at().copied(),
            created_at: *conversation.created_at(),
        }
    }
}

/// Conversation store errors.
#[derive(Debug, thiserror::Error)]
pub enum ConversationStoreError {
    /// Underlying storage failed.
    #[error("storage error: {message}")]
    Storage {
        /// Error details.
        message: String,
    },

    /// Stored data could not be read back into the aggregate.
    #[error("serialization error: {message}")]
    Serialization {
        /// Error details.
        message: String,
    },
}

impl ConversationStoreError {
    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
