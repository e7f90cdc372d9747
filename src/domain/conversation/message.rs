//! Message entity for conversations.
//!
//! Messages are immutable records of the exchanges within a conversation:
//! vendor prompts, agent replies, customer context, and tool execution
//! markers. Each message carries a role, content, and a metadata bag.

use crate::domain::foundation::{Metadata, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Role of a message author in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// The vendor operating the back office.
    Vendor,
    /// An end customer of the vendor's storefront.
    Customer,
    /// The assistant agent.
    Agent,
    /// A tool execution marker emitted during an agent turn.
    Tool,
}

impl MessageRole {
    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::Vendor => "vendor",
            MessageRole::Customer => "customer",
            MessageRole::Agent => "agent",
            MessageRole::Tool => "tool",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `created_at` is set at construction and never changes
/// - `tool_name` and `tool_call_id` are present only on tool messages
///
/// Content may be empty: tool markers sometimes carry their payload in
/// metadata only, and blank-input rejection is an orchestration rule,
/// not a message rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    id: MessageId,

    /// The role of the message author.
    role: MessageRole,

    /// The content of the message.
    content: String,

    /// Structured metadata (tool args/results, provider info, usage).
    #[serde(default)]
    metadata: Metadata,

    /// Name of the executed tool, for tool messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,

    /// Provider-correlated call id, for tool messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,

    /// When the message was created.
    created_at: Timestamp,
}

impl Message {
    /// Creates a new message with the given role and content.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            metadata: Metadata::new(),
            tool_name: None,
            tool_call_id: None,
            created_at: Timestamp::now(),
        }
    }

    /// Creates a vendor message.
    pub fn vendor(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Vendor, content)
    }

    /// Creates a customer message.
    pub fn customer(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Customer, content)
    }

    /// Creates an agent message.
    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Agent, content)
    }

    /// Creates a tool execution marker.
    pub fn tool(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut msg = Self::new(MessageRole::Tool, content);
        msg.tool_name = Some(tool_name.into());
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    /// Attaches metadata, replacing any existing bag.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Reconstitutes a message from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: MessageId,
        role: MessageRole,
        content: String,
        metadata: Metadata,
        tool_name: Option<String>,
        tool_call_id: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            role,
            content,
            metadata,
            tool_name,
            tool_call_id,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the message ID.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the role.
    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the metadata bag.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the tool name, for tool messages.
    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    /// Returns the tool call id, for tool messages.
    pub fn tool_call_id(&self) -> Option<&str> {
        self.tool_call_id.as_deref()
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this message is from the vendor.
    pub fn is_vendor(&self) -> bool {
        self.role == MessageRole::Vendor
    }

    /// Returns true if this message is from the agent.
    pub fn is_agent(&self) -> bool {
        self.role == MessageRole::Agent
    }

    /// Returns true if this is a tool execution marker.
    pub fn is_tool(&self) -> bool {
        self.role == MessageRole::Tool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod message_id {
        use super::*;

        #[test]
        fn generates_unique_values() {
            let id1 = MessageId::new();
            let id2 = MessageId::new();
            assert_ne!(id1, id2);
        }

        #[test]
        fn parses_from_valid_string() {
            let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
            let id: MessageId = uuid_str.parse().unwrap();
            assert_eq!(id.to_string(), uuid_str);
        }

        #[test]
        fn from_uuid_preserves_value() {
            let uuid = Uuid::new_v4();
            let id = MessageId::from_uuid(uuid);
            assert_eq!(id.as_uuid(), &uuid);
        }
    }

    mod role {
        use super::*;

        #[test]
        fn serializes_to_snake_case() {
            assert_eq!(
                serde_json::to_string(&MessageRole::Vendor).unwrap(),
                "\"vendor\""
            );
            assert_eq!(serde_json::to_string(&MessageRole::Tool).unwrap(), "\"tool\"");
        }

        #[test]
        fn as_str_matches_serde_labels() {
            assert_eq!(MessageRole::Agent.as_str(), "agent");
            assert_eq!(MessageRole::Customer.as_str(), "customer");
        }
    }

    mod message_construction {
        use super::*;

        #[test]
        fn vendor_creates_vendor_message() {
            let msg = Message::vendor("What's the price?");
            assert!(msg.is_vendor());
            assert_eq!(msg.content(), "What's the price?");
        }

        #[test]
        fn agent_creates_agent_message() {
            let msg = Message::agent("Here is what I found.");
            assert!(msg.is_agent());
            assert!(!msg.is_vendor());
        }

        #[test]
        fn customer_creates_customer_message() {
            let msg = Message::customer("Context from the storefront");
            assert_eq!(msg.role(), MessageRole::Customer);
        }

        #[test]
        fn tool_carries_name_and_call_id() {
            let msg = Message::tool("calculate_pricing", "calculate_pricing-17-ab", "{}");
            assert!(msg.is_tool());
            assert_eq!(msg.tool_name(), Some("calculate_pricing"));
            assert_eq!(msg.tool_call_id(), Some("calculate_pricing-17-ab"));
        }

        #[test]
        fn non_tool_messages_have_no_tool_fields() {
            let msg = Message::vendor("hello");
            assert_eq!(msg.tool_name(), None);
            assert_eq!(msg.tool_call_id(), None);
        }

        #[test]
        fn empty_content_is_allowed() {
            let msg = Message::tool("lookup_inventory", "call-1", "");
            assert_eq!(msg.content(), "");
        }

        #[test]
        fn with_metadata_attaches_bag() {
            let msg = Message::agent("done").with_metadata(
                Metadata::new().with("provider", json!("mock")),
            );
            assert_eq!(msg.metadata().get("provider"), Some(&json!("mock")));
        }

        #[test]
        fn sets_created_at() {
            let msg = Message::vendor("Hello");
            let now = Timestamp::now();
            assert!(msg.created_at().as_datetime() <= now.as_datetime());
        }
    }

    mod message_reconstitute {
        use super::*;

        #[test]
        fn reconstitute_preserves_all_fields() {
            let id = MessageId::new();
            let created_at = Timestamp::now();
            let metadata = Metadata::new().with("status", json!("success"));

            let msg = Message::reconstitute(
                id,
                MessageRole::Tool,
                "result body".to_string(),
                metadata.clone(),
                Some("estimate_delivery".to_string()),
                Some("call-9".to_string()),
                created_at,
            );

            assert_eq!(msg.id(), &id);
            assert_eq!(msg.role(), MessageRole::Tool);
            assert_eq!(msg.content(), "result body");
            assert_eq!(msg.metadata(), &metadata);
            assert_eq!(msg.tool_name(), Some("estimate_delivery"));
            assert_eq!(msg.created_at(), &created_at);
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn round_trips_through_json() {
            let msg = Message::tool("send_message", "call-3", "sent")
                .with_metadata(Metadata::new().with("mock", json!(true)));
            let json = serde_json::to_string(&msg).unwrap();
            let back: Message = serde_json::from_str(&json).unwrap();
            assert_eq!(back, msg);
        }

        #[test]
        fn omits_tool_fields_when_absent() {
            let msg = Message::vendor("hi");
            let json = serde_json::to_string(&msg).unwrap();
            assert!(!json.contains("tool_name"));
            assert!(!json.contains("tool_call_id"));
        }
    }
}
