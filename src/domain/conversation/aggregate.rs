//! Conversation aggregate entity.
//!
//! A conversation belongs to exactly one vendor and holds the ordered
//! message transcript, incrementally-maintained message metrics, the
//! feedback trail with its rating summary, and any QA flags raised on it.
//!
//! # Aggregate Boundary
//!
//! Conversation is an aggregate root that owns its messages, feedback
//! entries, and flags. Tool audit records are deliberately outside the
//! boundary: they are written through their own port and survive even
//! when a conversation save fails.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ActorId, ConversationId, CustomerId, DomainError, Timestamp, VendorId,
};

use super::channel::{Channel, ConversationStatus};
use super::feedback::{FeedbackEntry, FeedbackSource, RatingSummary};
use super::message::Message;
use super::metrics::MessageMetrics;
use super::qa_flag::QaFlag;

/// Conversation aggregate - one vendor dialogue with the agent.
///
/// # Invariants
///
/// - `id` is globally unique, `vendor_id` is immutable
/// - Messages are append-only and ordered by insertion
/// - `metrics` always matches the role partition of `messages`
/// - `last_message_at` never moves backwards
/// - `rating` is always the full recomputation over `feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier for this conversation.
    id: ConversationId,

    /// The vendor that owns this conversation.
    vendor_id: VendorId,

    /// The storefront customer involved, when known.
    customer_id: Option<CustomerId>,

    /// Channel the conversation arrived through.
    channel: Channel,

    /// Lifecycle status.
    status: ConversationStatus,

    /// Vendor-assigned labels, deduplicated, insertion order kept.
    tags: Vec<String>,

    /// Messages in this conversation (append order).
    messages: Vec<Message>,

    /// Message counters maintained on append.
    metrics: MessageMetrics,

    /// Feedback submissions in arrival order.
    feedback: Vec<FeedbackEntry>,

    /// Rating summary recomputed after every submission.
    rating: RatingSummary,

    /// QA flags raised on this conversation.
    flags: Vec<QaFlag>,

    /// When the conversation was created.
    created_at: Timestamp,

    /// When the conversation was last mutated.
    updated_at: Timestamp,

    /// Monotonic watermark of message activity.
    last_message_at: Option<Timestamp>,
}

impl Conversation {
    /// Creates a new active conversation for a vendor.
    pub fn new(id: ConversationId, vendor_id: VendorId, channel: Channel) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            vendor_id,
            customer_id: None,
            channel,
            status: ConversationStatus::Active,
            tags: Vec::new(),
            messages: Vec::new(),
            metrics: MessageMetrics::new(),
            feedback: Vec::new(),
            rating: RatingSummary::default(),
            flags: Vec::new(),
            created_at: now,
            updated_at: now,
            last_message_at: None,
        }
    }

    /// Associates a storefront customer.
    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Reconstitutes a conversation from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ConversationId,
        vendor_id: VendorId,
        customer_id: Option<CustomerId>,
        channel: Channel,
        status: ConversationStatus,
        tags: Vec<String>,
        messages: Vec<Message>,
        metrics: MessageMetrics,
        feedback: Vec<FeedbackEntry>,
        rating: RatingSummary,
        flags: Vec<QaFlag>,
        created_at: Timestamp,
        updated_at: Timestamp,
        last_message_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            vendor_id,
            customer_id,
            channel,
            status,
            tags,
            messages,
            metrics,
            feedback,
            rating,
            flags,
            created_at,
            updated_at,
            last_message_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the conversation ID.
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns the owning vendor ID.
    pub fn vendor_id(&self) -> &VendorId {
        &self.vendor_id
    }

    /// Returns the customer ID, when known.
    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.customer_id.as_ref()
    }

    /// Returns the channel.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    /// Returns the tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns all messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the last message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the message counters.
    pub fn metrics(&self) -> &MessageMetrics {
        &self.metrics
    }

    /// Returns the feedback trail in arrival order.
    pub fn feedback(&self) -> &[FeedbackEntry] {
        &self.feedback
    }

    /// Returns the rating summary.
    pub fn rating(&self) -> &RatingSummary {
        &self.rating
    }

    /// Returns all QA flags.
    pub fn flags(&self) -> &[QaFlag] {
        &self.flags
    }

    /// Returns the flags still needing attention.
    pub fn open_flags(&self) -> Vec<&QaFlag> {
        self.flags.iter().filter(|f| f.is_open()).collect()
    }

    /// Returns when the conversation was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the conversation was last mutated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns the message activity watermark.
    pub fn last_message_at(&self) -> Option<&Timestamp> {
        self.last_message_at.as_ref()
    }

    /// Returns true if any vendor message has been recorded.
    pub fn has_vendor_message(&self) -> bool {
        self.metrics.vendor > 0
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a message.
    ///
    /// Appends are permitted in every lifecycle status; an archived
    /// conversation still accepts late tool markers and transcripts.
    /// Metrics and the activity watermark update atomically with the
    /// append.
    pub fn append_message(&mut self, message: Message) {
        self.metrics.record(message.role());
        let at = *message.created_at();
        self.last_message_at = Some(match self.last_message_at {
            Some(prev) => prev.latest_of(at),
            None => at,
        });
        self.messages.push(message);
        self.updated_at = Timestamp::now();
    }

    /// Adds a tag if it is non-blank and not already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into().trim().to_string();
        if tag.is_empty() || self.tags.iter().any(|t| t == &tag) {
            return;
        }
        self.tags.push(tag);
        self.updated_at = Timestamp::now();
    }

    /// Records a feedback entry and recomputes the rating summary.
    pub fn record_feedback(&mut self, entry: FeedbackEntry) {
        self.feedback.push(entry);
        self.rating = RatingSummary::recompute(&self.feedback);
        self.updated_at = Timestamp::now();
    }

    /// Raises an open QA flag and returns it.
    pub fn raise_flag(
        &mut self,
        reason: impl Into<String>,
        source: FeedbackSource,
        raised_by: Option<ActorId>,
    ) -> &QaFlag {
        self.flags.push(QaFlag::new(reason, source, raised_by));
        self.updated_at = Timestamp::now();
        self.flags.last().expect("flag was just pushed")
    }

    /// Closes an active conversation.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the status is `Active`
    pub fn close(&mut self) -> Result<(), DomainError> {
        self.transition_to(ConversationStatus::Closed, "close")
    }

    /// Archives the conversation. Terminal.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already archived
    pub fn archive(&mut self) -> Result<(), DomainError> {
        self.transition_to(ConversationStatus::Archived, "archive")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn transition_to(
        &mut self,
        target: ConversationStatus,
        attempted: &str,
    ) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::invalid_transition(
                self.status.as_str(),
                attempted,
            ));
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
