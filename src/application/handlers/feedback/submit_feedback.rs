//! SubmitFeedback command handler.
//!
//! Appends a feedback entry to a conversation, recomputes its rating
//! summary, and raises a QA flag when the vendor asked for escalation or a
//! follow-up. Ratings arrive as JSON numbers; anything that is not an
//! integer from 1 to 5 is rejected outright, fractional values included.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::conversation::{FeedbackEntry, FeedbackSource, QaFlag, RatingSummary};
use crate::domain::foundation::{ActorId, ConversationId, FeedbackRating};
use crate::ports::{ConversationStore, ConversationStoreError};

/// Command to record feedback on a conversation.
#[derive(Debug, Clone)]
pub struct SubmitFeedbackCommand {
    /// The conversation being rated.
    pub conversation_id: ConversationId,
    /// Rating as submitted. Must be an integer in [1, 5].
    pub rating: f64,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Where the feedback came from.
    pub source: FeedbackSource,
    /// Whether the vendor asked for a follow-up.
    pub follow_up_required: bool,
    /// Whether the vendor asked for escalation.
    pub escalate: bool,
    /// Who submitted the feedback, when known.
    pub submitted_by: Option<ActorId>,
}

impl SubmitFeedbackCommand {
    /// Creates a command with no comment, flags, or submitter.
    pub fn new(conversation_id: ConversationId, rating: f64) -> Self {
        Self {
            conversation_id,
            rating,
            comment: None,
            source: FeedbackSource::default(),
            follow_up_required: false,
            escalate: false,
            submitted_by: None,
        }
    }

    /// Attaches a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the feedback source.
    pub fn with_source(mut self, source: FeedbackSource) -> Self {
        self.source = source;
        self
    }

    /// Requests a follow-up.
    pub fn with_follow_up(mut self) -> Self {
        self.follow_up_required = true;
        self
    }

    /// Requests escalation.
    pub fn with_escalation(mut self) -> Self {
        self.escalate = true;
        self
    }

    /// Records who submitted the feedback.
    pub fn with_submitted_by(mut self, actor: ActorId) -> Self {
        self.submitted_by = Some(actor);
        self
    }
}

/// Errors that can occur when submitting feedback.
#[derive(Debug, Clone, Error)]
pub enum SubmitFeedbackError {
    /// The payload failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The conversation does not exist.
    #[error("Conversation not found")]
    NotFound,

    /// Conversation persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SubmitFeedbackError {
    /// HTTP-style status class for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            SubmitFeedbackError::Validation(_) => 400,
            SubmitFeedbackError::NotFound => 404,
            SubmitFeedbackError::Storage(_) => 500,
        }
    }
}

impl From<ConversationStoreError> for SubmitFeedbackError {
    fn from(err: ConversationStoreError) -> Self {
        SubmitFeedbackError::Storage(err.to_string())
    }
}

/// Result of submitting feedback.
#[derive(Debug, Clone)]
pub struct SubmitFeedbackResult {
    /// Rating summary after the entry was applied.
    pub rating: RatingSummary,
    /// The entry that was recorded.
    pub entry: FeedbackEntry,
    /// All flags currently open on the conversation.
    pub open_flags: Vec<QaFlag>,
}

/// Handler for SubmitFeedback commands.
pub struct SubmitFeedbackHandler<S>
where
    S: ConversationStore,
{
    store: Arc<S>,
}

impl<S> SubmitFeedbackHandler<S>
where
    S: ConversationStore,
{
    /// Creates a new handler.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Records the feedback and saves the conversation.
    pub async fn handle(
        &self,
        cmd: SubmitFeedbackCommand,
    ) -> Result<SubmitFeedbackResult, SubmitFeedbackError> {
        let rating = parse_rating(cmd.rating)?;

        let mut conversation = self
            .store
            .find_by_id(&cmd.conversation_id)
            .await?
            .ok_or(SubmitFeedbackError::NotFound)?;

        // Escalation implies a follow-up even when the vendor did not tick it.
        let follow_up = cmd.follow_up_required || cmd.escalate;
        let entry = FeedbackEntry::new(
            rating,
            cmd.comment.as_deref(),
            cmd.source,
            follow_up,
            cmd.submitted_by.clone(),
        );
        conversation.record_feedback(entry.clone());

        if follow_up {
            let reason = entry
                .comment()
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!(
                        "Follow-up requested on a {}-star rating",
                        rating.as_u8()
                    )
                });
            conversation.raise_flag(reason, cmd.source, cmd.submitted_by);
        }

        self.store.save(&conversation).await?;

        Ok(SubmitFeedbackResult {
            rating: *conversation.rating(),
            entry,
            open_flags: conversation.open_flags().into_iter().cloned().collect(),
        })
    }
}

/// Validates a JSON-number rating into the closed 1..=5 scale.
fn parse_rating(value: f64) -> Result<FeedbackRating, SubmitFeedbackError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(SubmitFeedbackError::Validation(format!(
            "rating must be a whole number between 1 and 5, got {value}"
        )));
    }
    FeedbackRating::try_from_i64(value as i64).map_err(|_| {
        SubmitFeedbackError::Validation(format!(
            "rating must be between 1 and 5, got {value}"
        ))
    })
}
