//! Quality-assurance flags raised on conversations.
//!
//! A flag marks a conversation for human review, typically after a
//! feedback escalation. Flags move through a small review lifecycle and
//! keep their resolution audit fields consistent with their status.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{ActorId, DomainError, Timestamp};

use super::feedback::FeedbackSource;

/// Maximum stored reason length, in characters.
const MAX_REASON_CHARS: usize = 1000;

/// Unique identifier for a QA flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QaFlagId(Uuid);

impl QaFlagId {
    /// Creates a new random QaFlagId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a QaFlagId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for QaFlagId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QaFlagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review lifecycle status of a QA flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QaFlagStatus {
    #[default]
    Open,
    InReview,
    Resolved,
    Dismissed,
}

impl QaFlagStatus {
    /// Returns true while the flag still needs attention.
    pub fn is_open(&self) -> bool {
        matches!(self, QaFlagStatus::Open | QaFlagStatus::InReview)
    }

    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            QaFlagStatus::Open => "open",
            QaFlagStatus::InReview => "in_review",
            QaFlagStatus::Resolved => "resolved",
            QaFlagStatus::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for QaFlagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A QA flag on a conversation.
///
/// # Invariants
///
/// - `resolved_at` and `resolved_by` are both set exactly when the
///   status is `Resolved` or `Dismissed`, and cleared on reopen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaFlag {
    id: QaFlagId,
    reason: String,
    source: FeedbackSource,
    status: QaFlagStatus,
    notes: Vec<String>,
    raised_by: Option<ActorId>,
    raised_at: Timestamp,
    resolved_at: Option<Timestamp>,
    resolved_by: Option<ActorId>,
}

impl QaFlag {
    /// Raises a new open flag. The reason is trimmed and capped at 1000
    /// characters.
    pub fn new(
        reason: impl Into<String>,
        source: FeedbackSource,
        raised_by: Option<ActorId>,
    ) -> Self {
        let reason: String = reason.into().trim().chars().take(MAX_REASON_CHARS).collect();
        Self {
            id: QaFlagId::new(),
            reason,
            source,
            status: QaFlagStatus::Open,
            notes: Vec::new(),
            raised_by,
            raised_at: Timestamp::now(),
            resolved_at: None,
            resolved_by: None,
        }
    }

    /// Reconstitutes a flag from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: QaFlagId,
        reason: String,
        source: FeedbackSource,
        status: QaFlagStatus,
        notes: Vec<String>,
        raised_by: Option<ActorId>,
        raised_at: Timestamp,
        resolved_at: Option<Timestamp>,
        resolved_by: Option<ActorId>,
    ) -> Self {
        Self {
            id,
            reason,
            source,
            status,
            notes,
            raised_by,
            raised_at,
            resolved_at,
            resolved_by,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the flag ID.
    pub fn id(&self) -> &QaFlagId {
        &self.id
    }

    /// Returns why the flag was raised.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the originating source.
    pub fn source(&self) -> FeedbackSource {
        self.source
    }

    /// Returns the current status.
    pub fn status(&self) -> QaFlagStatus {
        self.status
    }

    /// Returns the review annotations in insertion order.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Returns who raised the flag, when known.
    pub fn raised_by(&self) -> Option<&ActorId> {
        self.raised_by.as_ref()
    }

    /// Returns when the flag was raised.
    pub fn raised_at(&self) -> &Timestamp {
        &self.raised_at
    }

    /// Returns when the flag was resolved or dismissed, if it was.
    pub fn resolved_at(&self) -> Option<&Timestamp> {
        self.resolved_at.as_ref()
    }

    /// Returns who resolved or dismissed the flag, if anyone.
    pub fn resolved_by(&self) -> Option<&ActorId> {
        self.resolved_by.as_ref()
    }

    /// Returns true while the flag still needs attention.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a review annotation. Blank notes are ignored.
    pub fn add_note(&mut self, note: impl Into<String>) {
        let note = note.into().trim().to_string();
        if !note.is_empty() {
            self.notes.push(note);
        }
    }

    /// Moves an open flag into review.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the flag is `Open`
    pub fn begin_review(&mut self) -> Result<(), DomainError> {
        if self.status != QaFlagStatus::Open {
            return Err(DomainError::invalid_transition(
                self.status.as_str(),
                "begin_review",
            ));
        }
        self.status = QaFlagStatus::InReview;
        Ok(())
    }

    /// Resolves the flag, recording who closed it out.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the flag is `Open` or `InReview`
    pub fn resolve(&mut self, by: ActorId) -> Result<(), DomainError> {
        self.finish(QaFlagStatus::Resolved, by, "resolve")
    }

    /// Dismisses the flag as not actionable, recording who decided.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the flag is `Open` or `InReview`
    pub fn dismiss(&mut self, by: ActorId) -> Result<(), DomainError> {
        self.finish(QaFlagStatus::Dismissed, by, "dismiss")
    }

    /// Reopens a resolved or dismissed flag, clearing the resolution
    /// fields.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the flag is still open
    pub fn reopen(&mut self) -> Result<(), DomainError> {
        if self.status.is_open() {
            return Err(DomainError::invalid_transition(
                self.status.as_str(),
                "reopen",
            ));
        }
        self.status = QaFlagStatus::Open;
        self.resolved_at = None;
        self.resolved_by = None;
        Ok(())
    }

    fn finish(
        &mut self,
        target: QaFlagStatus,
        by: ActorId,
        attempted: &str,
    ) -> Result<(), DomainError> {
        if !self.status.is_open() {
            return Err(DomainError::invalid_transition(
                self.status.as_str(),
                attempted,
            ));
        }
        self.status = target;
        self.resolved_at = Some(Timestamp::now());
        self.resolved_by = Some(by);
        Ok(())
    }
}
