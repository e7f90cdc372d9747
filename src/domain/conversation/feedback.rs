//! Feedback entries and the per-conversation rating summary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ActorId, FeedbackRating, Timestamp};

/// Maximum stored comment length, in characters.
const MAX_COMMENT_CHARS: usize = 1000;

/// Where a piece of feedback (or a QA flag) originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    #[default]
    Customer,
    Vendor,
    Agent,
    System,
}

impl FeedbackSource {
    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSource::Customer => "customer",
            FeedbackSource::Vendor => "vendor",
            FeedbackSource::Agent => "agent",
            FeedbackSource::System => "system",
        }
    }
}

impl fmt::Display for FeedbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single immutable feedback submission.
///
/// Comments are normalized at construction: trimmed, capped at 1000
/// characters, and dropped entirely when blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    rating: FeedbackRating,
    comment: Option<String>,
    source: FeedbackSource,
    follow_up: bool,
    created_by: Option<ActorId>,
    submitted_at: Timestamp,
}

impl FeedbackEntry {
    /// Creates a feedback entry, normalizing the comment.
    pub fn new(
        rating: FeedbackRating,
        comment: Option<&str>,
        source: FeedbackSource,
        follow_up: bool,
        created_by: Option<ActorId>,
    ) -> Self {
        let comment = comment.and_then(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.chars().take(MAX_COMMENT_CHARS).collect())
            }
        });

        Self {
            rating,
            comment,
            source,
            follow_up,
            created_by,
            submitted_at: Timestamp::now(),
        }
    }

    /// Reconstitutes an entry from persistence (no normalization).
    pub fn reconstitute(
        rating: FeedbackRating,
        comment: Option<String>,
        source: FeedbackSource,
        follow_up: bool,
        created_by: Option<ActorId>,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            rating,
            comment,
            source,
            follow_up,
            created_by,
            submitted_at,
        }
    }

    /// Returns the rating.
    pub fn rating(&self) -> FeedbackRating {
        self.rating
    }

    /// Returns the normalized comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the source.
    pub fn source(&self) -> FeedbackSource {
        self.source
    }

    /// Returns true if the submitter asked for a follow-up.
    pub fn follow_up(&self) -> bool {
        self.follow_up
    }

    /// Returns who created the entry, when known.
    pub fn created_by(&self) -> Option<&ActorId> {
        self.created_by.as_ref()
    }

    /// Returns when the feedback was submitted.
    pub fn submitted_at(&self) -> &Timestamp {
        &self.submitted_at
    }
}

/// Aggregated rating state for a conversation.
///
/// Always recomputed from the full entry list rather than adjusted
/// incrementally, so a drifted average can never survive a new
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u64,
    pub last_rated_at: Option<Timestamp>,
}

impl RatingSummary {
    /// Recomputes the summary from all entries.
    ///
    /// The average is the arithmetic mean rounded to two decimals.
    pub fn recompute(entries: &[FeedbackEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let sum: u64 = entries.iter().map(|e| e.rating().as_u8() as u64).sum();
        let mean = sum as f64 / entries.len() as f64;
        let average = (mean * 100.0).round() / 100.0;
        let last_rated_at = entries.iter().map(|e| *e.submitted_at()).max();

        Self {
            average,
            count: entries.len() as u64,
            last_rated_at,
        }
    }
}
