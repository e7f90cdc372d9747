//! Conversation domain module.
//!
//! Owns the conversation aggregate: transcript, message metrics,
//! feedback trail with its rating summary, and QA flags.

mod aggregate;
mod channel;
mod feedback;
mod message;
mod metrics;
mod qa_flag;

pub use aggregate::Conversation;
pub use channel::{Channel, ConversationStatus};
pub use feedback::{FeedbackEntry, FeedbackSource, RatingSummary};
pub use message::{Message, MessageId, MessageRole};
pub use metrics::MessageMetrics;
pub use qa_flag::{QaFlag, QaFlagId, QaFlagStatus};
