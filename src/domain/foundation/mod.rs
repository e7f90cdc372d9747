//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Vendor Pilot domain.

mod errors;
mod ids;
mod metadata;
mod rating;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ActorId, AuditId, ConversationId, CustomerId, VendorId};
pub use metadata::Metadata;
pub use rating::FeedbackRating;
pub use timestamp::Timestamp;
