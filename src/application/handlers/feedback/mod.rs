//! Feedback command handlers.

mod submit_feedback;

pub use submit_feedback::{
    SubmitFeedbackCommand, SubmitFeedbackError, SubmitFeedbackHandler, SubmitFeedbackResult,
};
