//! Feedback rating value object (1 to 5 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Customer satisfaction rating: 1 (worst) to 5 (best).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FeedbackRating {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl FeedbackRating {
    /// Creates a FeedbackRating from an integer, returning error if out of range.
    pub fn try_from_i64(value: i64) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(FeedbackRating::One),
            2 => Ok(FeedbackRating::Two),
            3 => Ok(FeedbackRating::Three),
            4 => Ok(FeedbackRating::Four),
            5 => Ok(FeedbackRating::Five),
            _ => Err(ValidationError::out_of_range(
                "rating",
                1,
                5,
                value.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            )),
        }
    }

    /// Returns the numeric value.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Returns true if the rating signals dissatisfaction (1 or 2).
    pub fn is_detractor(&self) -> bool {
        self.as_u8() <= 2
    }
}

impl fmt::Display for FeedbackRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
