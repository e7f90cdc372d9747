//! Channel and lifecycle status enums for conversations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel a conversation arrived through.
///
/// Unrecognized channel strings normalize to `Unknown` rather than
/// failing, so ingestion never rejects a conversation over labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Email,
    InApp,
    Whatsapp,
    #[default]
    Unknown,
}

impl Channel {
    /// Parses a channel label, mapping anything unrecognized to `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "sms" => Channel::Sms,
            "email" => Channel::Email,
            "in_app" | "in-app" | "inapp" => Channel::InApp,
            "whatsapp" => Channel::Whatsapp,
            _ => Channel::Unknown,
        }
    }

    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
            Channel::InApp => "in_app",
            Channel::Whatsapp => "whatsapp",
            Channel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a conversation.
///
/// Message appends are permitted in every status; the status gates
/// lifecycle transitions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    Active,
    Closed,
    Archived,
}

impl ConversationStatus {
    /// Returns true if no further lifecycle transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationStatus::Archived)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Active -> Closed
    /// - Active -> Archived
    /// - Closed -> Archived
    pub fn can_transition_to(&self, target: &ConversationStatus) -> bool {
        use ConversationStatus::*;
        matches!(
            (self, target),
            (Active, Closed) | (Active, Archived) | (Closed, Archived)
        )
    }

    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Active => "active",
            ConversationStatus::Closed => "closed",
            ConversationStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_default_is_unknown() {
        assert_eq!(Channel::default(), Channel::Unknown);
    }

    #[test]
    fn channel_parse_recognizes_known_labels() {
        assert_eq!(Channel::parse("sms"), Channel::Sms);
        assert_eq!(Channel::parse("Email"), Channel::Email);
        assert_eq!(Channel::parse("in_app"), Channel::InApp);
        assert_eq!(Channel::parse("in-app"), Channel::InApp);
        assert_eq!(Channel::parse("WHATSAPP"), Channel::Whatsapp);
    }

    #[test]
    fn channel_parse_maps_unrecognized_to_unknown() {
        assert_eq!(Channel::parse("carrier_pigeon"), Channel::Unknown);
        assert_eq!(Channel::parse(""), Channel::Unknown);
    }

    #[test]
    fn channel_serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&Channel::InApp).unwrap(), "\"in_app\"");
    }

    #[test]
    fn status_default_is_active() {
        assert_eq!(ConversationStatus::default(), ConversationStatus::Active);
    }

    #[test]
    fn status_active_can_close_or_archive() {
        assert!(ConversationStatus::Active.can_transition_to(&ConversationStatus::Closed));
        assert!(ConversationStatus::Active.can_transition_to(&ConversationStatus::Archived));
    }

    #[test]
    fn status_closed_can_only_archive() {
        assert!(ConversationStatus::Closed.can_transition_to(&ConversationStatus::Archived));
        assert!(!ConversationStatus::Closed.can_transition_to(&ConversationStatus::Active));
        assert!(!ConversationStatus::Closed.can_transition_to(&ConversationStatus::Closed));
    }

    #[test]
    fn status_archived_is_terminal() {
        assert!(ConversationStatus::Archived.is_terminal());
        assert!(!ConversationStatus::Archived.can_transition_to(&ConversationStatus::Active));
        assert!(!ConversationStatus::Archived.can_transition_to(&ConversationStatus::Closed));
    }

    #[test]
    fn status_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&ConversationStatus::Archived).unwrap(),
            "\"archived\""
        );
    }

    #[test]
    fn status_deserializes_from_snake_case() {
        let status: ConversationStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(status, ConversationStatus::Closed);
    }
}
