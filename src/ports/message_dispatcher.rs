//! Message Dispatcher Port - Interface for outbound vendor messaging.
//!
//! The send_message tool hands the composed message to this port; the
//! adapter behind it decides how (or whether) the message actually leaves
//! the system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for delivering vendor-initiated messages to customers.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Delivers one outbound message.
    async fn dispatch(&self, message: OutboundMessage) -> Result<DeliveryReceipt, DispatchError>;
}

/// A message ready to leave the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Delivery channel label (e.g., "sms", "email", "in_app").
    pub channel: String,
    /// Audience segment label (e.g., "vip_customers").
    pub audience: String,
    /// Message body.
    pub body: String,
}

impl OutboundMessage {
    /// Creates an outbound message.
    pub fn new(
        channel: impl Into<String>,
        audience: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            audience: audience.into(),
            body: body.into(),
        }
    }
}

/// Proof of delivery from the dispatching adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Which adapter delivered the message (e.g., "mock").
    pub provider: String,
    /// Provider-assigned reference for the delivery.
    pub reference: String,
    /// Body as delivered.
    pub body: String,
}

impl DeliveryReceipt {
    /// Creates a delivery receipt.
    pub fn new(
        provider: impl Into<String>,
        reference: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            reference: reference.into(),
            body: body.into(),
        }
    }
}

/// Message dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The dispatcher refused the message.
    #[error("dispatch rejected: {reason}")]
    Rejected {
        /// Why the message was refused.
        reason: String,
    },

    /// The messaging provider is unreachable.
    #[error("messaging provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

impl DispatchError {
    /// Creates a rejection error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_message_carries_all_fields() {
        let message = OutboundMessage::new("sms", "vip_customers", "Flash sale today");
        assert_eq!(message.channel, "sms");
        assert_eq!(message.audience, "vip_customers");
        assert_eq!(message.body, "Flash sale today");
    }

    #[test]
    fn dispatch_error_displays_correctly() {
        let err = DispatchError::rejected("empty body");
        assert_eq!(err.to_string(), "dispatch rejected: empty body");

        let err = DispatchError::unavailable("connection refused");
        assert_eq!(
            err.to_string(),
            "messaging provider unavailable: connection refused"
        );
    }

    #[test]
    fn message_dispatcher_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn MessageDispatcher>();
    }
}
