//! Mock message dispatcher.
//!
//! Records every outbound message instead of delivering it, and issues a
//! synthetic receipt. Used in mock agent mode and in tests so the
//! send_message tool behaves end to end without a messaging provider.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::ports::{DeliveryReceipt, DispatchError, MessageDispatcher, OutboundMessage};

/// Dispatcher that accepts everything and keeps a record of it.
#[derive(Debug, Clone, Default)]
pub struct MockMessageDispatcher {
    sent: Arc<RwLock<Vec<OutboundMessage>>>,
}

impl MockMessageDispatcher {
    /// Creates an empty mock dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every message dispatched so far, in order.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.read().await.clone()
    }

    /// Returns the number of dispatched messages.
    pub async fn count(&self) -> usize {
        self.sent.read().await.len()
    }
}

#[async_trait]
impl MessageDispatcher for MockMessageDispatcher {
    async fn dispatch(&self, message: OutboundMessage) -> Result<DeliveryReceipt, DispatchError> {
        info!(
            channel = %message.channel,
            audience = %message.audience,
            "mock dispatch of outbound message"
        );

        let receipt = DeliveryReceipt::new(
            "mock",
            format!("mock-{}", Uuid::new_v4().simple()),
            message.body.clone(),
        );

        let mut sent = self.sent.write().await;
        sent.push(message);

        Ok(receipt)
    }
}
