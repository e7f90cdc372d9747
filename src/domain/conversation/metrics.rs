//! Per-conversation message counters.

use serde::{Deserialize, Serialize};

use super::message::MessageRole;

/// Message counters maintained incrementally as messages append.
///
/// # Invariants
///
/// - `total` counts every message, tool markers included
/// - `agent + vendor + customer` counts every non-tool message
///
/// There is deliberately no per-tool-message counter; tool markers
/// contribute to `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetrics {
    pub total: u64,
    pub agent: u64,
    pub vendor: u64,
    pub customer: u64,
}

impl MessageMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one message of the given role.
    pub fn record(&mut self, role: MessageRole) {
        self.total += 1;
        match role {
            MessageRole::Agent => self.agent += 1,
            MessageRole::Vendor => self.vendor += 1,
            MessageRole::Customer => self.customer += 1,
            MessageRole::Tool => {}
        }
    }

    /// Sum of the per-role counters (excludes tool markers).
    pub fn attributed(&self) -> u64 {
        self.agent + self.vendor + self.customer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_metrics_are_zeroed() {
        let metrics = MessageMetrics::new();
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.attributed(), 0);
    }

    #[test]
    fn record_increments_matching_counter() {
        let mut metrics = MessageMetrics::new();
        metrics.record(MessageRole::Vendor);
        metrics.record(MessageRole::Agent);
        metrics.record(MessageRole::Agent);

        assert_eq!(metrics.total, 3);
        assert_eq!(metrics.vendor, 1);
        assert_eq!(metrics.agent, 2);
        assert_eq!(metrics.customer, 0);
    }

    #[test]
    fn tool_messages_count_toward_total_only() {
        let mut metrics = MessageMetrics::new();
        metrics.record(MessageRole::Vendor);
        metrics.record(MessageRole::Tool);
        metrics.record(MessageRole::Tool);
        metrics.record(MessageRole::Agent);

        assert_eq!(metrics.total, 4);
        assert_eq!(metrics.attributed(), 2);
        assert_eq!(metrics.vendor, 1);
        assert_eq!(metrics.agent, 1);
    }

    fn role_strategy() -> impl Strategy<Value = MessageRole> {
        prop_oneof![
            Just(MessageRole::Vendor),
            Just(MessageRole::Customer),
            Just(MessageRole::Agent),
            Just(MessageRole::Tool),
        ]
    }

    proptest! {
        #[test]
        fn counters_always_partition_the_message_stream(
            roles in prop::collection::vec(role_strategy(), 0..200)
        ) {
            let mut metrics = MessageMetrics::new();
            for role in &roles {
                metrics.record(*role);
            }

            let tool_count = roles
                .iter()
                .filter(|r| matches!(r, MessageRole::Tool))
                .count() as u64;

            prop_assert_eq!(metrics.total, roles.len() as u64);
            prop_assert_eq!(metrics.attributed() + tool_count, metrics.total);
        }
    }
}
