//! Audit Log Port - Persistence interface for tool execution records.
//!
//! Every tool run lands here, success or failure. The orchestrator treats
//! this log as best-effort: a write failure is logged and swallowed so an
//! audit outage never blocks a reply.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{ConversationId, VendorId};
use crate::domain::tools::{ToolAudit, ToolRunStatus};

use super::conversation_store::Page;

/// Port for the tool execution audit trail.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends one audit record.
    async fn record(&self, audit: &ToolAudit) -> Result<(), AuditLogError>;

    /// Lists a vendor's tool activity, newest first.
    async fn list_for_vendor(
        &self,
        vendor_id: &VendorId,
        filter: &ToolActivityFilter,
    ) -> Result<Page<ToolAudit>, AuditLogError>;

    /// Aggregates a vendor's tool activity counts.
    async fn stats_for_vendor(&self, vendor_id: &VendorId)
        -> Result<ToolActivityStats, AuditLogError>;
}

/// Filter and pagination for tool activity listings.
#[derive(Debug, Clone)]
pub struct ToolActivityFilter {
    /// Only runs of this tool.
    pub tool_name: Option<String>,
    /// Only runs with this outcome.
    pub status: Option<ToolRunStatus>,
    /// Only runs inside this conversation.
    pub conversation_id: Option<ConversationId>,
    /// Page size.
    pub limit: u32,
    /// Offset into the filtered set.
    pub offset: u32,
}

impl Default for ToolActivityFilter {
    fn default() -> Self {
        Self {
            tool_name: None,
            status: None,
            conversation_id: None,
            limit: 20,
            offset: 0,
        }
    }
}

impl ToolActivityFilter {
    /// Restricts to one tool.
    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    /// Restricts to one outcome.
    pub fn with_status(mut self, status: ToolRunStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one conversation.
    pub fn with_conversation(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    /// Sets pagination.
    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

/// Aggregated tool activity counts for a vendor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolActivityStats {
    /// Total recorded runs.
    pub total: u64,
    /// Runs that succeeded.
    pub successes: u64,
    /// Runs that failed.
    pub failures: u64,
    /// Run counts per tool name.
    pub by_tool: HashMap<String, u64>,
}

impl ToolActivityStats {
    /// Folds one audit record into the counts.
    pub fn record(&mut self, audit: &ToolAudit) {
        self.total += 1;
        if audit.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        *self.by_tool.entry(audit.tool_name().to_string()).or_insert(0) += 1;
    }

    /// Fraction of runs that succeeded, 0.0 when nothing ran yet.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successes as f64 / self.total as f64
        }
    }
}

/// Audit log errors.
#[derive(Debug, thiserror::Error)]
pub enum AuditLogError {
    /// Underlying storage failed.
    #[error("storage error: {message}")]
    Storage {
        /// Error details.
        message: String,
    },
}

impl AuditLogError {
    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::ToolErrorDetail;

    fn success_audit(tool_name: &str) -> ToolAudit {
        ToolAudit::success(
            VendorId::new(),
            ConversationId::new(),
            tool_name,
            serde_json::json!({}),
            serde_json::json!({"ok": true}),
        )
    }

    #[test]
    fn filter_defaults_to_first_page_of_twenty() {
        let filter = ToolActivityFilter::default();
        assert_eq!(filter.limit, 20);
        assert_eq!(filter.offset, 0);
        assert!(filter.tool_name.is_none());
        assert!(filter.status.is_none());
    }

    #[test]
    fn stats_fold_in_successes_and_failures() {
        let mut stats = ToolActivityStats::default();
        stats.record(&success_audit("calculate_pricing"));
        stats.record(&success_audit("calculate_pricing"));
        stats.record(&ToolAudit::failure(
            VendorId::new(),
            ConversationId::new(),
            "lookup_inventory",
            serde_json::json!({}),
            ToolErrorDetail::new("boom", "HandlerFailure", 500),
        ));

        assert_eq!(stats.total, 3);
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.by_tool["calculate_pricing"], 2);
        assert_eq!(stats.by_tool["lookup_inventory"], 1);
    }

    #[test]
    fn success_rate_handles_empty_stats() {
        let stats = ToolActivityStats::default();
        assert_eq!(stats.success_rate(), 0.0);

        let mut stats = ToolActivityStats::default();
        stats.record(&success_audit("calculate_pricing"));
        assert_eq!(stats.success_rate(), 1.0);
    }

    #[test]
    fn audit_log_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn AuditLog>();
    }
}
