//! In-Memory Audit Log Adapter
//!
//! Keeps tool execution records in memory. Useful for testing and
//! development.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::VendorId;
use crate::domain::tools::ToolAudit;
use crate::ports::{AuditLog, AuditLogError, Page, ToolActivityFilter, ToolActivityStats};

/// In-memory audit log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    records: Arc<RwLock<Vec<ToolAudit>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryAuditLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (useful for tests).
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// All stored records in insertion order (useful for tests).
    pub async fn all(&self) -> Vec<ToolAudit> {
        self.records.read().await.clone()
    }

    /// Make subsequent writes fail, to exercise callers' swallow paths
    /// (useful for tests).
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, audit: &ToolAudit) -> Result<(), AuditLogError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuditLogError::storage("injected audit write failure"));
        }
        let mut records = self.records.write().await;
        records.push(audit.clone());
        Ok(())
    }

    async fn list_for_vendor(
        &self,
        vendor_id: &VendorId,
        filter: &ToolActivityFilter,
    ) -> Result<Page<ToolAudit>, AuditLogError> {
        let records = self.records.read().await;

        let mut matching: Vec<&ToolAudit> = records
            .iter()
            .filter(|audit| audit.vendor_id() == *vendor_id)
            .filter(|audit| {
                filter
                    .tool_name
                    .as_ref()
                    .map_or(true, |name| audit.tool_name() == name)
            })
            .filter(|audit| filter.status.map_or(true, |status| audit.status() == status))
            .filter(|audit| {
                filter
                    .conversation_id
                    .map_or(true, |id| audit.conversation_id() == id)
            })
            .collect();

        // Newest executions first.
        matching.sort_by_key(|audit| std::cmp::Reverse(audit.executed_at()));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, total))
    }

    async fn stats_for_vendor(
        &self,
        vendor_id: &VendorId,
    ) -> Result<ToolActivityStats, AuditLogError> {
        let records = self.records.read().await;

        let mut stats = ToolActivityStats::default();
        for audit in records.iter().filter(|audit| audit.vendor_id() == *vendor_id) {
            stats.record(audit);
        }
        Ok(stats)
    }
}
