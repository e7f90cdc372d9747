//! ListToolActivity query handler.
//!
//! Pages through a vendor's tool audit trail, newest first, and decorates
//! the page with aggregate counts over the vendor's full history so the
//! dashboard can show totals next to any filtered slice.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::VendorId;
use crate::domain::tools::ToolAudit;
use crate::ports::{AuditLog, AuditLogError, Page, ToolActivityFilter, ToolActivityStats};

/// Query for a vendor's tool activity.
#[derive(Debug, Clone)]
pub struct ListToolActivityQuery {
    /// The vendor whose activity to list.
    pub vendor_id: VendorId,
    /// Filter and pagination.
    pub filter: ToolActivityFilter,
}

impl ListToolActivityQuery {
    /// Creates a query with the default filter (first page, no criteria).
    pub fn new(vendor_id: VendorId) -> Self {
        Self {
            vendor_id,
            filter: ToolActivityFilter::default(),
        }
    }

    /// Replaces the filter.
    pub fn with_filter(mut self, filter: ToolActivityFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Errors that can occur when listing tool activity.
#[derive(Debug, Clone, Error)]
pub enum ListToolActivityError {
    /// The audit log query failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<AuditLogError> for ListToolActivityError {
    fn from(err: AuditLogError) -> Self {
        ListToolActivityError::Storage(err.to_string())
    }
}

/// A page of audit records plus whole-history aggregates.
#[derive(Debug, Clone)]
pub struct ToolActivityReport {
    /// The requested page, newest first.
    pub page: Page<ToolAudit>,
    /// Counts over the vendor's full audit history, unaffected by the
    /// filter or pagination.
    pub stats: ToolActivityStats,
}

/// Handler for ListToolActivity queries.
pub struct ListToolActivityHandler<L>
where
    L: AuditLog,
{
    audit_log: Arc<L>,
}

impl<L> ListToolActivityHandler<L>
where
    L: AuditLog,
{
    /// Creates a new handler.
    pub fn new(audit_log: Arc<L>) -> Self {
        Self { audit_log }
    }

    /// Lists the vendor's tool activity with aggregate counts.
    pub async fn handle(
        &self,
        query: ListToolActivityQuery,
    ) -> Result<ToolActivityReport, ListToolActivityError> {
        let page = self
            .audit_log
            .list_for_vendor(&query.vendor_id, &query.filter)
            .await?;
        let stats = self.audit_log.stats_for_vendor(&query.vendor_id).await?;
        Ok(ToolActivityReport { page, stats })
    }
}
