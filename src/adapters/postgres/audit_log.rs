//! PostgreSQL implementation of AuditLog.
//!
//! Persists tool execution records to PostgreSQL. Audit records are
//! append-only; there is no update path.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE tool_audits (
//!     id              UUID PRIMARY KEY,
//!     vendor_id       UUID NOT NULL,
//!     conversation_id UUID NOT NULL,
//!     tool_name       TEXT NOT NULL,
//!     status          TEXT NOT NULL,
//!     args            JSONB NOT NULL,
//!     result          JSONB,
//!     error           JSONB,
//!     executed_at     TIMESTAMPTZ NOT NULL
//! );
//! CREATE INDEX tool_audits_vendor_executed_idx
//!     ON tool_audits (vendor_id, executed_at DESC);
//! ```

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AuditId, ConversationId, Timestamp, VendorId};
use crate::domain::tools::{ToolAudit, ToolErrorDetail, ToolRunStatus};
use crate::ports::{AuditLog, AuditLogError, Page, ToolActivityFilter, ToolActivityStats};

/// PostgreSQL implementation of AuditLog.
#[derive(Clone)]
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    /// Creates a new PostgresAuditLog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn record(&self, audit: &ToolAudit) -> Result<(), AuditLogError> {
        let error = audit
            .error()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AuditLogError::storage(format!("Failed to serialize error: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO tool_audits (
                id, vendor_id, conversation_id, tool_name, status,
                args, result, error, executed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(audit.id().as_uuid())
        .bind(audit.vendor_id().as_uuid())
        .bind(audit.conversation_id().as_uuid())
        .bind(audit.tool_name())
        .bind(audit.status().as_str())
        .bind(audit.args())
        .bind(audit.result())
        .bind(error)
        .bind(audit.executed_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| AuditLogError::storage(format!("Failed to insert audit record: {}", e)))?;

        Ok(())
    }

    async fn list_for_vendor(
        &self,
        vendor_id: &VendorId,
        filter: &ToolActivityFilter,
    ) -> Result<Page<ToolAudit>, AuditLogError> {
        let status = filter.status.map(|s| s.as_str());
        let conversation = filter.conversation_id.map(|id| *id.as_uuid());

        let total_row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM tool_audits
            WHERE vendor_id = $1
              AND ($2::text IS NULL OR tool_name = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::uuid IS NULL OR conversation_id = $4)
            "#,
        )
        .bind(vendor_id.as_uuid())
        .bind(filter.tool_name.as_deref())
        .bind(status)
        .bind(conversation)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuditLogError::storage(format!("Failed to count audit records: {}", e)))?;

        let total: i64 = total_row.get("total");

        let rows = sqlx::query(
            r#"
            SELECT id, vendor_id, conversation_id, tool_name, status,
                   args, result, error, executed_at
            FROM tool_audits
            WHERE vendor_id = $1
              AND ($2::text IS NULL OR tool_name = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::uuid IS NULL OR conversation_id = $4)
            ORDER BY executed_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(vendor_id.as_uuid())
        .bind(filter.tool_name.as_deref())
        .bind(status)
        .bind(conversation)
        .bind(i64::from(filter.limit))
        .bind(i64::from(filter.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditLogError::storage(format!("Failed to list audit records: {}", e)))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(row_to_audit(&row)?);
        }

        Ok(Page::new(items, total as u64))
    }

    async fn stats_for_vendor(
        &self,
        vendor_id: &VendorId,
    ) -> Result<ToolActivityStats, AuditLogError> {
        let rows = sqlx::query(
            r#"
            SELECT tool_name, status, COUNT(*) AS count
            FROM tool_audits
            WHERE vendor_id = $1
            GROUP BY tool_name, status
            "#,
        )
        .bind(vendor_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditLogError::storage(format!("Failed to aggregate audit stats: {}", e)))?;

        let mut stats = ToolActivityStats::default();
        for row in rows {
            let tool_name: String = row.get("tool_name");
            let status: String = row.get("status");
            let count: i64 = row.get("count");
            let count = count as u64;

            stats.total += count;
            match str_to_status(&status)? {
                ToolRunStatus::Success => stats.successes += count,
                ToolRunStatus::Error => stats.failures += count,
            }
            *stats.by_tool.entry(tool_name).or_insert(0) += count;
        }

        Ok(stats)
    }
}

// === Helper Functions ===

fn row_to_audit(row: &sqlx::postgres::PgRow) -> Result<ToolAudit, AuditLogError> {
    let id_uuid: uuid::Uuid = row.get("id");
    let vendor_uuid: uuid::Uuid = row.get("vendor_id");
    let conversation_uuid: uuid::Uuid = row.get("conversation_id");
    let tool_name: String = row.get("tool_name");
    let status: String = row.get("status");
    let args: serde_json::Value = row.get("args");
    let result: Option<serde_json::Value> = row.get("result");
    let error: Option<serde_json::Value> = row.get("error");
    let executed_at: chrono::DateTime<chrono::Utc> = row.get("executed_at");

    let error: Option<ToolErrorDetail> = error
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| AuditLogError::storage(format!("Failed to read error column: {}", e)))?;

    Ok(ToolAudit::reconstitute(
        AuditId::from_uuid(id_uuid),
        VendorId::from_uuid(vendor_uuid),
        ConversationId::from_uuid(conversation_uuid),
        tool_name,
        str_to_status(&status)?,
        args,
        result,
        error,
        Timestamp::from_datetime(executed_at),
    ))
}

fn str_to_status(s: &str) -> Result<ToolRunStatus, AuditLogError> {
    match s {
        "success" => Ok(ToolRunStatus::Success),
        "error" => Ok(ToolRunStatus::Error),
        _ => Err(AuditLogError::storage(format!(
            "Invalid tool run status: {}",
            s
        ))),
    }
}
