//! Tool audit entity - persistent record of every tool execution.
//!
//! Every tool run, mock or live, successful or failed, is captured as a
//! `ToolAudit` so vendors can review what the agent did on their behalf.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuditId, ConversationId, Timestamp, VendorId};

use super::registry::ToolExecutionError;

/// Outcome of a recorded tool execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolRunStatus {
    Success,
    Error,
}

impl ToolRunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolRunStatus::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolRunStatus::Success => "success",
            ToolRunStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ToolRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized shape of a tool failure, safe to surface to callers.
///
/// The raw handler error stays out of persisted records and agent-visible
/// payloads; only the message, the error kind, and the HTTP-style status
/// survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolErrorDetail {
    pub message: String,
    pub name: String,
    pub status_code: u16,
}

impl ToolErrorDetail {
    pub fn new(message: impl Into<String>, name: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            name: name.into(),
            status_code,
        }
    }
}

impl From<&ToolExecutionError> for ToolErrorDetail {
    fn from(error: &ToolExecutionError) -> Self {
        Self {
            message: error.to_string(),
            name: error.kind().to_string(),
            status_code: error.status_code(),
        }
    }
}

/// A recorded tool execution for audit and review.
///
/// Audit records are immutable once created: a run either succeeded with a
/// result or failed with an error, and that outcome never changes after the
/// fact.
///
/// # Invariants
///
/// - `result` is present only when `status` is `Success`
/// - `error` is present only when `status` is `Error`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolAudit {
    /// Unique identifier for this record
    id: AuditId,

    /// The vendor on whose behalf the tool ran
    vendor_id: VendorId,

    /// The conversation the run belongs to
    conversation_id: ConversationId,

    /// Name of the tool that ran
    tool_name: String,

    /// Outcome of the execution
    status: ToolRunStatus,

    /// Arguments passed to the tool (JSON)
    args: serde_json::Value,

    /// Value returned by the tool (if successful)
    result: Option<serde_json::Value>,

    /// Failure details (if the run failed)
    error: Option<ToolErrorDetail>,

    /// When the tool ran
    executed_at: Timestamp,
}

impl ToolAudit {
    /// Records a successful tool execution.
    pub fn success(
        vendor_id: VendorId,
        conversation_id: ConversationId,
        tool_name: impl Into<String>,
        args: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        Self {
            id: AuditId::new(),
            vendor_id,
            conversation_id,
            tool_name: tool_name.into(),
            status: ToolRunStatus::Success,
            args,
            result: Some(result),
            error: None,
            executed_at: Timestamp::now(),
        }
    }

    /// Records a failed tool execution.
    pub fn failure(
        vendor_id: VendorId,
        conversation_id: ConversationId,
        tool_name: impl Into<String>,
        args: serde_json::Value,
        error: ToolErrorDetail,
    ) -> Self {
        Self {
            id: AuditId::new(),
            vendor_id,
            conversation_id,
            tool_name: tool_name.into(),
            status: ToolRunStatus::Error,
            args,
            result: None,
            error: Some(error),
            executed_at: Timestamp::now(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Getters
    // ═══════════════════════════════════════════════════════════════════════

    /// Returns the unique identifier.
    pub fn id(&self) -> AuditId {
        self.id
    }

    /// Returns the vendor the tool ran for.
    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }

    /// Returns the conversation the run belongs to.
    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Returns the name of the tool.
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the execution outcome.
    pub fn status(&self) -> ToolRunStatus {
        self.status
    }

    /// Returns the arguments passed to the tool.
    pub fn args(&self) -> &serde_json::Value {
        &self.args
    }

    /// Returns the result data (if any).
    pub fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    /// Returns the failure details (if any).
    pub fn error(&self) -> Option<&ToolErrorDetail> {
        self.error.as_ref()
    }

    /// Returns when the tool ran.
    pub fn executed_at(&self) -> Timestamp {
        self.executed_at
    }

    /// Returns true if the tool executed successfully.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Reconstitution (for loading from storage)
    // ═══════════════════════════════════════════════════════════════════════

    /// Reconstitutes a ToolAudit from stored data.
    ///
    /// This bypasses validation and should only be used by repositories.
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AuditId,
        vendor_id: VendorId,
        conversation_id: ConversationId,
        tool_name: String,
        status: ToolRunStatus,
        args: serde_json::Value,
        result: Option<serde_json::Value>,
        error: Option<ToolErrorDetail>,
        executed_at: Timestamp,
    ) -> Self {
        Self {
            id,
            vendor_id,
            conversation_id,
            tool_name,
            status,
            args,
            result,
            error,
            executed_at,
        }
    }
}
