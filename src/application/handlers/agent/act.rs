//! Act command handler.
//!
//! Runs one full agent turn on a conversation: append the vendor's message,
//! execute the tools the turn calls for (simulated in mock mode, chosen by
//! the completion service in live mode), and append the agent's reply. The
//! response shape is identical in both modes so callers never branch on how
//! the reply was produced.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::agent::{
    candidate_tools, compose_reply, mock_call_id, synthesize_arguments, AgentMode,
};
use crate::domain::conversation::{Conversation, Message, MessageRole};
use crate::domain::foundation::{ConversationId, Metadata, VendorId};
use crate::domain::tools::{
    ToolAudit, ToolContext, ToolErrorDetail, ToolRegistry, ToolRunStatus,
};
use crate::ports::{
    AuditLog, CompletionError, CompletionProvider, CompletionRequest, ConversationStore,
    ConversationStoreError, ProviderMessage, ToolChoice,
};

/// Instructions framing the agent for the completion service.
const SYSTEM_PROMPT: &str = "You are an operations assistant for a commerce vendor's back \
    office. You help with pricing quotes, inventory checks, delivery estimates, and customer \
    messaging. Use the available tools when they answer the vendor's question, and keep \
    replies short and actionable.";

/// Command to run one agent turn.
#[derive(Debug, Clone)]
pub struct ActCommand {
    /// The conversation the turn belongs to.
    pub conversation_id: ConversationId,
    /// The vendor issuing the request.
    pub vendor_id: VendorId,
    /// The vendor's message text.
    pub input: String,
}

impl ActCommand {
    /// Creates a new act command.
    pub fn new(
        conversation_id: ConversationId,
        vendor_id: VendorId,
        input: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id,
            vendor_id,
            input: input.into(),
        }
    }
}

/// Errors that can occur while running an agent turn.
#[derive(Debug, Clone, Error)]
pub enum ActError {
    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conversation missing, or owned by a different vendor. The two cases
    /// are deliberately indistinguishable to the caller.
    #[error("Conversation not found")]
    NotFound,

    /// Live mode was selected but no completion provider is configured.
    #[error("Agent unavailable: {0}")]
    AgentUnavailable(String),

    /// The completion service failed.
    #[error("Completion error: {0}")]
    Completion(String),

    /// Conversation persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ActError {
    /// HTTP-style status class for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ActError::Validation(_) => 400,
            ActError::NotFound => 404,
            ActError::AgentUnavailable(_) => 503,
            ActError::Completion(_) | ActError::Storage(_) => 500,
        }
    }
}

impl From<CompletionError> for ActError {
    fn from(err: CompletionError) -> Self {
        ActError::Completion(err.to_string())
    }
}

impl From<ConversationStoreError> for ActError {
    fn from(err: ConversationStoreError) -> Self {
        ActError::Storage(err.to_string())
    }
}

/// One tool execution from this turn, as reported to the caller.
#[derive(Debug, Clone)]
pub struct ExecutedTool {
    /// Name of the tool that ran.
    pub name: String,
    /// Correlation id for this invocation.
    pub call_id: String,
    /// Outcome of the run.
    pub status: ToolRunStatus,
    /// Result value, when the run succeeded.
    pub result: Option<Value>,
    /// Failure detail, when the run failed.
    pub error: Option<ToolErrorDetail>,
}

/// Result of one agent turn.
#[derive(Debug, Clone)]
pub struct ActResult {
    /// The agent's reply text.
    pub reply: String,
    /// The conversation the turn ran in.
    pub conversation_id: ConversationId,
    /// Which mode produced the reply.
    pub mode: AgentMode,
    /// Tool executions from this turn, in execution order.
    pub tools: Vec<ExecutedTool>,
}

/// Handler for Act commands.
pub struct ActHandler<S, L>
where
    S: ConversationStore,
    L: AuditLog,
{
    store: Arc<S>,
    audit_log: Arc<L>,
    registry: Arc<ToolRegistry>,
    provider: Option<Arc<dyn CompletionProvider>>,
    mode: AgentMode,
}

impl<S, L> ActHandler<S, L>
where
    S: ConversationStore,
    L: AuditLog,
{
    /// Creates a new handler with the given dependencies.
    ///
    /// `provider` may be absent; mock turns never touch it, and a live turn
    /// without one fails with [`ActError::AgentUnavailable`].
    pub fn new(
        store: Arc<S>,
        audit_log: Arc<L>,
        registry: Arc<ToolRegistry>,
        provider: Option<Arc<dyn CompletionProvider>>,
        mode: AgentMode,
    ) -> Self {
        Self {
            store,
            audit_log,
            registry,
            provider,
            mode,
        }
    }

    /// Runs one agent turn.
    pub async fn handle(&self, cmd: ActCommand) -> Result<ActResult, ActError> {
        let input = cmd.input.trim();
        if input.is_empty() {
            return Err(ActError::Validation(
                "message input cannot be empty".to_string(),
            ));
        }

        let mut conversation = self
            .store
            .find_by_id(&cmd.conversation_id)
            .await?
            .filter(|conversation| conversation.vendor_id() == &cmd.vendor_id)
            .ok_or(ActError::NotFound)?;

        // Captured before the append so the reply's closing line reflects
        // whether this turn opened the thread.
        let had_prior_vendor_message = conversation.has_vendor_message();
        conversation.append_message(Message::vendor(input));

        let (reply, tools) = match self.mode {
            AgentMode::Mock => {
                self.run_mock_turn(&mut conversation, input, had_prior_vendor_message)
                    .await
            }
            AgentMode::Live => self.run_live_turn(&mut conversation).await?,
        };

        self.store.save(&conversation).await?;

        Ok(ActResult {
            reply,
            conversation_id: cmd.conversation_id,
            mode: self.mode,
            tools,
        })
    }

    /// Simulated turn: deterministic tool selection, heuristic arguments,
    /// composed reply. Never fails; tool errors become error-bearing entries.
    async fn run_mock_turn(
        &self,
        conversation: &mut Conversation,
        input: &str,
        had_prior_vendor_message: bool,
    ) -> (String, Vec<ExecutedTool>) {
        let vendor_id = *conversation.vendor_id();
        let conversation_id = *conversation.id();
        let mut tools: Vec<ExecutedTool> = Vec::new();

        for tool in candidate_tools(&self.registry, input) {
            let args = synthesize_arguments(tool.name(), input);
            let call_id = mock_call_id(tool.name());
            let context = ToolContext::new(args.clone(), vendor_id, conversation_id);

            match self.registry.execute(tool.name(), context).await {
                Ok(result) => {
                    let content = serde_json::to_string_pretty(&result)
                        .unwrap_or_else(|_| result.to_string());
                    let metadata = Metadata::new()
                        .with("args", args.clone())
                        .with("result", result.clone())
                        .with("status", json!(ToolRunStatus::Success.as_str()))
                        .with("mock", json!(true));
                    conversation.append_message(
                        Message::tool(tool.name(), call_id.as_str(), content)
                            .with_metadata(metadata),
                    );
                    self.record_audit(ToolAudit::success(
                        vendor_id,
                        conversation_id,
                        tool.name(),
                        args,
                        result.clone(),
                    ))
                    .await;
                    tools.push(ExecutedTool {
                        name: tool.name().to_string(),
                        call_id,
                        status: ToolRunStatus::Success,
                        result: Some(result),
                        error: None,
                    });
                }
                Err(err) => {
                    let detail = ToolErrorDetail::from(&err);
                    let metadata = Metadata::new()
                        .with("args", args.clone())
                        .with("error", error_value(&detail))
                        .with("status", json!(ToolRunStatus::Error.as_str()))
                        .with("mock", json!(true));
                    conversation.append_message(
                        Message::tool(tool.name(), call_id.as_str(), detail.message.clone())
                            .with_metadata(metadata),
                    );
                    self.record_audit(ToolAudit::failure(
                        vendor_id,
                        conversation_id,
                        tool.name(),
                        args,
                        detail.clone(),
                    ))
                    .await;
                    tools.push(ExecutedTool {
                        name: tool.name().to_string(),
                        call_id,
                        status: ToolRunStatus::Error,
                        result: None,
                        error: Some(detail),
                    });
                }
            }
        }

        let suggestions = self.registry.mock_suggestions(input);
        let reply = compose_reply(&suggestions, had_prior_vendor_message);

        let simulated: Vec<&str> = tools.iter().map(|tool| tool.name.as_str()).collect();
        let metadata = Metadata::new()
            .with("provider", json!("mock"))
            .with("simulatedTools", json!(simulated));
        conversation.append_message(Message::agent(reply.as_str()).with_metadata(metadata));

        (reply, tools)
    }

    /// Live turn: hand the history and tool descriptors to the completion
    /// service, run whatever it asked for, then let it synthesize the reply.
    async fn run_live_turn(
        &self,
        conversation: &mut Conversation,
    ) -> Result<(String, Vec<ExecutedTool>), ActError> {
        let provider = self.provider.clone().ok_or_else(|| {
            ActError::AgentUnavailable("no completion credential configured".to_string())
        })?;

        let vendor_id = *conversation.vendor_id();
        let conversation_id = *conversation.id();

        let request = CompletionRequest::new(SYSTEM_PROMPT)
            .with_messages(provider_history(conversation))
            .with_tools(self.registry.function_descriptors())
            .with_tool_choice(ToolChoice::Auto);
        let first = provider.complete(request).await?;

        let mut tools: Vec<ExecutedTool> = Vec::new();

        let response = if first.has_tool_calls() {
            for call in &first.tool_calls {
                // Malformed model-generated arguments degrade to an empty
                // object rather than aborting the turn.
                let args: Value =
                    serde_json::from_str(&call.arguments).unwrap_or_else(|_| json!({}));
                let context = ToolContext::new(args.clone(), vendor_id, conversation_id);

                match self.registry.execute(&call.name, context).await {
                    Ok(result) => {
                        info!(
                            vendor_id = %vendor_id,
                            conversation_id = %conversation_id,
                            tool = %call.name,
                            "tool call completed"
                        );
                        let metadata = Metadata::new()
                            .with("args", args.clone())
                            .with("result", result.clone());
                        conversation.append_message(
                            Message::tool(call.name.as_str(), call.id.as_str(), result.to_string())
                                .with_metadata(metadata),
                        );
                        self.record_audit(ToolAudit::success(
                            vendor_id,
                            conversation_id,
                            call.name.as_str(),
                            args,
                            result.clone(),
                        ))
                        .await;
                        tools.push(ExecutedTool {
                            name: call.name.clone(),
                            call_id: call.id.clone(),
                            status: ToolRunStatus::Success,
                            result: Some(result),
                            error: None,
                        });
                    }
                    Err(err) => {
                        warn!(
                            vendor_id = %vendor_id,
                            conversation_id = %conversation_id,
                            tool = %call.name,
                            error = %err,
                            "tool call failed"
                        );
                        let detail = ToolErrorDetail::from(&err);
                        // The normalized error doubles as the visible result
                        // payload so the model can react to it.
                        let payload = error_value(&detail);
                        let metadata = Metadata::new()
                            .with("args", args.clone())
                            .with("error", payload.clone());
                        conversation.append_message(
                            Message::tool(call.name.as_str(), call.id.as_str(), payload.to_string())
                                .with_metadata(metadata),
                        );
                        self.record_audit(ToolAudit::failure(
                            vendor_id,
                            conversation_id,
                            call.name.as_str(),
                            args,
                            detail.clone(),
                        ))
                        .await;
                        tools.push(ExecutedTool {
                            name: call.name.clone(),
                            call_id: call.id.clone(),
                            status: ToolRunStatus::Error,
                            result: None,
                            error: Some(detail),
                        });
                    }
                }
            }

            // Second round trip with no tool descriptors forces a
            // natural-language synthesis of the tool output.
            let follow_up =
                CompletionRequest::new(SYSTEM_PROMPT).with_messages(provider_history(conversation));
            provider.complete(follow_up).await?
        } else {
            first
        };

        let reply = response.content.clone().unwrap_or_default();
        let usage = json!({
            "promptTokens": response.usage.prompt_tokens,
            "completionTokens": response.usage.completion_tokens,
            "totalTokens": response.usage.total_tokens,
        });
        let metadata = Metadata::new()
            .with("provider", json!("live"))
            .with("model", json!(response.model))
            .with("usage", usage);
        conversation.append_message(Message::agent(reply.as_str()).with_metadata(metadata));

        Ok((reply, tools))
    }

    /// Best-effort audit write. An audit outage never blocks the reply.
    async fn record_audit(&self, audit: ToolAudit) {
        if let Err(err) = self.audit_log.record(&audit).await {
            warn!(
                tool = audit.tool_name(),
                error = %err,
                "failed to record tool audit; continuing"
            );
        }
    }
}

/// Maps the stored transcript into the provider's role vocabulary.
///
/// Total over the closed role enum: every variant has an explicit arm.
fn provider_history(conversation: &Conversation) -> Vec<ProviderMessage> {
    conversation
        .messages()
        .iter()
        .map(|message| match message.role() {
            MessageRole::Agent => ProviderMessage::assistant(message.content()),
            MessageRole::Vendor => ProviderMessage::user(message.content()),
            MessageRole::Tool => ProviderMessage::tool(
                message.content(),
                message.tool_call_id().unwrap_or_default(),
            ),
            MessageRole::Customer => ProviderMessage::system(message.content()),
        })
        .collect()
}

fn error_value(detail: &ToolErrorDetail) -> Value {
    serde_json::to_value(detail).unwrap_or_else(|_| json!({ "message": detail.message }))
}
