//! Completion Provider Port - Interface for LLM completion services.
//!
//! This port abstracts the completion service (OpenAI, etc.) behind a
//! tool-calling-aware contract. The agent builds a request from conversation
//! history and registered tool descriptors; the provider answers with text,
//! tool-call requests, or both.
//!
//! # Design
//!
//! - Provider-agnostic message format with a total role mapping
//! - Tool descriptors travel with the request; `ToolChoice` gates whether
//!   the model may call them
//! - Tool-call arguments stay as raw JSON text; parsing is the caller's
//!   problem so one malformed call never poisons the response
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct CannedProvider;
//!
//! #[async_trait]
//! impl CompletionProvider for CannedProvider {
//!     async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, CompletionError> {
//!         Ok(CompletionResponse::text("Hello!", "canned-model"))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("canned", "canned-model")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::tools::FunctionDescriptor;

/// Port for LLM completion services.
///
/// Implementations connect to an external completion API and translate
/// between the provider-specific wire format and these types.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generates a single completion.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;

    /// Returns provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for a completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt that frames the agent's role.
    pub system_prompt: String,
    /// Conversation history mapped to provider roles.
    pub messages: Vec<ProviderMessage>,
    /// Tool descriptors the model may call.
    pub tools: Vec<FunctionDescriptor>,
    /// Whether the model is allowed to call tools on this request.
    pub tool_choice: ToolChoice,
}

impl CompletionRequest {
    /// Creates a request with no history and tool calling disabled.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            tools: Vec::new(),
            tool_choice: ToolChoice::None,
        }
    }

    /// Appends one message to the history.
    pub fn with_message(mut self, message: ProviderMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Replaces the history wholesale.
    pub fn with_messages(mut self, messages: Vec<ProviderMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Attaches tool descriptors.
    pub fn with_tools(mut self, tools: Vec<FunctionDescriptor>) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the tool choice policy.
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }
}

/// Whether the model may call tools on a given request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// The model decides whether to call tools.
    Auto,
    /// Tool calling disabled; the model must answer in text.
    #[default]
    None,
}

/// A message in provider format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// Who sent this message.
    pub role: ProviderRole,
    /// Message content.
    pub content: String,
    /// Call id this message answers (tool role only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ProviderMessage {
    /// Creates a message with no tool-call linkage.
    pub fn new(role: ProviderRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ProviderRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ProviderRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ProviderRole::Assistant, content)
    }

    /// Creates a tool-result message answering the given call id.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            role: ProviderRole::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// Role of the message sender, in provider vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
    /// Tool execution result.
    Tool,
}

/// A tool call the model asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back on the tool message.
    pub id: String,
    /// Name of the tool to call.
    pub name: String,
    /// Raw JSON arguments exactly as the model produced them.
    pub arguments: String,
}

impl ToolCallRequest {
    /// Creates a tool call request.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text, when the model answered in prose.
    pub content: Option<String>,
    /// Tool calls the model asked for, in order.
    pub tool_calls: Vec<ToolCallRequest>,
    /// Model that generated the response.
    pub model: String,
    /// Token usage for the request.
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Creates a plain text response.
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            model: model.into(),
            usage: TokenUsage::zero(),
        }
    }

    /// Returns true when the model asked for at least one tool call.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Creates zero usage.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai", "mock").
    pub name: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Completion provider errors.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// No credential is configured for the provider.
    #[error("no completion credential configured")]
    MissingCredential,

    /// Rate limited by the provider.
    #[error("rate limited by completion service")]
    RateLimited,

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider is unavailable.
    #[error("completion service unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl CompletionError {
    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::RateLimited
                | CompletionError::Unavailable { .. }
                | CompletionError::Network(_)
                | CompletionError::Timeout { .. }
        )
    }
}
