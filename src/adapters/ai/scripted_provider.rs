//! Scripted completion provider for testing.
//!
//! Provides a configurable implementation of the CompletionProvider port,
//! allowing agent flows to run without calling a real completion API.
//!
//! # Features
//!
//! - Pre-scripted responses consumed in order
//! - Tool-call responses for exercising the tool loop
//! - Error injection for resilience testing
//! - Request tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = ScriptedProvider::new()
//!     .with_text("Hello, I'm the agent!");
//!
//! let response = provider.complete(request).await?;
//! assert_eq!(response.text(), "Hello, I'm the agent!");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionResponse, ProviderInfo,
    TokenUsage, ToolCallRequest,
};

/// Scripted completion provider for testing.
///
/// Configurable to return specific text, tool calls, or errors.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    /// Pre-scripted responses (consumed in order).
    responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Request history for verification.
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A scripted response.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Answer in prose.
    Text { content: String, usage: TokenUsage },
    /// Ask for tool calls.
    ToolCalls {
        calls: Vec<ToolCallRequest>,
        usage: TokenUsage,
    },
    /// Fail with an error.
    Error(ScriptedError),
}

/// Scripted error types for testing error handling.
#[derive(Debug, Clone)]
pub enum ScriptedError {
    /// Simulate rate limiting.
    RateLimited,
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<ScriptedError> for CompletionError {
    fn from(err: ScriptedError) -> Self {
        match err {
            ScriptedError::RateLimited => CompletionError::RateLimited,
            ScriptedError::AuthenticationFailed => CompletionError::AuthenticationFailed,
            ScriptedError::Unavailable { message } => CompletionError::unavailable(message),
            ScriptedError::Network { message } => CompletionError::network(message),
            ScriptedError::Timeout { timeout_secs } => CompletionError::Timeout { timeout_secs },
        }
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    /// Creates a new scripted provider with an empty script.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("scripted", "scripted-model"),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a prose response to the script.
    pub fn with_text(self, content: impl Into<String>) -> Self {
        let mut responses = self.responses.lock().unwrap();
        responses.push_back(ScriptedResponse::Text {
            content: content.into(),
            usage: TokenUsage::new(10, 20),
        });
        drop(responses);
        self
    }

    /// Adds a tool-call response to the script.
    pub fn with_tool_calls(self, calls: Vec<ToolCallRequest>) -> Self {
        let mut responses = self.responses.lock().unwrap();
        responses.push_back(ScriptedResponse::ToolCalls {
            calls,
            usage: TokenUsage::new(15, 5),
        });
        drop(responses);
        self
    }

    /// Adds an error to the script.
    pub fn with_error(self, error: ScriptedError) -> Self {
        let mut responses = self.responses.lock().unwrap();
        responses.push_back(ScriptedResponse::Error(error));
        drop(responses);
        self
    }

    /// Returns the number of completion requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Gets the next scripted response or a default.
    fn next_response(&self) -> ScriptedResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ScriptedResponse::Text {
                content: "Scripted reply.".to_string(),
                usage: TokenUsage::new(5, 10),
            })
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests.lock().unwrap().push(request);

        match self.next_response() {
            ScriptedResponse::Text { content, usage } => Ok(CompletionResponse {
                content: Some(content),
                tool_calls: Vec::new(),
                model: self.info.model.clone(),
                usage,
            }),
            ScriptedResponse::ToolCalls { calls, usage } => Ok(CompletionResponse {
                content: None,
                tool_calls: calls,
                model: self.info.model.clone(),
                usage,
            }),
            ScriptedResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ProviderMessage, ToolChoice};

    fn test_request() -> CompletionRequest {
        CompletionRequest::new("You are a commerce agent").with_message(ProviderMessage::user(
            "What would shipping cost to Berlin?",
        ))
    }

    #[tokio::test]
    async fn returns_scripted_text() {
        let provider = ScriptedProvider::new().with_text("Hello from the script!");

        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.content.as_deref(), Some("Hello from the script!"));
        assert_eq!(response.model, "scripted-model");
        assert!(!response.has_tool_calls());
    }

    #[tokio::test]
    async fn returns_responses_in_order() {
        let provider = ScriptedProvider::new()
            .with_text("First")
            .with_text("Second");

        let r1 = provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r1.content.as_deref(), Some("First"));
        assert_eq!(r2.content.as_deref(), Some("Second"));
    }

    #[tokio::test]
    async fn returns_default_after_script_exhausted() {
        let provider = ScriptedProvider::new().with_text("Only one");

        let r1 = provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r1.content.as_deref(), Some("Only one"));
        assert_eq!(r2.content.as_deref(), Some("Scripted reply."));
    }

    #[tokio::test]
    async fn returns_scripted_tool_calls() {
        let provider = ScriptedProvider::new().with_tool_calls(vec![ToolCallRequest::new(
            "call-1",
            "estimate_delivery",
            "{\"destinationZone\":\"international\"}",
        )]);

        let response = provider.complete(test_request()).await.unwrap();

        assert!(response.has_tool_calls());
        assert_eq!(response.content, None);
        assert_eq!(response.tool_calls[0].id, "call-1");
        assert_eq!(response.tool_calls[0].name, "estimate_delivery");
    }

    #[tokio::test]
    async fn returns_scripted_error() {
        let provider = ScriptedProvider::new().with_error(ScriptedError::RateLimited);

        let result = provider.complete(test_request()).await;

        let err = result.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, CompletionError::RateLimited));
    }

    #[tokio::test]
    async fn tracks_requests() {
        let provider = ScriptedProvider::new().with_text("Hi");

        assert_eq!(provider.request_count(), 0);

        let request = test_request().with_tool_choice(ToolChoice::Auto);
        provider.complete(request).await.unwrap();

        assert_eq!(provider.request_count(), 1);
        let recorded = provider.requests();
        assert_eq!(recorded[0].tool_choice, ToolChoice::Auto);
        assert_eq!(recorded[0].messages.len(), 1);
    }

    #[test]
    fn scripted_error_converts_to_completion_error() {
        let err: CompletionError = ScriptedError::AuthenticationFailed.into();
        assert!(matches!(err, CompletionError::AuthenticationFailed));

        let err: CompletionError = ScriptedError::Timeout { timeout_secs: 30 }.into();
        assert!(matches!(err, CompletionError::Timeout { timeout_secs: 30 }));

        let err: CompletionError = ScriptedError::Network {
            message: "reset".to_string(),
        }
        .into();
        assert!(matches!(err, CompletionError::Network(_)));
    }
}
