//! Tool registry - ordered catalog of the agent's capabilities.
//!
//! The registry holds every tool the agent can invoke and is the single
//! execution chokepoint: lookups, handler dispatch, and error wrapping
//! all happen here so that callers see exactly one error shape.
//!
//! Registration happens once at startup; the registry is never mutated
//! per-request.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::definition::{
    FunctionDescriptor, HandlerError, MockRule, Tool, ToolContext, ToolDefinition,
};

/// Errors raised while building a registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid tool definition: {reason}")]
    InvalidToolDefinition { reason: String },
}

/// Errors raised by `execute`.
///
/// Every handler failure is re-wrapped; callers never see a raw
/// handler error.
#[derive(Debug, Error)]
pub enum ToolExecutionError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("{message}")]
    HandlerFailure {
        tool: String,
        message: String,
        status_code: u16,
        #[source]
        cause: HandlerError,
    },
}

impl ToolExecutionError {
    /// Returns the HTTP status class of the failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ToolExecutionError::UnknownTool { .. } => 404,
            ToolExecutionError::HandlerFailure { status_code, .. } => *status_code,
        }
    }

    /// Returns the stable kind label used in audit error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolExecutionError::UnknownTool { .. } => "UnknownTool",
            ToolExecutionError::HandlerFailure { .. } => "HandlerFailure",
        }
    }
}

/// Ordered catalog of registered tools.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    /// Tools in registration order.
    tools: Vec<Arc<Tool>>,

    /// Name -> position in `tools`.
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    ///
    /// A missing parameter schema is normalized to the empty-object
    /// schema. Re-registering a name replaces the prior tool in place,
    /// keeping its registration position (last write wins).
    ///
    /// # Errors
    ///
    /// - `InvalidToolDefinition` if the name is blank
    pub fn register(&mut self, tool: Tool) -> Result<(), RegistryError> {
        if tool.name().trim().is_empty() {
            return Err(RegistryError::InvalidToolDefinition {
                reason: "name is required".to_string(),
            });
        }

        let name = tool.name().to_string();
        let tool = Arc::new(tool.with_normalized_schema());

        match self.index.get(&name) {
            Some(&position) => {
                self.tools[position] = tool;
            }
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
        Ok(())
    }

    /// Returns all tools in registration order.
    pub fn list(&self) -> &[Arc<Tool>] {
        &self.tools
    }

    /// Returns a tool by name. Never fails.
    pub fn get(&self, name: &str) -> Option<&Arc<Tool>> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Executes a tool by name.
    ///
    /// # Errors
    ///
    /// - `UnknownTool` (404) if the name is not registered
    /// - `HandlerFailure` wrapping any handler error, with the
    ///   handler-declared status (default 500) and the tool's
    ///   caller-visible message override (default generic text). The
    ///   original handler error travels as `cause` for logs and audit.
    pub async fn execute(
        &self,
        name: &str,
        ctx: ToolContext,
    ) -> Result<Value, ToolExecutionError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolExecutionError::UnknownTool {
                name: name.to_string(),
            })?;

        match tool.handler().run(ctx).await {
            Ok(result) => Ok(result),
            Err(cause) => {
                let status_code = cause.status_code.unwrap_or(500);
                let message = tool
                    .error_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Tool '{}' execution failed", name));
                Err(ToolExecutionError::HandlerFailure {
                    tool: name.to_string(),
                    message,
                    status_code,
                    cause,
                })
            }
        }
    }

    /// Projects every tool into the completion-service descriptor shape.
    pub fn function_descriptors(&self) -> Vec<FunctionDescriptor> {
        self.tools
            .iter()
            .map(|tool| tool.definition().descriptor())
            .collect()
    }

    /// Returns the tools whose mock rules match the input, in
    /// registration order.
    ///
    /// A failing predicate is logged at warn level and treated as "no
    /// match"; it never propagates.
    pub fn matching_tools(&self, input: &str) -> Vec<&Arc<Tool>> {
        let lowered = input.to_lowercase();
        self.tools
            .iter()
            .filter(|tool| match tool.mock_rule() {
                Some(rule) => match rule.matches(&lowered) {
                    Ok(hit) => hit,
                    Err(reason) => {
                        warn!(
                            tool = tool.name(),
                            error = %reason,
                            "suggestion predicate failed; treating as no match"
                        );
                        false
                    }
                },
                None => false,
            })
            .collect()
    }

    /// Produces one human-readable suggestion per matching tool, in
    /// registration order. Never errors.
    pub fn mock_suggestions(&self, input: &str) -> Vec<String> {
        self.matching_tools(input)
            .into_iter()
            .map(|tool| {
                tool.mock_rule()
                    .and_then(|rule| rule.suggestion_for(input))
                    .unwrap_or_else(|| generic_suggestion(tool.definition()))
            })
            .collect()
    }
}

fn generic_suggestion(definition: &ToolDefinition) -> String {
    format!(
        "I can run the {} tool to help with this.",
        definition.display_name()
    )
}
