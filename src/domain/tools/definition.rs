//! Tool definitions, mock-suggestion rules, and the handler contract.
//!
//! A tool couples a declarative definition (name, description, parameter
//! schema) with an executable handler and an optional mock rule that lets
//! the tool volunteer itself when the agent runs in simulation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::{ConversationId, VendorId};

/// Default parameter schema applied when a tool declares none.
pub fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// Declarative part of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "calculate_pricing")
    name: String,

    /// Human-readable description for the completion service and docs
    description: String,

    /// JSON Schema for the parameters, when declared
    parameters: Option<Value>,
}

impl ToolDefinition {
    /// Creates a definition with no parameter schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: None,
        }
    }

    /// Attaches a parameter schema.
    pub fn with_parameters(mut self, schema: Value) -> Self {
        self.parameters = Some(schema);
        self
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the declared parameter schema, if any.
    pub fn parameters(&self) -> Option<&Value> {
        self.parameters.as_ref()
    }

    /// Returns the declared schema, or the empty-object default.
    pub fn normalized_parameters(&self) -> Value {
        self.parameters
            .clone()
            .unwrap_or_else(empty_object_schema)
    }

    /// Human-facing name used in suggestion text ("lookup_inventory"
    /// reads as "lookup inventory").
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }

    /// Projects the definition for the completion service.
    pub fn descriptor(&self) -> FunctionDescriptor {
        FunctionDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.normalized_parameters(),
        }
    }
}

/// Completion-service-facing projection of a tool definition.
///
/// The parameters here are always a concrete schema; the empty-object
/// default has already been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl FunctionDescriptor {
    /// Converts to OpenAI tool format.
    ///
    /// OpenAI expects a specific structure for function calling.
    pub fn to_openai_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

/// Fallible predicate over the lower-cased vendor input.
pub type SuggestPredicate = Arc<dyn Fn(&str) -> Result<bool, String> + Send + Sync>;

/// Custom suggestion text builder, given the original input.
pub type SuggestionBuilder = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How a tool decides whether to volunteer itself in mock mode.
#[derive(Clone)]
pub enum MockRule {
    /// Case-insensitive keyword containment test.
    Keywords(Vec<String>),
    /// Arbitrary predicate, with an optional custom suggestion text.
    Predicate {
        should_suggest: SuggestPredicate,
        build_suggestion: Option<SuggestionBuilder>,
    },
}

impl MockRule {
    /// Builds a keyword rule from string literals.
    pub fn keywords(words: &[&str]) -> Self {
        MockRule::Keywords(words.iter().map(|w| w.to_lowercase()).collect())
    }

    /// Evaluates the rule against the lower-cased input.
    ///
    /// # Errors
    ///
    /// Returns the predicate's failure message. Callers log it and treat
    /// the rule as not matched; a broken predicate must never take down
    /// suggestion generation.
    pub fn matches(&self, lowered_input: &str) -> Result<bool, String> {
        match self {
            MockRule::Keywords(words) => {
                Ok(words.iter().any(|w| lowered_input.contains(w.as_str())))
            }
            MockRule::Predicate { should_suggest, .. } => should_suggest(lowered_input),
        }
    }

    /// Returns the custom suggestion text, when the rule carries a builder.
    pub fn suggestion_for(&self, input: &str) -> Option<String> {
        match self {
            MockRule::Keywords(_) => None,
            MockRule::Predicate {
                build_suggestion, ..
            } => build_suggestion.as_ref().map(|build| build(input)),
        }
    }
}

impl fmt::Debug for MockRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockRule::Keywords(words) => f.debug_tuple("Keywords").field(words).finish(),
            MockRule::Predicate {
                build_suggestion, ..
            } => f
                .debug_struct("Predicate")
                .field("custom_suggestion", &build_suggestion.is_some())
                .finish(),
        }
    }
}

/// Execution context handed to a tool handler.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub args: Value,
    pub vendor_id: VendorId,
    pub conversation_id: ConversationId,
}

impl ToolContext {
    /// Creates a context for one execution.
    pub fn new(args: Value, vendor_id: VendorId, conversation_id: ConversationId) -> Self {
        Self {
            args,
            vendor_id,
            conversation_id,
        }
    }
}

/// Failure raised inside a tool handler.
///
/// Handlers may declare the HTTP status class of the failure; absent a
/// declaration the registry treats it as a 500.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
    pub status_code: Option<u16>,
}

impl HandlerError {
    /// Creates a handler error with no declared status.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
        }
    }

    /// Creates a handler error carrying a status class.
    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code: Some(status_code),
        }
    }
}

/// Executable body of a tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool against the given context.
    async fn run(&self, ctx: ToolContext) -> Result<Value, HandlerError>;
}

/// A registered tool: definition, handler, optional mock rule, optional
/// caller-visible error message override.
#[derive(Clone)]
pub struct Tool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
    mock_rule: Option<MockRule>,
    error_message: Option<String>,
}

impl Tool {
    /// Creates a tool from a definition and handler.
    pub fn new(definition: ToolDefinition, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            definition,
            handler,
            mock_rule: None,
            error_message: None,
        }
    }

    /// Attaches a mock-suggestion rule.
    pub fn with_mock_rule(mut self, rule: MockRule) -> Self {
        self.mock_rule = Some(rule);
        self
    }

    /// Overrides the caller-visible message used when the handler fails.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Fills in the default empty-object schema when none was declared.
    ///
    /// The registry applies this at registration so every downstream
    /// consumer sees a concrete schema.
    pub fn with_normalized_schema(mut self) -> Self {
        if self.definition.parameters.is_none() {
            self.definition.parameters = Some(empty_object_schema());
        }
        self
    }

    /// Returns the definition.
    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// Returns the handler.
    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// Returns the mock rule, if any.
    pub fn mock_rule(&self) -> Option<&MockRule> {
        self.mock_rule.as_ref()
    }

    /// Returns the error message override, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("definition", &self.definition)
            .field("mock_rule", &self.mock_rule)
            .field("error_message", &self.error_message)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopHandler;

    #[async_trait]
    impl ToolHandler for NoopHandler {
        async fn run(&self, _ctx: ToolContext) -> Result<Value, HandlerError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn definition_without_schema_normalizes_to_empty_object() {
        let def = ToolDefinition::new("lookup_inventory", "Check stock levels");
        assert!(def.parameters().is_none());
        assert_eq!(def.normalized_parameters(), empty_object_schema());
    }

    #[test]
    fn definition_keeps_declared_schema() {
        let schema = serde_json::json!({
            "type": "object",
            "required": ["productName"],
            "properties": { "productName": { "type": "string" } }
        });
        let def = ToolDefinition::new("lookup_inventory", "Check stock levels")
            .with_parameters(schema.clone());
        assert_eq!(def.normalized_parameters(), schema);
    }

    #[test]
    fn display_name_replaces_underscores() {
        let def = ToolDefinition::new("lookup_inventory", "Check stock levels");
        assert_eq!(def.display_name(), "lookup inventory");
    }

    #[test]
    fn descriptor_projects_normalized_schema() {
        let def = ToolDefinition::new("estimate_delivery", "Estimate delivery windows");
        let descriptor = def.descriptor();

        assert_eq!(descriptor.name, "estimate_delivery");
        assert_eq!(descriptor.description, "Estimate delivery windows");
        assert_eq!(descriptor.parameters, empty_object_schema());
    }

    #[test]
    fn descriptor_to_openai_format_has_correct_structure() {
        let descriptor = ToolDefinition::new("calculate_pricing", "Price an order")
            .with_parameters(serde_json::json!({
                "type": "object",
                "properties": { "basePrice": { "type": "number" } }
            }))
            .descriptor();

        let openai = descriptor.to_openai_format();

        assert_eq!(openai["type"], "function");
        assert_eq!(openai["function"]["name"], "calculate_pricing");
        assert_eq!(openai["function"]["description"], "Price an order");
        assert!(openai["function"]["parameters"].is_object());
    }

    #[test]
    fn keyword_rule_matches_case_insensitively() {
        let rule = MockRule::keywords(&["Stock", "inventory"]);
        assert_eq!(rule.matches("need a stock update"), Ok(true));
        assert_eq!(rule.matches("check INVENTORY".to_lowercase().as_str()), Ok(true));
        assert_eq!(rule.matches("price this order"), Ok(false));
    }

    #[test]
    fn predicate_rule_propagates_failures() {
        let rule = MockRule::Predicate {
            should_suggest: Arc::new(|_| Err("backing lexicon unavailable".to_string())),
            build_suggestion: None,
        };
        assert_eq!(
            rule.matches("anything"),
            Err("backing lexicon unavailable".to_string())
        );
    }

    #[test]
    fn suggestion_for_uses_custom_builder_when_present() {
        let rule = MockRule::Predicate {
            should_suggest: Arc::new(|input| Ok(input.contains("send"))),
            build_suggestion: Some(Arc::new(|_| "I can send that for you.".to_string())),
        };
        assert_eq!(
            rule.suggestion_for("send a promo"),
            Some("I can send that for you.".to_string())
        );

        let keyword_rule = MockRule::keywords(&["price"]);
        assert_eq!(keyword_rule.suggestion_for("price it"), None);
    }

    #[test]
    fn tool_with_normalized_schema_fills_default() {
        let tool = Tool::new(
            ToolDefinition::new("send_message", "Send an outbound message"),
            Arc::new(NoopHandler),
        )
        .with_normalized_schema();

        assert_eq!(
            tool.definition().parameters(),
            Some(&empty_object_schema())
        );
    }

    #[test]
    fn handler_error_carries_optional_status() {
        let plain = HandlerError::new("upstream unavailable");
        assert_eq!(plain.status_code, None);

        let coded = HandlerError::with_status("bad argument", 400);
        assert_eq!(coded.status_code, Some(400));
        assert_eq!(coded.to_string(), "bad argument");
    }
}
