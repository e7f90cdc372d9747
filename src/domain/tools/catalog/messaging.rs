//! Messaging tool - sends vendor broadcasts through the dispatcher port.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::tools::{HandlerError, MockRule, Tool, ToolContext, ToolDefinition, ToolHandler};
use crate::ports::{MessageDispatcher, OutboundMessage};

const SUGGEST_KEYWORDS: [&str; 5] = ["send", "notify", "broadcast", "announce", "remind"];

/// Builds the send_message tool around a dispatcher.
pub fn send_message_tool(dispatcher: Arc<dyn MessageDispatcher>) -> Tool {
    let definition = ToolDefinition::new(
        "send_message",
        "Send a message to a customer segment over a delivery channel",
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "channel": {
                "type": "string",
                "enum": ["sms", "email", "whatsapp", "in_app"],
                "description": "Delivery channel"
            },
            "audience": {
                "type": "string",
                "enum": ["all_customers", "vip_customers", "recent_customers"],
                "description": "Customer segment to reach"
            },
            "body": {
                "type": "string",
                "description": "Message text"
            }
        },
        "required": ["body"]
    }));

    let rule = MockRule::Predicate {
        should_suggest: Arc::new(|input| {
            Ok(SUGGEST_KEYWORDS.iter().any(|keyword| input.contains(keyword)))
        }),
        build_suggestion: Some(Arc::new(|_input| {
            "I can draft and send that message to your customers.".to_string()
        })),
    };

    Tool::new(definition, Arc::new(MessagingHandler { dispatcher }))
        .with_mock_rule(rule)
        .with_error_message("Message delivery failed. Check the channel configuration and try again.")
}

struct MessagingHandler {
    dispatcher: Arc<dyn MessageDispatcher>,
}

#[async_trait]
impl ToolHandler for MessagingHandler {
    async fn run(&self, ctx: ToolContext) -> Result<Value, HandlerError> {
        let body = ctx
            .args
            .get("body")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|body| !body.is_empty())
            .ok_or_else(|| {
                HandlerError::with_status("body is required and must be a non-empty string", 400)
            })?;
        let channel = ctx
            .args
            .get("channel")
            .and_then(Value::as_str)
            .unwrap_or("in_app");
        let audience = ctx
            .args
            .get("audience")
            .and_then(Value::as_str)
            .unwrap_or("all_customers");

        let receipt = self
            .dispatcher
            .dispatch(OutboundMessage::new(channel, audience, body))
            .await
            .map_err(|error| HandlerError::with_status(error.to_string(), 502))?;

        Ok(json!({
            "channel": channel,
            "audience": audience,
            "provider": receipt.provider,
            "reference": receipt.reference,
            "body": receipt.body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::foundation::{ConversationId, VendorId};
    use crate::ports::{DeliveryReceipt, DispatchError};

    struct RecordingDispatcher {
        sent: Mutex<Vec<OutboundMessage>>,
        fail: bool,
    }

    impl RecordingDispatcher {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl MessageDispatcher for RecordingDispatcher {
        async fn dispatch(
            &self,
            message: OutboundMessage,
        ) -> Result<DeliveryReceipt, DispatchError> {
            if self.fail {
                return Err(DispatchError::unavailable("gateway offline"));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(DeliveryReceipt::new("mock", "ref-1", message.body))
        }
    }

    fn ctx(args: Value) -> ToolContext {
        ToolContext::new(args, VendorId::new(), ConversationId::new())
    }

    #[tokio::test]
    async fn dispatches_body_with_defaulted_channel_and_audience() {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let tool = send_message_tool(dispatcher.clone());

        let result = tool
            .handler()
            .run(ctx(json!({ "body": "Flash sale this weekend" })))
            .await
            .unwrap();

        assert_eq!(result["channel"], json!("in_app"));
        assert_eq!(result["audience"], json!("all_customers"));
        assert_eq!(result["provider"], json!("mock"));
        assert_eq!(result["body"], json!("Flash sale this weekend"));

        let sent = dispatcher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].channel, "in_app");
    }

    #[tokio::test]
    async fn blank_body_is_a_client_error() {
        let tool = send_message_tool(Arc::new(RecordingDispatcher::new()));

        let error = tool
            .handler()
            .run(ctx(json!({ "body": "   " })))
            .await
            .unwrap_err();

        assert_eq!(error.status_code, Some(400));
        assert!(error.message.contains("body"));
    }

    #[tokio::test]
    async fn dispatcher_failure_maps_to_bad_gateway() {
        let tool = send_message_tool(Arc::new(RecordingDispatcher::failing()));

        let error = tool
            .handler()
            .run(ctx(json!({ "body": "Restock alert" })))
            .await
            .unwrap_err();

        assert_eq!(error.status_code, Some(502));
        assert!(error.message.contains("gateway offline"));
    }

    #[test]
    fn suggests_itself_with_custom_text() {
        let tool = send_message_tool(Arc::new(RecordingDispatcher::new()));
        let rule = tool.mock_rule().unwrap();

        assert_eq!(rule.matches("notify vip customers about the sale"), Ok(true));
        assert_eq!(rule.matches("how much stock is left"), Ok(false));
        assert_eq!(
            rule.suggestion_for("notify vip customers about the sale"),
            Some("I can draft and send that message to your customers.".to_string())
        );
    }

    #[test]
    fn carries_a_vendor_facing_error_message_override() {
        let tool = send_message_tool(Arc::new(RecordingDispatcher::new()));
        assert_eq!(
            tool.error_message(),
            Some("Message delivery failed. Check the channel configuration and try again.")
        );
    }
}
