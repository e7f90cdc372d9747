//! Delivery tool - estimates delivery windows by destination zone.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::tools::{HandlerError, MockRule, Tool, ToolContext, ToolDefinition, ToolHandler};

/// Builds the estimate_delivery tool.
pub fn estimate_delivery_tool() -> Tool {
    let definition = ToolDefinition::new(
        "estimate_delivery",
        "Estimate the delivery window for an order by destination zone",
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "destinationZone": {
                "type": "string",
                "enum": ["domestic", "regional", "international"],
                "description": "Where the order ships to"
            },
            "expedited": {
                "type": "boolean",
                "description": "Use expedited shipping"
            }
        }
    }));

    Tool::new(definition, Arc::new(DeliveryHandler)).with_mock_rule(MockRule::keywords(&[
        "delivery", "shipping", "ship", "eta",
    ]))
}

struct DeliveryHandler;

#[async_trait]
impl ToolHandler for DeliveryHandler {
    async fn run(&self, ctx: ToolContext) -> Result<Value, HandlerError> {
        let zone = match ctx.args.get("destinationZone").and_then(Value::as_str) {
            Some("regional") => "regional",
            Some("international") => "international",
            _ => "domestic",
        };
        let expedited = ctx
            .args
            .get("expedited")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let (min_days, max_days) = delivery_window(zone, expedited);

        Ok(json!({
            "destinationZone": zone,
            "expedited": expedited,
            "estimatedDays": { "min": min_days, "max": max_days },
            "window": format!("{}-{} business days", min_days, max_days),
        }))
    }
}

/// Delivery windows in business days.
fn delivery_window(zone: &str, expedited: bool) -> (u32, u32) {
    match (zone, expedited) {
        ("international", true) => (5, 10),
        ("international", false) => (10, 21),
        ("regional", true) => (2, 4),
        ("regional", false) => (5, 8),
        (_, true) => (1, 2),
        (_, false) => (3, 5),
    }
}
