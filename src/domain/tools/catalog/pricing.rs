//! Pricing tool - quotes an order from base price, discount, and quantity.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::tools::{HandlerError, MockRule, Tool, ToolContext, ToolDefinition, ToolHandler};

/// Flat sales tax rate applied to every quote.
const TAX_RATE: f64 = 0.075;

/// Builds the calculate_pricing tool.
pub fn calculate_pricing_tool() -> Tool {
    let definition = ToolDefinition::new(
        "calculate_pricing",
        "Calculate a price quote with discount and estimated tax for an order",
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "basePrice": {
                "type": "number",
                "description": "Unit price before discount"
            },
            "discountPercentage": {
                "type": "number",
                "description": "Discount to apply, 0 to 100"
            },
            "quantity": {
                "type": "number",
                "description": "Number of units"
            }
        },
        "required": ["basePrice"]
    }));

    Tool::new(definition, Arc::new(PricingHandler)).with_mock_rule(MockRule::keywords(&[
        "price", "pricing", "cost", "discount", "quote",
    ]))
}

struct PricingHandler;

#[async_trait]
impl ToolHandler for PricingHandler {
    async fn run(&self, ctx: ToolContext) -> Result<Value, HandlerError> {
        let base_price = ctx
            .args
            .get("basePrice")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                HandlerError::with_status("basePrice is required and must be a number", 400)
            })?;
        let discount = ctx
            .args
            .get("discountPercentage")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let quantity = ctx.args.get("quantity").and_then(Value::as_f64).unwrap_or(1.0);

        if base_price < 0.0 {
            return Err(HandlerError::with_status("basePrice must not be negative", 400));
        }
        if !(0.0..=100.0).contains(&discount) {
            return Err(HandlerError::with_status(
                "discountPercentage must be between 0 and 100",
                400,
            ));
        }

        let subtotal = round2(base_price * quantity * (1.0 - discount / 100.0));
        let estimated_tax = round2(subtotal * TAX_RATE);
        let total = round2(subtotal + estimated_tax);

        Ok(json!({
            "subtotal": subtotal,
            "estimatedTax": estimated_tax,
            "total": total,
            "currency": "USD",
        }))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
