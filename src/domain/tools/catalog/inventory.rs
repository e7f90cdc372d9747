//! Inventory tool - deterministic stock lookup by product name.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::tools::{HandlerError, MockRule, Tool, ToolContext, ToolDefinition, ToolHandler};

/// Builds the lookup_inventory tool.
pub fn lookup_inventory_tool() -> Tool {
    let definition = ToolDefinition::new(
        "lookup_inventory",
        "Look up current stock levels for a product",
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "productName": {
                "type": "string",
                "description": "Product to check"
            }
        },
        "required": ["productName"]
    }));

    Tool::new(definition, Arc::new(InventoryHandler)).with_mock_rule(MockRule::keywords(&[
        "stock",
        "inventory",
        "available",
        "availability",
    ]))
}

struct InventoryHandler;

#[async_trait]
impl ToolHandler for InventoryHandler {
    async fn run(&self, ctx: ToolContext) -> Result<Value, HandlerError> {
        let product_name = ctx
            .args
            .get("productName")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                HandlerError::with_status(
                    "productName is required and must be a non-empty string",
                    400,
                )
            })?;

        // Stable per product name so repeated lookups agree.
        let units_available = stock_level(product_name);
        let in_stock = units_available > 0;

        Ok(json!({
            "productName": product_name,
            "inStock": in_stock,
            "unitsAvailable": units_available,
            "restockEta": if in_stock { Value::Null } else { json!("7 days") },
        }))
    }
}

fn stock_level(product_name: &str) -> u32 {
    let seed = product_name
        .to_lowercase()
        .bytes()
        .fold(0u32, |acc, byte| acc.wrapping_add(u32::from(byte)));
    seed % 120
}
