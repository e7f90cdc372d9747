//! Built-in commerce tool catalog.
//!
//! Four tools cover the vendor back office: pricing quotes, inventory
//! lookups, delivery estimates, and customer messaging. `standard_registry`
//! builds them in a fixed order once at startup.

mod delivery;
mod inventory;
mod messaging;
mod pricing;

use std::sync::Arc;

use crate::ports::MessageDispatcher;

use super::registry::ToolRegistry;

pub use delivery::estimate_delivery_tool;
pub use inventory::lookup_inventory_tool;
pub use messaging::send_message_tool;
pub use pricing::calculate_pricing_tool;

/// Tool simulated runs fall back to when no suggestion rule matches.
pub const DEFAULT_TOOL: &str = "calculate_pricing";

/// Builds the standard registry in catalog order.
pub fn standard_registry(dispatcher: Arc<dyn MessageDispatcher>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in [
        calculate_pricing_tool(),
        lookup_inventory_tool(),
        estimate_delivery_tool(),
        send_message_tool(dispatcher),
    ] {
        registry
            .register(tool)
            .expect("catalog tool names are never blank");
    }
    registry
}
