//! Deterministic simulation of the agent's tool-calling turn.
//!
//! Mock mode mirrors the shape of the live flow: pick tools, synthesize
//! arguments, execute, compose a reply. Everything here is deterministic
//! apart from the random suffix in the call id, so the same message always
//! runs the same tools with the same arguments.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::domain::foundation::Timestamp;
use crate::domain::tools::{catalog, inference, Tool, ToolRegistry};

/// Most tools a simulated turn may execute.
pub const MAX_SIMULATED_TOOLS: usize = 2;

const GENERIC_REPLY_LINE: &str = "I looked into your request with the tools available to me.";
const FIRST_TURN_CLOSING: &str = "The tool results are attached to this conversation for review.";
const FOLLOW_UP_CLOSING: &str = "Happy to dig further on this thread if you need more.";

/// Picks the tools a simulated turn will run.
///
/// Rule matches come back in registration order; with no match the turn
/// falls back to the default pricing tool so the vendor always gets a
/// suggested action. At most two tools run per turn.
pub fn candidate_tools(registry: &ToolRegistry, input: &str) -> Vec<Arc<Tool>> {
    let mut candidates: Vec<Arc<Tool>> =
        registry.matching_tools(input).into_iter().cloned().collect();
    if candidates.is_empty() {
        if let Some(default_tool) = registry.get(catalog::DEFAULT_TOOL) {
            candidates.push(default_tool.clone());
        }
    }
    candidates.truncate(MAX_SIMULATED_TOOLS);
    candidates
}

/// Synthesizes plausible arguments for one tool from the vendor's message.
pub fn synthesize_arguments(tool_name: &str, input: &str) -> Value {
    match tool_name {
        "calculate_pricing" => json!({
            "basePrice": inference::extract_price(input).unwrap_or(100.0),
            "discountPercentage": inference::extract_discount(input).unwrap_or(0.0),
            "quantity": inference::extract_quantity(input).unwrap_or(1),
        }),
        "lookup_inventory" => json!({
            "productName": inference::extract_product_name(input)
                .unwrap_or_else(|| "sample product".to_string()),
        }),
        "estimate_delivery" => json!({
            "destinationZone": inference::infer_zone(input),
            "expedited": wants_expedited(input),
        }),
        "send_message" => json!({
            "channel": inference::infer_channel(input),
            "audience": inference::infer_audience(input),
            "body": input,
        }),
        _ => json!({ "query": input }),
    }
}

fn wants_expedited(input: &str) -> bool {
    let lowered = input.to_lowercase();
    ["urgent", "express", "expedited", "asap", "rush"]
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Builds a call identifier for one simulated execution.
///
/// Used only for correlation in messages and audit records, never for
/// idempotency.
pub fn mock_call_id(tool_name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        tool_name,
        Timestamp::now().as_unix_millis(),
        &suffix[..8]
    )
}

/// Composes the deterministic reply for a simulated turn.
///
/// One line per suggestion, or a generic line when no tool volunteered
/// anything, plus a closing line that differs for the first vendor message
/// versus a running thread.
pub fn compose_reply(suggestions: &[String], had_prior_vendor_message: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    if suggestions.is_empty() {
        lines.push(GENERIC_REPLY_LINE.to_string());
    } else {
        lines.extend(suggestions.iter().cloned());
    }
    if had_prior_vendor_message {
        lines.push(FOLLOW_UP_CLOSING.to_string());
    } else {
        lines.push(FIRST_TURN_CLOSING.to_string());
    }
    lines.join("\n")
}
