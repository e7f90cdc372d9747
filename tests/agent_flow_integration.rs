//! Integration tests for the agent orchestration flow.
//!
//! These tests verify the end-to-end flow:
//! 1. Vendor opens a conversation (optionally seeded with a first message)
//! 2. An agent turn appends the vendor message, runs tools, and replies
//! 3. Every tool execution lands in the audit trail
//! 4. Listing endpoints reflect the accumulated activity
//!
//! Uses in-memory implementations to test the flow without external dependencies.

use std::sync::Arc;

use serde_json::json;

use vendor_pilot::adapters::{
    InMemoryAuditLog, InMemoryConversationStore, MockMessageDispatcher, ScriptedProvider,
};
use vendor_pilot::application::{
    ActCommand, ActHandler, ListConversationsHandler, ListConversationsQuery,
    ListToolActivityHandler, ListToolActivityQuery, StartConversationCommand,
    StartConversationHandler,
};
use vendor_pilot::domain::agent::{select_mode, AgentMode, ModePreference};
use vendor_pilot::domain::conversation::MessageRole;
use vendor_pilot::domain::foundation::VendorId;
use vendor_pilot::domain::tools::{catalog, ToolRegistry, ToolRunStatus};
use vendor_pilot::ports::{
    CompletionProvider, ConversationFilter, ConversationStore, ToolActivityFilter, ToolCallRequest,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Install a subscriber so tool-loop logs show up under RUST_LOG.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct TestApp {
    store: Arc<InMemoryConversationStore>,
    audit_log: Arc<InMemoryAuditLog>,
    registry: Arc<ToolRegistry>,
}

impl TestApp {
    fn new() -> Self {
        init_tracing();
        let dispatcher = Arc::new(MockMessageDispatcher::new());
        Self {
            store: Arc::new(InMemoryConversationStore::new()),
            audit_log: Arc::new(InMemoryAuditLog::new()),
            registry: Arc::new(catalog::standard_registry(dispatcher)),
        }
    }

    fn act_handler(
        &self,
        provider: Option<Arc<dyn CompletionProvider>>,
        mode: AgentMode,
    ) -> ActHandler<InMemoryConversationStore, InMemoryAuditLog> {
        ActHandler::new(
            self.store.clone(),
            self.audit_log.clone(),
            self.registry.clone(),
            provider,
            mode,
        )
    }

    fn start_handler(&self, mode: AgentMode) -> StartConversationHandler<InMemoryConversationStore> {
        StartConversationHandler::new(self.store.clone(), mode)
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

/// Tests the full mock-mode loop: open a conversation, ask a stock question,
/// and verify the tool run, the transcript, and the audit trail.
#[tokio::test]
async fn mock_turn_end_to_end() {
    let app = TestApp::new();
    let vendor_id = VendorId::new();

    let started = app
        .start_handler(AgentMode::Mock)
        .handle(
            StartConversationCommand::new(vendor_id)
                .with_channel("in_app")
                .with_tags(vec!["pilot".to_string()]),
        )
        .await
        .unwrap();
    assert_eq!(started.mode, AgentMode::Mock);

    let result = app
        .act_handler(None, AgentMode::Mock)
        .handle(ActCommand::new(
            started.conversation_id,
            vendor_id,
            "Can you check stock for running shoes?",
        ))
        .await
        .unwrap();

    // The inventory tool ran and succeeded
    assert_eq!(result.mode, AgentMode::Mock);
    assert_eq!(result.tools.len(), 1);
    assert_eq!(result.tools[0].name, "lookup_inventory");
    assert_eq!(result.tools[0].status, ToolRunStatus::Success);
    assert!(result.reply.contains("lookup inventory"));

    // Transcript carries the vendor message, the tool record, and the reply
    let conversation = app
        .store
        .find_by_id(&started.conversation_id)
        .await
        .unwrap()
        .unwrap();
    let roles: Vec<MessageRole> = conversation.messages().iter().map(|m| m.role()).collect();
    assert_eq!(
        roles,
        vec![MessageRole::Vendor, MessageRole::Tool, MessageRole::Agent]
    );

    let agent_message = conversation.messages().last().unwrap();
    assert_eq!(agent_message.metadata().get("provider"), Some(&json!("mock")));

    // One audit entry for the single execution
    assert_eq!(app.audit_log.count().await, 1);
}

/// Tests a live turn against a scripted provider: the model requests a tool,
/// the tool result round-trips, and the second completion becomes the reply.
#[tokio::test]
async fn live_turn_round_trips_through_scripted_provider() {
    let app = TestApp::new();
    let vendor_id = VendorId::new();

    let started = app
        .start_handler(AgentMode::Live)
        .handle(StartConversationCommand::new(vendor_id))
        .await
        .unwrap();

    let provider = ScriptedProvider::new()
        .with_tool_calls(vec![ToolCallRequest::new(
            "call-pricing-1",
            "calculate_pricing",
            r#"{"basePrice": 120.0, "quantity": 3}"#,
        )])
        .with_text("Three units come to 324.00 after the volume discount.");

    let result = app
        .act_handler(
            Some(Arc::new(provider.clone()) as Arc<dyn CompletionProvider>),
            AgentMode::Live,
        )
        .handle(ActCommand::new(
            started.conversation_id,
            vendor_id,
            "What would three units cost?",
        ))
        .await
        .unwrap();

    assert_eq!(result.mode, AgentMode::Live);
    assert_eq!(result.reply, "Three units come to 324.00 after the volume discount.");
    assert_eq!(result.tools.len(), 1);
    assert_eq!(result.tools[0].name, "calculate_pricing");
    assert_eq!(result.tools[0].call_id, "call-pricing-1");
    assert_eq!(result.tools[0].status, ToolRunStatus::Success);

    // First request advertises tools, the follow-up does not
    assert_eq!(provider.request_count(), 2);
    let requests = provider.requests();
    assert!(!requests[0].tools.is_empty());
    assert!(requests[1].tools.is_empty());

    // Transcript and audit reflect the round trip
    let conversation = app
        .store
        .find_by_id(&started.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conversation.messages().len(), 3);
    let agent_message = conversation.messages().last().unwrap();
    assert_eq!(agent_message.metadata().get("provider"), Some(&json!("live")));
    assert_eq!(app.audit_log.count().await, 1);
}

/// Tests that an initial message seeds the transcript and shifts the mock
/// reply's closing line on the next turn.
#[tokio::test]
async fn seeded_conversation_counts_as_ongoing() {
    let app = TestApp::new();
    let vendor_id = VendorId::new();

    let seeded = app
        .start_handler(AgentMode::Mock)
        .handle(
            StartConversationCommand::new(vendor_id)
                .with_initial_message("Morning! Two things to sort out today."),
        )
        .await
        .unwrap();
    let fresh = app
        .start_handler(AgentMode::Mock)
        .handle(StartConversationCommand::new(vendor_id))
        .await
        .unwrap();

    let handler = app.act_handler(None, AgentMode::Mock);
    let ongoing = handler
        .handle(ActCommand::new(
            seeded.conversation_id,
            vendor_id,
            "Check stock levels please",
        ))
        .await
        .unwrap();
    let opening = handler
        .handle(ActCommand::new(
            fresh.conversation_id,
            vendor_id,
            "Check stock levels please",
        ))
        .await
        .unwrap();

    // Same question, but only the seeded thread is treated as ongoing
    assert_ne!(
        ongoing.reply.lines().last(),
        opening.reply.lines().last(),
        "seeded and fresh conversations should close differently"
    );
}

/// Tests that conversation listings are vendor-scoped and reflect activity.
#[tokio::test]
async fn listing_reflects_conversation_activity() {
    let app = TestApp::new();
    let vendor_id = VendorId::new();
    let other_vendor = VendorId::new();

    let start = app.start_handler(AgentMode::Mock);
    let first = start
        .handle(StartConversationCommand::new(vendor_id).with_tags(vec!["wholesale".to_string()]))
        .await
        .unwrap();
    start
        .handle(StartConversationCommand::new(vendor_id))
        .await
        .unwrap();
    start
        .handle(StartConversationCommand::new(other_vendor))
        .await
        .unwrap();

    app.act_handler(None, AgentMode::Mock)
        .handle(ActCommand::new(
            first.conversation_id,
            vendor_id,
            "Any discount for bulk orders?",
        ))
        .await
        .unwrap();

    let listing = ListConversationsHandler::new(app.store.clone())
        .handle(ListConversationsQuery::new(vendor_id))
        .await
        .unwrap();

    // Only this vendor's conversations, most recently active first
    assert_eq!(listing.total, 2);
    assert_eq!(listing.items[0].id, first.conversation_id);
    assert_eq!(listing.items[0].message_count, 3);
    assert!(listing.items.iter().all(|s| s.vendor_id == vendor_id));

    let tagged = ListConversationsHandler::new(app.store.clone())
        .handle(
            ListConversationsQuery::new(vendor_id)
                .with_filter(ConversationFilter::default().with_tag("wholesale")),
        )
        .await
        .unwrap();
    assert_eq!(tagged.total, 1);
    assert_eq!(tagged.items[0].id, first.conversation_id);
}

/// Tests that tool activity accumulates across turns and that stats cover
/// the whole history even when the page is filtered.
#[tokio::test]
async fn tool_activity_accumulates_across_turns() {
    let app = TestApp::new();
    let vendor_id = VendorId::new();

    let started = app
        .start_handler(AgentMode::Mock)
        .handle(StartConversationCommand::new(vendor_id))
        .await
        .unwrap();

    let handler = app.act_handler(None, AgentMode::Mock);
    for input in [
        "How much stock is available?",
        "Quote me a price with discount",
        "What's the delivery ETA for Berlin?",
    ] {
        handler
            .handle(ActCommand::new(started.conversation_id, vendor_id, input))
            .await
            .unwrap();
    }

    let report = ListToolActivityHandler::new(app.audit_log.clone())
        .handle(ListToolActivityQuery::new(vendor_id))
        .await
        .unwrap();

    assert_eq!(report.stats.total, 3);
    assert_eq!(report.stats.successes, 3);
    assert_eq!(report.stats.failures, 0);
    assert_eq!(report.page.total, 3);
    // Newest first
    assert_eq!(report.page.items[0].tool_name(), "estimate_delivery");

    let filtered = ListToolActivityHandler::new(app.audit_log.clone())
        .handle(
            ListToolActivityQuery::new(vendor_id)
                .with_filter(ToolActivityFilter::default().with_tool_name("lookup_inventory")),
        )
        .await
        .unwrap();

    // Page narrows, stats still describe the full history
    assert_eq!(filtered.page.total, 1);
    assert_eq!(filtered.stats.total, 3);
}

/// Tests that an audit-store outage never reaches the vendor: the turn
/// completes and the transcript is saved even though nothing was recorded.
#[tokio::test]
async fn audit_outage_does_not_abort_the_turn() {
    let app = TestApp::new();
    let vendor_id = VendorId::new();

    let started = app
        .start_handler(AgentMode::Mock)
        .handle(StartConversationCommand::new(vendor_id))
        .await
        .unwrap();

    app.audit_log.set_failing(true);
    let result = app
        .act_handler(None, AgentMode::Mock)
        .handle(ActCommand::new(
            started.conversation_id,
            vendor_id,
            "What's the shipping cost to zone two?",
        ))
        .await
        .unwrap();

    assert!(!result.reply.is_empty());
    assert!(!result.tools.is_empty());
    assert_eq!(app.audit_log.count().await, 0);

    let conversation = app
        .store
        .find_by_id(&started.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conversation.messages().len(), 2 + result.tools.len());
}

/// Tests the mode-selection wiring an entry point would perform: an auto
/// preference without a credential must produce a working mock pipeline.
#[tokio::test]
async fn auto_mode_without_credential_runs_mock() {
    let app = TestApp::new();
    let vendor_id = VendorId::new();

    let mode = select_mode(ModePreference::Auto, false);
    assert_eq!(mode, AgentMode::Mock);

    let started = app
        .start_handler(mode)
        .handle(StartConversationCommand::new(vendor_id))
        .await
        .unwrap();
    assert_eq!(started.mode, AgentMode::Mock);

    let result = app
        .act_handler(None, mode)
        .handle(ActCommand::new(
            started.conversation_id,
            vendor_id,
            "Send our regulars a note about the new arrivals",
        ))
        .await
        .unwrap();

    assert_eq!(result.tools[0].name, "send_message");
    assert_eq!(result.tools[0].status, ToolRunStatus::Success);
}
