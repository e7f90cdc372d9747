//! Tool activity query handlers.

mod list_tool_activity;

pub use list_tool_activity::{
    ListToolActivityError, ListToolActivityHandler, ListToolActivityQuery, ToolActivityReport,
};
