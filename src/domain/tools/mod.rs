//! Tools domain module.
//!
//! Owns the tool registry and its catalog of built-in commerce tools, the
//! audit record written for every execution, and the argument inference
//! heuristics used by simulated runs.

mod audit;
mod definition;
mod registry;

pub mod catalog;
pub mod inference;

pub use audit::{ToolAudit, ToolErrorDetail, ToolRunStatus};
pub use definition::{
    empty_object_schema, FunctionDescriptor, HandlerError, MockRule, SuggestPredicate,
    SuggestionBuilder, Tool, ToolContext, ToolDefinition, ToolHandler,
};
pub use registry::{RegistryError, ToolExecutionError, ToolRegistry};
