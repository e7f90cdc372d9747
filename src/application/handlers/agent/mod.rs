//! Agent command handlers.

mod act;

pub use act::{ActCommand, ActError, ActHandler, ActResult, ExecutedTool};
