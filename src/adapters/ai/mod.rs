//! Completion Provider Adapters.
//!
//! Implementations of the CompletionProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI chat completions with function calling
//! - `ScriptedProvider` - Configurable scripted provider for testing

mod openai_provider;
mod scripted_provider;

pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use scripted_provider::{ScriptedError, ScriptedProvider, ScriptedResponse};
