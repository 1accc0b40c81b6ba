//! Model provider integrations for Fresco.
//!
//! This crate provides the [`CompletionStream`] seam between the session
//! orchestrator and whatever produces completion text: a live OpenAI client
//! for production and a deterministic mock for integration testing.

mod mock;
pub mod openai;
mod source;

pub use mock::MockCompletionStream;
pub use openai::{OpenAiClient, OpenAiError};
pub use source::{CompletionStream, FragmentStream};
