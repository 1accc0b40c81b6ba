//! OpenAI chat completions integration.

mod client;
pub mod conversions;
mod dto;

pub use client::{MODEL_GPT_4, OpenAiClient, StreamEvent, decode_stream_line};
pub use dto::{
    ChatChunk, ChatContent, ChatMessage, ChatRequest, ChatRequestBuilder, ChunkChoice,
    ContentPart, Delta, ImageUrl, OpenAiError,
};
