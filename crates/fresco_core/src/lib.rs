//! Core data types for the Fresco code generation server.
//!
//! This crate provides the conversation data model shared by the model
//! clients and the session orchestrator.

mod input;
mod media;
mod message;
mod request;
mod role;

pub use input::Input;
pub use media::MediaSource;
pub use message::{Message, MessageBuilder};
pub use request::{GenerateRequest, GenerateRequestBuilder};
pub use role::Role;
