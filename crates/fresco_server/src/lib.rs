//! WebSocket code generation server.
//!
//! Streams model output to a client over `/generate-code`, with optional
//! placeholder-image substitution after the text stream completes. One
//! session per connection: a single inbound parameter message drives prompt
//! assembly, token streaming, the image pass, and finalization.

mod api;
mod config;
pub mod prompts;
mod request;
mod response;
mod session;
mod transcript;
mod transport;

pub use api::{AppState, create_router};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use request::{GenerateParams, GenerationType};
pub use response::{CloseCode, Envelope};
pub use session::Session;
pub use transport::{Transport, TransportError, WsTransport};
