//! Outbound protocol messages and close codes.

use serde::{Deserialize, Serialize};

/// One outbound protocol message.
///
/// Serializes as `{"type": "...", "value": "..."}`.
///
/// # Examples
///
/// ```
/// use fresco_server::Envelope;
///
/// let encoded = serde_json::to_string(&Envelope::Chunk("<html>".to_string())).unwrap();
/// assert_eq!(encoded, r#"{"type":"chunk","value":"<html>"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Envelope {
    /// Human-readable progress update
    Status(String),
    /// One verbatim fragment from the token stream
    Chunk(String),
    /// The final assembled payload
    SetCode(String),
    /// Human-readable failure description
    Error(String),
}

/// Close status for a session's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseCode {
    /// Successful completion, or graceful missing-credential termination
    Normal,
    /// Malformed inbound message
    UnsupportedInput,
    /// Any other failure
    InternalError,
}

impl CloseCode {
    /// The WebSocket close code sent on the wire.
    pub fn as_u16(self) -> u16 {
        match self {
            CloseCode::Normal => 1000,
            CloseCode::UnsupportedInput => 1003,
            CloseCode::InternalError => 1011,
        }
    }
}
