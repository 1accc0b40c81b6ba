//! The duplex channel between a session and its client.

use crate::{CloseCode, Envelope};
use axum::extract::ws::{CloseFrame, Message as WsMessage, WebSocket};
use tracing::debug;

/// Transport-level failures.
#[derive(Debug, Clone, derive_more::Display)]
pub enum TransportError {
    /// The client closed the connection
    #[display("connection closed by client")]
    Closed,
    /// The channel failed
    #[display("transport failure: {}", _0)]
    Failed(String),
}

impl std::error::Error for TransportError {}

/// Structured duplex channel for one session.
///
/// `receive` is called at most once per session. `close` may be attempted
/// more than once across racing error paths and must absorb every attempt
/// after the first.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Receive one inbound text message.
    async fn receive(&mut self) -> Result<String, TransportError>;

    /// Send one outbound envelope.
    async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError>;

    /// Close the channel with a status code. Idempotent; never raises.
    async fn close(&mut self, code: CloseCode);
}

/// [`Transport`] over an accepted WebSocket.
pub struct WsTransport {
    socket: WebSocket,
    closed: bool,
}

impl WsTransport {
    /// Wraps an accepted socket.
    pub fn new(socket: WebSocket) -> Self {
        Self {
            socket,
            closed: false,
        }
    }
}

#[async_trait::async_trait]
impl Transport for WsTransport {
    async fn receive(&mut self) -> Result<String, TransportError> {
        loop {
            match self.socket.recv().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(text),
                Some(Ok(WsMessage::Close(_))) | None => return Err(TransportError::Closed),
                // Pings are answered by the framework; other frames are not
                // part of the protocol and are skipped.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(TransportError::Failed(e.to_string())),
            }
        }
    }

    async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError> {
        let payload = serde_json::to_string(envelope)
            .map_err(|e| TransportError::Failed(format!("encode failed: {}", e)))?;
        self.socket
            .send(WsMessage::Text(payload))
            .await
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self, code: CloseCode) {
        if self.closed {
            debug!("close already performed");
            return;
        }
        self.closed = true;
        let frame = CloseFrame {
            code: code.as_u16(),
            reason: "".into(),
        };
        if let Err(e) = self.socket.send(WsMessage::Close(Some(frame))).await {
            debug!(error = %e, "close frame not delivered");
        }
    }
}
