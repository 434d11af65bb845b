/// Terminal connection traits for the browser side of a session
use std::fmt::Debug;

use thiserror::Error;

/// Browser socket failure
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Transport error reported by the socket
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Send attempted after the socket was closed
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result of a browser socket operation
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Outbound half of a browser connection
#[async_trait::async_trait]
pub trait FrameSink: Send {
    /// Send a text frame
    async fn send_text(&mut self, message: &str) -> ConnectionResult<()>;

    /// Send a binary frame
    async fn send_binary(&mut self, data: &[u8]) -> ConnectionResult<()>;

    /// Send a close frame. Further sends fail.
    async fn close(&mut self) -> ConnectionResult<()>;
}

/// Inbound half of a browser connection
#[async_trait::async_trait]
pub trait FrameSource: Send {
    /// Receive the next frame. Returns None when the peer has gone away.
    async fn receive(&mut self) -> Option<ConnectionResult<TerminalMessage>>;
}

/// A browser connection that can be split into independently owned halves,
/// one per bridge direction.
pub trait TerminalConnection: Send + Debug {
    type Sink: FrameSink + 'static;
    type Source: FrameSource + 'static;

    /// Get the connection ID
    fn id(&self) -> &str;

    /// Split into the outbound and inbound halves
    fn split(self) -> (Self::Sink, Self::Source);
}

/// Terminal message types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalMessage {
    /// Text message
    Text(String),
    /// Binary message
    Binary(Vec<u8>),
    /// Ping message
    Ping(Vec<u8>),
    /// Pong message
    Pong(Vec<u8>),
    /// Close message
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            ConnectionError::WebSocket("reset by peer".into()).to_string(),
            "WebSocket error: reset by peer"
        );
        assert_eq!(ConnectionError::ConnectionClosed.to_string(), "Connection closed");
    }
}
