/// WebSocket connection implementation for TerminalConnection trait
use std::fmt::Debug;
use tracing::{debug, warn};

use axum::extract::ws::Message::{Binary, Close, Ping, Pong, Text};
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};

use crate::protocol::{
    ConnectionError, ConnectionResult, FrameSink, FrameSource, TerminalConnection, TerminalMessage,
};

/// An upgraded browser socket
pub struct WebSocketConnection {
    pub socket: WebSocket,
    pub id: String,
}

impl WebSocketConnection {
    pub fn new(socket: WebSocket, id: impl Into<String>) -> Self {
        Self {
            socket,
            id: id.into(),
        }
    }
}

impl Debug for WebSocketConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketConnection")
            .field("id", &self.id)
            .finish()
    }
}

impl TerminalConnection for WebSocketConnection {
    type Sink = WebSocketSink;
    type Source = WebSocketSource;

    fn id(&self) -> &str {
        &self.id
    }

    fn split(self) -> (WebSocketSink, WebSocketSource) {
        let (sink, stream) = self.socket.split();
        (
            WebSocketSink {
                sink,
                id: self.id.clone(),
                closed: false,
            },
            WebSocketSource {
                stream,
                id: self.id,
            },
        )
    }
}

/// Write half of a [`WebSocketConnection`]
pub struct WebSocketSink {
    sink: SplitSink<WebSocket, Message>,
    id: String,
    closed: bool,
}

impl WebSocketSink {
    async fn send(&mut self, message: Message) -> ConnectionResult<()> {
        if self.closed {
            return Err(ConnectionError::ConnectionClosed);
        }
        self.sink
            .send(message)
            .await
            .map_err(|e| ConnectionError::WebSocket(e.to_string()))
    }
}

#[async_trait::async_trait]
impl FrameSink for WebSocketSink {
    async fn send_text(&mut self, message: &str) -> ConnectionResult<()> {
        self.send(Text(message.to_string())).await
    }

    async fn send_binary(&mut self, data: &[u8]) -> ConnectionResult<()> {
        self.send(Binary(data.to_vec())).await
    }

    async fn close(&mut self) -> ConnectionResult<()> {
        if self.closed {
            return Ok(());
        }
        let result = self.send(Close(None)).await;
        self.closed = true;
        if let Err(e) = &result {
            debug!(session_id = %self.id, error = %e, "Close frame not delivered");
        }
        result
    }
}

/// Read half of a [`WebSocketConnection`]
pub struct WebSocketSource {
    stream: SplitStream<WebSocket>,
    id: String,
}

#[async_trait::async_trait]
impl FrameSource for WebSocketSource {
    async fn receive(&mut self) -> Option<ConnectionResult<TerminalMessage>> {
        match self.stream.next().await {
            Some(Ok(Text(text))) => Some(Ok(TerminalMessage::Text(text))),
            Some(Ok(Binary(bin))) => Some(Ok(TerminalMessage::Binary(bin))),
            Some(Ok(Ping(ping))) => Some(Ok(TerminalMessage::Ping(ping))),
            Some(Ok(Pong(pong))) => Some(Ok(TerminalMessage::Pong(pong))),
            Some(Ok(Close(_))) => {
                debug!(session_id = %self.id, "WebSocket received close message");
                Some(Ok(TerminalMessage::Close))
            }
            Some(Err(e)) => {
                warn!(session_id = %self.id, error = %e, "WebSocket receive error");
                Some(Err(ConnectionError::WebSocket(e.to_string())))
            }
            None => {
                debug!(session_id = %self.id, "WebSocket connection closed");
                None
            }
        }
    }
}
