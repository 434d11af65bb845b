/// Browser-facing socket abstraction
mod connection;
mod websocket_connection;

pub use connection::{
    ConnectionError, ConnectionResult, FrameSink, FrameSource, TerminalConnection, TerminalMessage,
};
pub use websocket_connection::{WebSocketConnection, WebSocketSink, WebSocketSource};
