/// Test doubles for the browser socket, the shell transport and the establisher
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::DuplexStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::protocol::{
    ConnectionError, ConnectionResult, FrameSink, FrameSource, TerminalConnection, TerminalMessage,
};
use crate::service::{Session, ShellChannel, ShellTransport};
use crate::ssh::{ConnectionDescriptor, EstablishError, Establisher};

/// What the bridge sent towards the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentFrame {
    Text(String),
    Binary(Vec<u8>),
}

#[derive(Debug)]
pub struct MockConnection {
    id: String,
    sink: MockSink,
    source: MockSource,
}

/// Test-side handle of a [`MockConnection`]
pub struct BrowserEnd {
    inbound: Option<UnboundedSender<ConnectionResult<TerminalMessage>>>,
    frames: UnboundedReceiver<SentFrame>,
    pub sink_closes: Arc<AtomicUsize>,
}

impl MockConnection {
    pub fn pair(id: &str) -> (MockConnection, BrowserEnd) {
        let (inbound_tx, inbound_rx) = unbounded_channel();
        let (frames_tx, frames_rx) = unbounded_channel();
        let sink_closes = Arc::new(AtomicUsize::new(0));

        let connection = MockConnection {
            id: id.to_string(),
            sink: MockSink {
                frames: frames_tx,
                closes: sink_closes.clone(),
                closed: false,
            },
            source: MockSource { inbound: inbound_rx },
        };
        let browser = BrowserEnd {
            inbound: Some(inbound_tx),
            frames: frames_rx,
            sink_closes,
        };
        (connection, browser)
    }
}

impl BrowserEnd {
    pub fn send(&self, message: TerminalMessage) {
        if let Some(inbound) = &self.inbound {
            let _ = inbound.send(Ok(message));
        }
    }

    pub fn fail_receive(&self) {
        if let Some(inbound) = &self.inbound {
            let _ = inbound.send(Err(ConnectionError::WebSocket("reset by peer".into())));
        }
    }

    /// Simulate the browser going away
    pub fn disconnect(&mut self) {
        self.inbound.take();
    }

    pub async fn next_frame(&mut self) -> Option<SentFrame> {
        self.frames.recv().await
    }
}

impl TerminalConnection for MockConnection {
    type Sink = MockSink;
    type Source = MockSource;

    fn id(&self) -> &str {
        &self.id
    }

    fn split(self) -> (MockSink, MockSource) {
        (self.sink, self.source)
    }
}

#[derive(Debug)]
pub struct MockSink {
    frames: UnboundedSender<SentFrame>,
    closes: Arc<AtomicUsize>,
    closed: bool,
}

impl MockSink {
    fn push(&mut self, frame: SentFrame) -> ConnectionResult<()> {
        if self.closed {
            return Err(ConnectionError::ConnectionClosed);
        }
        self.frames
            .send(frame)
            .map_err(|_| ConnectionError::ConnectionClosed)
    }
}

#[async_trait::async_trait]
impl FrameSink for MockSink {
    async fn send_text(&mut self, message: &str) -> ConnectionResult<()> {
        self.push(SentFrame::Text(message.to_string()))
    }

    async fn send_binary(&mut self, data: &[u8]) -> ConnectionResult<()> {
        self.push(SentFrame::Binary(data.to_vec()))
    }

    async fn close(&mut self) -> ConnectionResult<()> {
        self.closed = true;
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockSource {
    inbound: UnboundedReceiver<ConnectionResult<TerminalMessage>>,
}

#[async_trait::async_trait]
impl FrameSource for MockSource {
    async fn receive(&mut self) -> Option<ConnectionResult<TerminalMessage>> {
        self.inbound.recv().await
    }
}

/// Counts every close call, including repeated ones
#[derive(Debug)]
pub struct MockTransport {
    closes: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl ShellTransport for MockTransport {
    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Remote side of a mock shell: write to `output` to produce shell output,
/// read from `input` to see what the bridge typed.
pub struct ShellRemote {
    pub output: DuplexStream,
    pub input: DuplexStream,
}

pub fn mock_session() -> (Session, ShellRemote, Arc<AtomicUsize>) {
    let (output_local, output_remote) = tokio::io::duplex(64);
    let (input_local, input_remote) = tokio::io::duplex(64 * 1024);
    let closes = Arc::new(AtomicUsize::new(0));

    let session = Session::new(
        "mock-session",
        Box::new(MockTransport {
            closes: closes.clone(),
        }),
        ShellChannel::new(output_local, input_local),
    );
    let remote = ShellRemote {
        output: output_remote,
        input: input_remote,
    };
    (session, remote, closes)
}

/// Establisher returning a prepared outcome once
pub struct MockEstablisher {
    outcome: Mutex<Option<Result<Session, EstablishError>>>,
    pub calls: AtomicUsize,
}

impl MockEstablisher {
    pub fn succeeding(session: Session) -> Self {
        Self {
            outcome: Mutex::new(Some(Ok(session))),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: EstablishError) -> Self {
        Self {
            outcome: Mutex::new(Some(Err(error))),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Establisher for MockEstablisher {
    async fn establish(&self, _descriptor: &ConnectionDescriptor) -> Result<Session, EstablishError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(EstablishError::Session("mock already used".into())))
    }
}
