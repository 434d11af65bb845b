/// Session bridge: shell output to browser frames, browser frames to shell input
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::protocol::{ConnectionResult, FrameSink, FrameSource, TerminalConnection, TerminalMessage};
use crate::service::{Session, ShellInput, ShellOutput, StreamError};

/// Lifecycle of a bridge. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Session established, no copying yet
    Idle,
    /// Both directions running
    Bridging,
    /// All resources released
    Closed,
}

/// Owns one session and one browser connection until either side ends.
pub struct SessionBridge<C: TerminalConnection> {
    session: Session,
    connection: C,
    chunk_size: usize,
    state: BridgeState,
}

impl<C: TerminalConnection> SessionBridge<C> {
    pub fn new(session: Session, connection: C, chunk_size: usize) -> Self {
        Self {
            session,
            connection,
            chunk_size: chunk_size.max(1),
            state: BridgeState::Idle,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Copy in both directions until one of them stops, then release the
    /// socket and the transport.
    pub async fn run(self) {
        let Self {
            session,
            connection,
            chunk_size,
            mut state,
        } = self;
        let Session {
            id,
            mut transport,
            shell,
        } = session;
        let connection_id = connection.id().to_string();

        advance(&id, &mut state, BridgeState::Bridging);
        info!(session_id = %id, connection_id = %connection_id, "Bridging terminal session");

        let (sink, source) = connection.split();
        let cancel = CancellationToken::new();

        let ((mut sink, outbound), inbound) = tokio::join!(
            forward_shell_output(shell.output, sink, chunk_size, &cancel),
            forward_browser_input(source, shell.input, &cancel),
        );

        match outbound {
            Ok(()) => debug!(session_id = %id, "Shell output direction finished"),
            Err(e) => debug!(session_id = %id, error = %e, "Shell output direction failed"),
        }
        match inbound {
            Ok(()) => debug!(session_id = %id, "Browser input direction finished"),
            Err(e) => debug!(session_id = %id, error = %e, "Browser input direction failed"),
        }

        if let Err(e) = sink.close().await {
            debug!(session_id = %id, error = %e, "Browser socket already closed");
        }
        transport.close().await;

        advance(&id, &mut state, BridgeState::Closed);
        info!(session_id = %id, connection_id = %connection_id, "Terminal session closed");
    }
}

fn advance(session_id: &str, state: &mut BridgeState, next: BridgeState) {
    debug!(session_id = %session_id, from = ?*state, to = ?next, "Bridge state change");
    *state = next;
}

/// Shell → browser. Hands the sink back so the caller can close it.
async fn forward_shell_output<S: FrameSink>(
    mut output: ShellOutput,
    mut sink: S,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> (S, Result<(), StreamError>) {
    let _stop_other_direction = cancel.clone().drop_guard();
    let mut buffer = vec![0u8; chunk_size];

    let result = loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => break Ok(()),
            read = output.read(&mut buffer) => read,
        };
        let n = match read {
            Ok(0) => break Ok(()),
            Ok(n) => n,
            Err(e) => break Err(StreamError::Shell(e)),
        };

        let sent = tokio::select! {
            _ = cancel.cancelled() => break Ok(()),
            sent = send_chunk(&mut sink, &buffer[..n]) => sent,
        };
        if let Err(e) = sent {
            break Err(StreamError::Socket(e));
        }
    };

    (sink, result)
}

/// One read becomes one frame: text when the bytes are UTF-8, binary otherwise.
async fn send_chunk<S: FrameSink>(sink: &mut S, chunk: &[u8]) -> ConnectionResult<()> {
    match std::str::from_utf8(chunk) {
        Ok(text) => sink.send_text(text).await,
        Err(_) => sink.send_binary(chunk).await,
    }
}

/// Browser → shell
async fn forward_browser_input<R: FrameSource>(
    mut source: R,
    mut input: ShellInput,
    cancel: &CancellationToken,
) -> Result<(), StreamError> {
    let _stop_other_direction = cancel.clone().drop_guard();

    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            message = source.receive() => message,
        };
        let payload = match message {
            Some(Ok(TerminalMessage::Text(text))) => text.into_bytes(),
            Some(Ok(TerminalMessage::Binary(data))) => data,
            Some(Ok(TerminalMessage::Ping(_) | TerminalMessage::Pong(_))) => continue,
            Some(Ok(TerminalMessage::Close)) | None => return Ok(()),
            Some(Err(e)) => return Err(StreamError::Socket(e)),
        };
        if payload.is_empty() {
            continue;
        }

        let written = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            written = write_payload(&mut input, &payload) => written,
        };
        written?;
    }
}

async fn write_payload(input: &mut ShellInput, payload: &[u8]) -> std::io::Result<()> {
    input.write_all(payload).await?;
    input.flush().await
}
