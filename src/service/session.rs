/// An established terminal session, before it is attached to a browser socket
use std::fmt::Debug;
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncWrite};

/// Merged stdout and stderr of the remote shell
pub type ShellOutput = Pin<Box<dyn AsyncRead + Send>>;

/// Stdin of the remote shell
pub type ShellInput = Pin<Box<dyn AsyncWrite + Send>>;

/// The authenticated connection a shell runs over
#[async_trait::async_trait]
pub trait ShellTransport: Send + Debug {
    /// Tear the transport down. Calling it again is a no-op.
    async fn close(&mut self);
}

/// Byte streams of a running remote shell
pub struct ShellChannel {
    pub output: ShellOutput,
    pub input: ShellInput,
}

impl ShellChannel {
    pub fn new(
        output: impl AsyncRead + Send + 'static,
        input: impl AsyncWrite + Send + 'static,
    ) -> Self {
        Self {
            output: Box::pin(output),
            input: Box::pin(input),
        }
    }
}

/// Transport plus shell. Owned by exactly one bridge.
pub struct Session {
    pub id: String,
    pub transport: Box<dyn ShellTransport>,
    pub shell: ShellChannel,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        transport: Box<dyn ShellTransport>,
        shell: ShellChannel,
    ) -> Self {
        Self {
            id: id.into(),
            transport,
            shell,
        }
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
