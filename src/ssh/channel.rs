/// Adapters from a russh shell channel to plain byte streams
use bytes::Bytes;
use futures_util::Stream;
use russh::client::{self, Msg};
use russh::{Channel, ChannelMsg, Disconnect};
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::service::{ShellChannel, ShellTransport};
use crate::ssh::handler::ClientHandler;

/// Turn an open shell channel into stdin/stdout streams.
///
/// Extended data (stderr) is interleaved into the same output stream in
/// arrival order. A single read never spans two channel data messages.
pub fn into_shell_channel(channel: Channel<Msg>) -> ShellChannel {
    let input = channel.make_writer();
    let output = StreamReader::new(output_chunks(channel));
    ShellChannel::new(output, input)
}

fn output_chunks(channel: Channel<Msg>) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
    futures_util::stream::unfold(channel, |mut channel| async move {
        loop {
            match channel.wait().await? {
                ChannelMsg::Data { data } => {
                    return Some((Ok(Bytes::copy_from_slice(&data)), channel));
                }
                ChannelMsg::ExtendedData { data, .. } => {
                    return Some((Ok(Bytes::copy_from_slice(&data)), channel));
                }
                ChannelMsg::ExitStatus { exit_status } => {
                    debug!(exit_status, "Remote shell exited");
                }
                ChannelMsg::Eof | ChannelMsg::Close => return None,
                _ => {}
            }
        }
    })
}

/// Authenticated SSH connection backing one session
pub struct SshTransport {
    handle: client::Handle<ClientHandler>,
    address: String,
    closed: bool,
}

impl SshTransport {
    pub fn new(handle: client::Handle<ClientHandler>, address: String) -> Self {
        Self {
            handle,
            address,
            closed: false,
        }
    }
}

impl std::fmt::Debug for SshTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshTransport")
            .field("address", &self.address)
            .field("closed", &self.closed)
            .finish()
    }
}

#[async_trait::async_trait]
impl ShellTransport for SshTransport {
    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match self
            .handle
            .disconnect(Disconnect::ByApplication, "session closed", "en")
            .await
        {
            Ok(()) => debug!(address = %self.address, "SSH transport disconnected"),
            // Peer is usually gone already once the shell has exited.
            Err(e) => debug!(address = %self.address, error = %e, "SSH disconnect failed"),
        }
    }
}
