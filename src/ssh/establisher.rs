/// Transport establisher: dial, handshake, authenticate, start the shell
use std::sync::Arc;
use std::time::Duration;

use russh::client;
use russh::{Channel, Disconnect};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{HostKeyPolicy, SshConfig};
use crate::service::Session;
use crate::ssh::channel::{SshTransport, into_shell_channel};
use crate::ssh::handler::ClientHandler;
use crate::ssh::{ConnectionDescriptor, EstablishError};

/// Produces a ready [`Session`] for a descriptor
#[async_trait::async_trait]
pub trait Establisher: Send + Sync {
    async fn establish(&self, descriptor: &ConnectionDescriptor) -> Result<Session, EstablishError>;
}

/// Establisher backed by russh
pub struct SshEstablisher {
    settings: SshConfig,
    client_config: Arc<client::Config>,
}

impl SshEstablisher {
    pub fn new(settings: SshConfig) -> Self {
        let client_config = Arc::new(client::Config {
            inactivity_timeout: None,
            ..Default::default()
        });
        Self {
            settings,
            client_config,
        }
    }

    fn connect_timeout(&self) -> Duration {
        self.settings.connect_timeout()
    }

    fn policy(&self) -> HostKeyPolicy {
        self.settings.host_key_policy
    }

    /// Pinned fingerprint for this target, looked up case-insensitively on the host
    fn pinned_fingerprint(&self, descriptor: &ConnectionDescriptor) -> Option<String> {
        let wanted = descriptor.address().to_ascii_lowercase();
        self.settings
            .trusted_host_keys
            .iter()
            .find(|(address, _)| address.to_ascii_lowercase() == wanted)
            .map(|(_, fingerprint)| fingerprint.clone())
    }

    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<client::Handle<ClientHandler>, EstablishError> {
        let address = descriptor.address();
        let stream = TcpStream::connect((descriptor.host(), descriptor.port_number()))
            .await
            .map_err(EstablishError::Dial)?;
        stream.set_nodelay(true).map_err(EstablishError::Dial)?;
        debug!(address = %address, "TCP connection established");

        let handler = ClientHandler::new(
            address.clone(),
            self.policy(),
            self.pinned_fingerprint(descriptor),
        );
        client::connect_stream(self.client_config.clone(), stream, handler)
            .await
            .map_err(|e| match e {
                russh::Error::UnknownKey => EstablishError::HostKeyRejected { address },
                other => EstablishError::Handshake(other),
            })
    }

    /// Password auth, session channel and shell request on a connected handle
    async fn start_shell(
        &self,
        handle: &mut client::Handle<ClientHandler>,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Channel<client::Msg>, EstablishError> {
        let auth = handle
            .authenticate_password(descriptor.user(), descriptor.password())
            .await
            .map_err(EstablishError::Handshake)?;
        if !auth.success() {
            return Err(EstablishError::Authentication {
                user: descriptor.user().to_string(),
            });
        }
        debug!("Password authentication succeeded");

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| EstablishError::Session(e.to_string()))?;

        channel
            .request_shell(true)
            .await
            .map_err(|e| EstablishError::Shell(e.to_string()))?;
        Ok(channel)
    }

    async fn open(&self, descriptor: &ConnectionDescriptor) -> Result<Session, EstablishError> {
        let mut handle = self.connect(descriptor).await?;

        let channel = match self.start_shell(&mut handle, descriptor).await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(disconnect) = handle
                    .disconnect(Disconnect::ByApplication, "session setup failed", "en")
                    .await
                {
                    debug!(error = %disconnect, "SSH disconnect after failed setup");
                }
                return Err(e);
            }
        };

        let id = Uuid::new_v4().to_string();
        info!(session_id = %id, "Remote shell started");

        Ok(Session::new(
            id,
            Box::new(SshTransport::new(handle, descriptor.address())),
            into_shell_channel(channel),
        ))
    }
}

#[async_trait::async_trait]
impl Establisher for SshEstablisher {
    #[instrument(skip_all, fields(address = %descriptor.address(), user = %descriptor.user()))]
    async fn establish(&self, descriptor: &ConnectionDescriptor) -> Result<Session, EstablishError> {
        let timeout = self.connect_timeout();
        tokio::time::timeout(timeout, self.open(descriptor))
            .await
            .map_err(|_| EstablishError::Timeout(timeout))?
    }
}
