/// Application state implementation
use std::sync::Arc;

use crate::app_state::PendingConnections;
use crate::config::WebSshConfig;
use crate::ssh::{Establisher, SshEstablisher};

/// Application state containing shared data across handlers
#[derive(Clone)]
pub struct AppState {
    /// Descriptors waiting for their socket upgrade, keyed by connect token
    pub pending: PendingConnections,
    /// Opens SSH sessions for upgraded sockets
    pub establisher: Arc<dyn Establisher>,
    /// Application configuration
    pub config: Arc<WebSshConfig>,
}

impl AppState {
    /// Create a new instance of AppState backed by the russh establisher
    pub fn new(config: WebSshConfig) -> Self {
        let establisher = Arc::new(SshEstablisher::new(config.ssh.clone()));
        Self::with_establisher(config, establisher)
    }

    /// Create state with a custom establisher
    pub fn with_establisher(config: WebSshConfig, establisher: Arc<dyn Establisher>) -> Self {
        Self {
            pending: PendingConnections::new(config.sessions.token_ttl()),
            establisher,
            config: Arc::new(config),
        }
    }

    /// Bytes read from the shell per outbound frame at most
    pub fn chunk_size(&self) -> usize {
        self.config.ssh.read_chunk_size
    }
}
