use std::time::Duration;

use thiserror::Error;

/// Failure while bringing up a session. The display text is what the browser sees.
#[derive(Error, Debug)]
pub enum EstablishError {
    #[error("SSH connect failed: {0}")]
    Dial(#[source] std::io::Error),

    #[error("SSH connect failed: timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("SSH connect failed: handshake error: {0}")]
    Handshake(#[source] russh::Error),

    #[error("SSH connect failed: host key for {address} is not trusted")]
    HostKeyRejected { address: String },

    #[error("SSH connect failed: authentication rejected for user {user}")]
    Authentication { user: String },

    #[error("SSH session failed: {0}")]
    Session(String),

    #[error("Failed to start shell: {0}")]
    Shell(String),
}

impl EstablishError {
    /// Short name of the step that failed, for logs
    pub fn stage(&self) -> &'static str {
        match self {
            EstablishError::Dial(_) => "dial",
            EstablishError::Timeout(_) => "timeout",
            EstablishError::Handshake(_) | EstablishError::HostKeyRejected { .. } => "handshake",
            EstablishError::Authentication { .. } => "auth",
            EstablishError::Session(_) => "session",
            EstablishError::Shell(_) => "shell",
        }
    }
}
