/// Connection descriptor: where and as whom to open one terminal session
use std::fmt;

use thiserror::Error;

pub const DEFAULT_SSH_PORT: &str = "22";

/// Rejection of a descriptor before any network action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Host is required")]
    MissingHost,

    #[error("Username is required")]
    MissingUser,

    #[error("Port must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
}

/// Validated target of one SSH session.
///
/// Host and user are never empty and the port always parses.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    host: String,
    port: String,
    port_number: u16,
    user: String,
    password: String,
}

impl ConnectionDescriptor {
    /// Validate raw form values. An empty port means [`DEFAULT_SSH_PORT`].
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let host = host.into();
        let mut port = port.into();
        let user = user.into();

        if port.is_empty() {
            port = DEFAULT_SSH_PORT.to_string();
        }
        if host.is_empty() {
            return Err(ValidationError::MissingHost);
        }
        if user.is_empty() {
            return Err(ValidationError::MissingUser);
        }
        let port_number = match port.parse::<u16>() {
            Ok(0) | Err(_) => return Err(ValidationError::InvalidPort(port)),
            Ok(n) => n,
        };

        Ok(Self {
            host,
            port,
            port_number,
            user,
            password: password.into(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn port_number(&self) -> u16 {
        self.port_number
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// `host:port`, with IPv6 literals bracketed
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
