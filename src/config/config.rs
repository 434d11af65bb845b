/// Configuration data structures for rs_webssh
use serde::Deserialize;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use super::ConfigError;

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WebSshConfig {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Outbound SSH settings
    pub ssh: SshConfig,

    /// Connect-token hand-off between `/connect` and `/ws`
    pub sessions: SessionsConfig,

    /// Logging output
    pub logging: LoggingConfig,
}

impl WebSshConfig {
    /// Reject values that would make sessions unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssh.read_chunk_size == 0 {
            return Err(ConfigError::InvalidStructure(
                "ssh.read_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.sessions.token_ttl_secs == 0 {
            return Err(ConfigError::InvalidStructure(
                "sessions.token_ttl_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: IpAddr,
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: 8080,
        }
    }
}

/// How the server key presented during the SSH handshake is judged
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyPolicy {
    /// Only keys listed in `trusted_host_keys` are accepted
    #[default]
    Pinned,
    /// Every key is accepted. Development only.
    AcceptAny,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SshConfig {
    /// Size of the buffer used for each read from the shell output
    pub read_chunk_size: usize,

    /// Upper bound for the whole setup: dial, handshake, auth and shell request
    pub connect_timeout_secs: u64,

    pub host_key_policy: HostKeyPolicy,

    /// `"host:port"` to `SHA256:...` fingerprint
    pub trusted_host_keys: HashMap<String, String>,
}

impl SshConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: 1024,
            connect_timeout_secs: 10,
            host_key_policy: HostKeyPolicy::default(),
            trusted_host_keys: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionsConfig {
    /// Lifetime of a token issued by `/connect` before it is used by `/ws`
    pub token_ttl_secs: u64,
}

impl SessionsConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self { token_ttl_secs: 60 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines on stdout
    pub json: bool,

    /// Also write a daily rolling log file into this directory
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}
