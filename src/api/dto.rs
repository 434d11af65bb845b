/// Data Transfer Objects (DTOs) for HTTP endpoints
use serde::{Deserialize, Serialize};

/// Credential form posted to `/connect`
///
/// Missing fields deserialize as empty so validation reports them by name.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ConnectForm {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for ConnectForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectForm")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Query string of the socket upgrade
#[derive(Debug, Deserialize)]
pub struct UpgradeQuery {
    #[serde(default)]
    pub token: String,
}

/// Error response DTO
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response DTO
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Connect tokens issued but not yet used
    pub pending: usize,
}
