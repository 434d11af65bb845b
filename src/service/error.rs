/// Error types for the service layer
use thiserror::Error;

use crate::protocol::ConnectionError;

/// Why one direction of a bridge stopped early.
///
/// Never shown to the user: a dropped socket and a closed terminal look the same.
#[derive(Error, Debug)]
pub enum StreamError {
    /// Browser socket failed
    #[error("socket error: {0}")]
    Socket(#[from] ConnectionError),

    /// Shell stream failed
    #[error("shell stream error: {0}")]
    Shell(#[from] std::io::Error),
}
