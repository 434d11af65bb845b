/// SSH side of a terminal session
mod channel;
mod descriptor;
mod error;
mod establisher;
mod handler;

pub use channel::{SshTransport, into_shell_channel};
pub use descriptor::{ConnectionDescriptor, DEFAULT_SSH_PORT, ValidationError};
pub use error::EstablishError;
pub use establisher::{Establisher, SshEstablisher};
pub use handler::{ClientHandler, HostKeyVerdict, judge_host_key};
