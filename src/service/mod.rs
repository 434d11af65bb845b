/// Service layer: sessions and the bridge that runs them
mod bridge;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod session;
mod session_handler;

pub use bridge::{BridgeState, SessionBridge};
pub use error::StreamError;
pub use session::{Session, ShellChannel, ShellInput, ShellOutput, ShellTransport};
pub use session_handler::handle_terminal_session;
