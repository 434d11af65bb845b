/// Server management for the web SSH bridge
mod server;

pub use self::server::{build_router, run_server, shutdown_signal};
