/// Application state management for the web SSH bridge
mod app_state;
mod pending;

pub use self::app_state::AppState;
pub use pending::PendingConnections;
