//! Browser terminal for a single SSH session.
//!
//! `/connect` validates credentials and issues a single-use token; `/ws?token=`
//! upgrades to a WebSocket whose frames are bridged to a remote shell.
pub mod api;
pub mod app_state;
pub mod config;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod service;
pub mod ssh;
