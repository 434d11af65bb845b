/// Main entry point for the web SSH bridge
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use rs_webssh::app_state::AppState;
use rs_webssh::config::{ConfigLoader, HostKeyPolicy, init_logging};
use rs_webssh::server::{build_router, run_server, shutdown_signal};

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Override server.http_port
    #[clap(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    // Load configuration
    let mut config = ConfigLoader::new()
        .load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.http_port = port;
    }

    // Initialize logging
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    if config.ssh.host_key_policy == HostKeyPolicy::AcceptAny {
        tracing::warn!("ssh.host_key_policy = accept-any: remote hosts are not authenticated");
    }
    info!(
        trusted_host_keys = config.ssh.trusted_host_keys.len(),
        read_chunk_size = config.ssh.read_chunk_size,
        "Configuration loaded"
    );

    let addr = SocketAddr::new(config.server.bind_address, config.server.http_port);
    let app_state = AppState::new(config);

    // Build router and run server
    let app = build_router(app_state);
    run_server(app, addr, shutdown_signal())
        .await
        .with_context(|| format!("Server on {} failed", addr))?;
    Ok(())
}
