/// Terminal session handler: establish, then bridge or report
use tracing::{debug, info, warn};

use crate::protocol::{FrameSink, TerminalConnection};
use crate::service::SessionBridge;
use crate::ssh::{ConnectionDescriptor, EstablishError, Establisher};

/// Run one terminal session on an upgraded browser connection.
///
/// An establishment failure is reported as a single text frame, after which
/// the connection is closed.
pub async fn handle_terminal_session(
    connection: impl TerminalConnection,
    descriptor: ConnectionDescriptor,
    establisher: &dyn Establisher,
    chunk_size: usize,
) {
    let conn_id = connection.id().to_string();
    info!(
        connection_id = %conn_id,
        address = %descriptor.address(),
        user = %descriptor.user(),
        "New terminal connection"
    );

    match establisher.establish(&descriptor).await {
        Ok(session) => {
            SessionBridge::new(session, connection, chunk_size).run().await;
        }
        Err(e) => {
            warn!(connection_id = %conn_id, stage = e.stage(), error = %e, "Failed to establish SSH session");
            report_failure(connection, &e).await;
        }
    }
}

async fn report_failure(connection: impl TerminalConnection, error: &EstablishError) {
    let conn_id = connection.id().to_string();
    let (mut sink, _source) = connection.split();

    if let Err(e) = sink.send_text(&error.to_string()).await {
        debug!(connection_id = %conn_id, error = %e, "Could not deliver failure message");
    }
    if let Err(e) = sink.close().await {
        debug!(connection_id = %conn_id, error = %e, "Failed to close connection");
    }
}
