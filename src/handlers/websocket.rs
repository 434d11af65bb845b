use axum::{
    Json,
    extract::{
        Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    api::dto::{ErrorResponse, UpgradeQuery},
    app_state::AppState,
    protocol::WebSocketConnection,
    service::handle_terminal_session,
    ssh::ConnectionDescriptor,
};

/// Upgrade a socket for the descriptor behind `?token=`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<UpgradeQuery>,
    State(state): State<AppState>,
) -> Response {
    let Some(descriptor) = state.pending.take(&query.token).await else {
        warn!("Socket upgrade with unknown or expired token");
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Unknown or expired session token")),
        )
            .into_response();
    };

    let connection_id = Uuid::new_v4().to_string();
    ws.on_upgrade(move |socket| handle_socket(socket, connection_id, descriptor, state))
}

pub async fn handle_socket(
    socket: WebSocket,
    connection_id: String,
    descriptor: ConnectionDescriptor,
    state: AppState,
) {
    let connection = WebSocketConnection::new(socket, connection_id);
    handle_terminal_session(
        connection,
        descriptor,
        state.establisher.as_ref(),
        state.chunk_size(),
    )
    .await;
}
