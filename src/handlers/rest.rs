/// Page and form handlers
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{info, warn};

use crate::{
    api::dto::{ConnectForm, ErrorResponse, HealthResponse},
    app_state::AppState,
    ssh::ConnectionDescriptor,
};

const FORM_PAGE: &str = include_str!("../../assets/form.html");
const TERMINAL_PAGE: &str = include_str!("../../assets/terminal.html");
const TOKEN_PLACEHOLDER: &str = "{{token}}";

/// Credential form
pub async fn serve_form() -> Html<&'static str> {
    Html(FORM_PAGE)
}

/// Validate the posted credentials and hand out a terminal page bound to them
pub async fn connect(State(state): State<AppState>, Form(form): Form<ConnectForm>) -> Response {
    info!(host = %form.host, port = %form.port, user = %form.user, "Received connection request");

    let descriptor = match ConnectionDescriptor::new(form.host, form.port, form.user, form.password) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!(error = %e, "Rejected connection request");
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response();
        }
    };

    let address = descriptor.address();
    let token = state.pending.insert(descriptor).await;
    info!(address = %address, "Issued connect token");

    Html(render_terminal_page(&token)).into_response()
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        pending: state.pending.len().await,
    })
}

/// Tokens are UUIDs, so no escaping is needed
fn render_terminal_page(token: &str) -> String {
    TERMINAL_PAGE.replace(TOKEN_PLACEHOLDER, token)
}
