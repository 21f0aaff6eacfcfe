//! Route handlers

use axum::{
    extract::{ws::rejection::WebSocketUpgradeRejection, State, WebSocketUpgrade},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use super::{socket, AppState};
use crate::error::Error;
use crate::health::HealthDocument;

pub const NOT_A_WEBSOCKET: &str = "Request must be a WebSocket connection";

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthDocument> {
    Json(state.health.as_ref().clone())
}

/// `GET /ws/gateway`
pub async fn gateway(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<AppState>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            warn!(%rejection, "Refusing gateway request without a WebSocket upgrade");
            return (
                StatusCode::UPGRADE_REQUIRED,
                [(header::UPGRADE, "websocket")],
                NOT_A_WEBSOCKET,
            )
                .into_response();
        }
    };

    ws.on_upgrade(move |socket| socket::handle_connection(socket, state))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            // The reason stays in the log; clients only learn the scheme
            Error::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                "Unauthorized",
            )
                .into_response(),
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
