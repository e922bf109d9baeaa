use std::sync::Arc;

use axum::{
    Json, debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::ServerState;

#[debug_handler]
pub(crate) async fn health_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.db.ping().await {
        Ok(()) => Json(json!({ "success": true, "status": "ok" })).into_response(),
        Err(err) => {
            warn!("Health check failed: {err}");

            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "message": "Database unreachable" })),
            )
                .into_response()
        }
    }
}
