use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::GateError;
use crate::gate::{self, GateDecision, NOT_WHITELISTED_MESSAGE};
use crate::AppState;

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub uuid: String,
    pub name: String,
}

/// Connect-event consumer: the host posts every connecting player here and
/// applies the returned decision (disconnect on deny).
pub async fn check_connect(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ConnectRequest>,
) -> impl IntoResponse {
    if payload.uuid.parse::<Uuid>().is_err() {
        return GateError::BadRequest(format!("invalid player uuid: {}", payload.uuid))
            .into_response();
    }

    match gate::process_connect(&state.store, &payload.uuid, &payload.name).await {
        Ok(GateDecision::Allow) => Json(json!({ "allowed": true })).into_response(),
        Ok(GateDecision::Deny { message }) => {
            Json(json!({ "allowed": false, "message": message })).into_response()
        }
        Err(e) => {
            // Deny-by-default: a failed lookup must never let a player in.
            tracing::error!("gate check failed for {}: {e}", payload.uuid);
            Json(json!({ "allowed": false, "message": NOT_WHITELISTED_MESSAGE })).into_response()
        }
    }
}
