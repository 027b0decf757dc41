use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::command::{self, CommandOrigin, CommandOutcome};
use crate::AppState;

#[derive(Deserialize)]
pub struct CommandRequest {
    pub origin: CommandOrigin,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Host-side bridge for the `_whitelist` chat command: the host forwards the
/// invocation origin and argument vector, and relays the reply (if any) back
/// to the issuer.
pub async fn run_command(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CommandRequest>,
) -> Json<CommandOutcome> {
    let config = state.config.read().await;
    Json(command::dispatch(&config, &payload.origin, &payload.args))
}
