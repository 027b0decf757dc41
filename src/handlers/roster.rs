use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::GateError;
use crate::models::player::{
    MoveStatusRequest, PlayerRecord, PlayerStatus, ResolvedStatus, UpsertPlayerRequest,
};
use crate::resolver;
use crate::utils::expiry_from_duration;
use crate::AppState;

#[derive(Deserialize)]
pub struct PlayerFilter {
    name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/whitelist",
    responses(
        (status = 200, description = "List whitelisted players", body = Vec<PlayerRecord>)
    ),
    security(
        ("api_token" = [])
    )
)]
pub async fn list_whitelist(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlayerRecord>>, GateError> {
    let players = state.store.list_by_status(PlayerStatus::Whitelisted).await?;
    Ok(Json(players))
}

#[utoipa::path(
    get,
    path = "/api/blacklist",
    responses(
        (status = 200, description = "List blacklisted players", body = Vec<PlayerRecord>)
    ),
    security(
        ("api_token" = [])
    )
)]
pub async fn list_blacklist(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlayerRecord>>, GateError> {
    let players = state.store.list_by_status(PlayerStatus::Blacklisted).await?;
    Ok(Json(players))
}

#[utoipa::path(
    post,
    path = "/api/whitelist",
    request_body = UpsertPlayerRequest,
    responses(
        (status = 201, description = "Player whitelisted"),
        (status = 400, description = "Bad request")
    ),
    security(
        ("api_token" = [])
    )
)]
pub async fn add_whitelist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpsertPlayerRequest>,
) -> Result<impl IntoResponse, GateError> {
    upsert_player(&state, PlayerStatus::Whitelisted, payload).await
}

#[utoipa::path(
    post,
    path = "/api/blacklist",
    request_body = UpsertPlayerRequest,
    responses(
        (status = 201, description = "Player blacklisted"),
        (status = 400, description = "Bad request")
    ),
    security(
        ("api_token" = [])
    )
)]
pub async fn add_blacklist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpsertPlayerRequest>,
) -> Result<impl IntoResponse, GateError> {
    upsert_player(&state, PlayerStatus::Blacklisted, payload).await
}

async fn upsert_player(
    state: &AppState,
    status: PlayerStatus,
    payload: UpsertPlayerRequest,
) -> Result<impl IntoResponse, GateError> {
    if payload.uuid.parse::<Uuid>().is_err() {
        return Err(GateError::BadRequest(format!(
            "invalid player uuid: {}",
            payload.uuid
        )));
    }

    let expiry = expiry_from_duration(payload.duration.as_deref())
        .ok_or_else(|| GateError::BadRequest(format!("invalid duration: {:?}", payload.duration)))?;

    let record = PlayerRecord::new(payload.uuid, payload.name, expiry);
    state.store.upsert(status, &record).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": format!("{} added to {}", record.name, status.table()) })),
    ))
}

pub async fn lookup_player(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> Result<Json<ResolvedStatus>, GateError> {
    match resolver::resolve(&state.store, &uuid).await? {
        ResolvedStatus::Unknown => Err(GateError::NotFound),
        resolved => Ok(Json(resolved)),
    }
}

pub async fn lookup_player_by_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlayerFilter>,
) -> Result<Json<ResolvedStatus>, GateError> {
    let name = params
        .name
        .ok_or_else(|| GateError::BadRequest("missing name query parameter".to_string()))?;

    let found = state.store.lookup_by_name(&name).await?;
    match ResolvedStatus::from_lookup(found) {
        ResolvedStatus::Unknown => Err(GateError::NotFound),
        resolved => Ok(Json(resolved)),
    }
}

/// The transactional status change: delete-then-insert in one transaction,
/// so a uuid can never end up in both tables.
pub async fn move_player_status(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    Json(payload): Json<MoveStatusRequest>,
) -> Result<impl IntoResponse, GateError> {
    let expiry = expiry_from_duration(payload.duration.as_deref())
        .ok_or_else(|| GateError::BadRequest(format!("invalid duration: {:?}", payload.duration)))?;

    let moved = state.store.move_status(&uuid, payload.status, expiry).await?;
    if !moved {
        return Err(GateError::NotFound);
    }

    Ok(Json(json!({ "message": format!("{uuid} moved to {}", payload.status.table()) })))
}
