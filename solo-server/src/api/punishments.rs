//! Punishment pool endpoints
//!
//! Endpoints:
//! - GET  /api/punishments
//! - POST /api/punishments/add
//! - POST /api/punishments/delete/{index}

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use solo_core::entries;

use super::error::ApiResult;
use super::extract::{ApiJson, ApiPath};
use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/punishments", get(list))
        .route("/api/punishments/add", post(add))
        .route("/api/punishments/delete/{index}", post(delete))
}

#[derive(Deserialize)]
pub struct AddPunishmentRequest {
    #[serde(default)]
    pub punishment: String,
}

#[derive(Serialize)]
pub struct PunishmentsResponse {
    pub punishments: Vec<String>,
}

async fn list(State(state): State<ApiState>) -> ApiResult<Json<PunishmentsResponse>> {
    let record = state.read().await?;
    Ok(Json(PunishmentsResponse {
        punishments: record.punishments,
    }))
}

async fn add(
    State(state): State<ApiState>,
    ApiJson(req): ApiJson<AddPunishmentRequest>,
) -> ApiResult<Json<PunishmentsResponse>> {
    let (_, record) = state
        .mutate(|record, _| entries::add_punishment(record, &req.punishment))
        .await?;
    Ok(Json(PunishmentsResponse {
        punishments: record.punishments,
    }))
}

async fn delete(
    State(state): State<ApiState>,
    ApiPath(index): ApiPath<usize>,
) -> ApiResult<Json<PunishmentsResponse>> {
    let (_, record) = state
        .mutate(|record, _| entries::delete_punishment(record, index))
        .await?;
    Ok(Json(PunishmentsResponse {
        punishments: record.punishments,
    }))
}
