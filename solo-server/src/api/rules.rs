//! Non-negotiable rule endpoints
//!
//! Endpoints:
//! - POST /api/nonneg/add
//! - POST /api/nonneg/edit/{index}
//! - POST /api/nonneg/delete/{index}
//!
//! All three answer with the whole record, which the front end re-renders.

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use solo_core::{entries, PlayerRecord};

use super::error::ApiResult;
use super::extract::{ApiJson, ApiPath};
use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/nonneg/add", post(add))
        .route("/api/nonneg/edit/{index}", post(edit))
        .route("/api/nonneg/delete/{index}", post(delete))
}

#[derive(Deserialize)]
pub struct RuleRequest {
    #[serde(default)]
    pub rule: String,
}

#[derive(Serialize)]
pub struct RecordResponse {
    pub ok: bool,
    pub data: PlayerRecord,
}

impl From<PlayerRecord> for RecordResponse {
    fn from(data: PlayerRecord) -> Self {
        Self { ok: true, data }
    }
}

async fn add(
    State(state): State<ApiState>,
    ApiJson(req): ApiJson<RuleRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let (_, record) = state
        .mutate(|record, now| entries::add_rule(record, &req.rule, now))
        .await?;
    Ok(Json(record.into()))
}

async fn edit(
    State(state): State<ApiState>,
    ApiPath(index): ApiPath<usize>,
    ApiJson(req): ApiJson<RuleRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let (_, record) = state
        .mutate(|record, now| entries::edit_rule(record, index, &req.rule, now))
        .await?;
    Ok(Json(record.into()))
}

async fn delete(
    State(state): State<ApiState>,
    ApiPath(index): ApiPath<usize>,
) -> ApiResult<Json<RecordResponse>> {
    let (_, record) = state
        .mutate(|record, _| entries::delete_rule(record, index))
        .await?;
    Ok(Json(record.into()))
}
