//! Diary, display name and settings endpoints
//!
//! Endpoints:
//! - POST /api/diary/add
//! - POST /api/name
//! - POST /api/settings

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use solo_core::entries;
use solo_core::record::DiaryEntry;

use super::error::ApiResult;
use super::extract::ApiJson;
use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/diary/add", post(add_entry))
        .route("/api/name", post(set_name))
        .route("/api/settings", post(update_settings))
}

#[derive(Deserialize)]
pub struct DiaryRequest {
    #[serde(default)]
    pub entry: String,
}

#[derive(Serialize)]
pub struct DiaryResponse {
    pub diary: Vec<DiaryEntry>,
}

#[derive(Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
pub struct NameResponse {
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct SettingsResponse {
    pub settings: Map<String, Value>,
}

async fn add_entry(
    State(state): State<ApiState>,
    ApiJson(req): ApiJson<DiaryRequest>,
) -> ApiResult<Json<DiaryResponse>> {
    let (_, record) = state
        .mutate(|record, now| entries::add_diary_entry(record, &req.entry, now))
        .await?;
    Ok(Json(DiaryResponse {
        diary: record.diary,
    }))
}

async fn set_name(
    State(state): State<ApiState>,
    ApiJson(req): ApiJson<NameRequest>,
) -> ApiResult<Json<NameResponse>> {
    let (_, record) = state
        .mutate(|record, _| entries::set_name(record, &req.name))
        .await?;
    Ok(Json(NameResponse { name: record.name }))
}

async fn update_settings(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<SettingsResponse>> {
    let (_, record) = state
        .mutate(|record, _| entries::update_settings(record, body))
        .await?;
    Ok(Json(SettingsResponse {
        settings: record.settings,
    }))
}
