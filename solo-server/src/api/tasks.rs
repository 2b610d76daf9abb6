//! Task endpoints
//!
//! Endpoints:
//! - POST /api/tasks/add
//! - POST /api/tasks/toggle/{index}
//! - POST /api/tasks/delete/{index}
//! - POST /api/tasks/edit/{index}
//! - POST /api/tasks/mark_overdue/{index}

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::atomic::Ordering;

use solo_core::entries::{self, NewTask};
use solo_core::record::Task;
use solo_core::{toggle_task, PlayerRecord};

use super::error::ApiResult;
use super::extract::{ApiJson, ApiPath};
use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/tasks/add", post(add_task))
        .route("/api/tasks/toggle/{index}", post(toggle))
        .route("/api/tasks/delete/{index}", post(delete_task))
        .route("/api/tasks/edit/{index}", post(edit_task))
        .route("/api/tasks/mark_overdue/{index}", post(mark_overdue))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

impl From<PlayerRecord> for TasksResponse {
    fn from(record: PlayerRecord) -> Self {
        Self {
            tasks: record.tasks,
        }
    }
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub ok: bool,
    pub data: PlayerRecord,
}

#[derive(Serialize)]
pub struct OverdueResponse {
    pub ok: bool,
    /// True only the first time the task is flagged
    pub failed: bool,
}

// ============================================================================
// Handlers
// ============================================================================

async fn add_task(
    State(state): State<ApiState>,
    ApiJson(req): ApiJson<NewTask>,
) -> ApiResult<Json<TasksResponse>> {
    let (_, record) = state
        .mutate(|record, now| entries::add_task(record, req, now))
        .await?;
    Ok(Json(record.into()))
}

async fn toggle(
    State(state): State<ApiState>,
    ApiPath(index): ApiPath<usize>,
) -> ApiResult<Json<ToggleResponse>> {
    let (outcome, record) = state
        .mutate(|record, _| toggle_task(record, index))
        .await?;
    if outcome.done {
        state.metrics.tasks_completed.fetch_add(1, Ordering::Relaxed);
    }
    Ok(Json(ToggleResponse {
        ok: true,
        data: record,
    }))
}

async fn delete_task(
    State(state): State<ApiState>,
    ApiPath(index): ApiPath<usize>,
) -> ApiResult<Json<TasksResponse>> {
    let (_, record) = state
        .mutate(|record, _| entries::delete_task(record, index))
        .await?;
    Ok(Json(record.into()))
}

async fn edit_task(
    State(state): State<ApiState>,
    ApiPath(index): ApiPath<usize>,
    ApiJson(req): ApiJson<NewTask>,
) -> ApiResult<Json<TasksResponse>> {
    let (_, record) = state
        .mutate(|record, _| entries::edit_task(record, index, req))
        .await?;
    Ok(Json(record.into()))
}

async fn mark_overdue(
    State(state): State<ApiState>,
    ApiPath(index): ApiPath<usize>,
) -> ApiResult<Json<OverdueResponse>> {
    let (newly, _) = state
        .mutate(|record, _| entries::mark_task_failed(record, index))
        .await?;
    Ok(Json(OverdueResponse {
        ok: true,
        failed: newly,
    }))
}
