//! Whole-record, stats and daily check-in endpoints
//!
//! Endpoints:
//! - GET  /api/data
//! - GET  /api/stats
//! - POST /api/ping
//! - POST /api/reset

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::Ordering;
use tracing::info;

use solo_core::record::{Counters, OngoingPunishment, Shop};
use solo_core::{check_in, seed_record, CheckInState, PlayerRecord, StatProgress};

use super::error::ApiResult;
use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/data", get(get_data))
        .route("/api/stats", get(get_stats))
        .route("/api/ping", post(ping))
        .route("/api/reset", post(reset))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// `missed_day` and `punishment` are fixed; lapses are reported by `/api/ping`.
#[derive(Serialize)]
pub struct DataResponse {
    pub data: PlayerRecord,
    pub missed_day: bool,
    pub punishment: Option<String>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub stats: Counters,
    pub attributes: BTreeMap<String, i64>,
    pub stat_progress: BTreeMap<String, StatProgress>,
}

#[derive(Serialize)]
pub struct PingResponse {
    pub streak: u32,
    /// Punishment drawn by this ping, if the streak lapsed
    pub punishment: Option<String>,
    pub shop: Shop,
    pub ongoing_punishments: VecDeque<OngoingPunishment>,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub data: PlayerRecord,
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_data(State(state): State<ApiState>) -> ApiResult<Json<DataResponse>> {
    let data = state.read().await?;
    Ok(Json(DataResponse {
        data,
        missed_day: false,
        punishment: None,
    }))
}

async fn get_stats(State(state): State<ApiState>) -> ApiResult<Json<StatsResponse>> {
    let record = state.read().await?;
    Ok(Json(StatsResponse {
        stats: record.stats,
        attributes: record.attributes,
        stat_progress: record.stat_progress,
    }))
}

async fn ping(State(state): State<ApiState>) -> ApiResult<Json<PingResponse>> {
    let (outcome, record) = state
        .mutate_with(|record, now, rng| {
            let outcome = check_in(record, now, rng);
            let changed = outcome.changed();
            Ok((outcome, changed))
        })
        .await?;

    if outcome.changed() {
        state.metrics.check_ins.fetch_add(1, Ordering::Relaxed);
    }
    if matches!(outcome.previous, CheckInState::Lapsed { .. }) {
        state.metrics.lapses.fetch_add(1, Ordering::Relaxed);
    }

    Ok(Json(PingResponse {
        streak: outcome.streak,
        punishment: outcome.triggered_punishment,
        shop: record.shop,
        ongoing_punishments: record.ongoing_punishments,
    }))
}

async fn reset(State(state): State<ApiState>) -> ApiResult<Json<ResetResponse>> {
    let data = seed_record(state.clock.now());
    state.replace(&data).await?;
    info!("Record reset to seed");
    Ok(Json(ResetResponse {
        status: "reset",
        data,
    }))
}
