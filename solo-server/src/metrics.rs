//! Server Metrics — request and progression counters with Prometheus + JSON export
//!
//! Uses lock-free atomics for all counters. No external metrics crate needed.
//!
//! ## Endpoints
//! - `GET /metrics` — Prometheus text format
//! - `GET /metrics/json` — JSON format (read by the load-test client)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::api::ApiState;
use crate::storage::repository::RecordStore;

/// Shared metrics state (all lock-free atomics)
#[derive(Debug)]
pub struct ServerMetrics {
    /// Total HTTP requests served
    pub total_requests: AtomicU64,
    /// Total request errors (4xx + 5xx)
    pub total_errors: AtomicU64,
    /// Cumulative request duration in microseconds (for computing average)
    pub total_duration_us: AtomicU64,
    /// Check-ins that advanced the day
    pub check_ins: AtomicU64,
    /// Check-ins that found a broken streak
    pub lapses: AtomicU64,
    /// Toggles that marked a task done
    pub tasks_completed: AtomicU64,
    pub purchases: AtomicU64,
    /// Server start time (for uptime calculation)
    pub start_time: Instant,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            total_duration_us: AtomicU64::new(0),
            check_ins: AtomicU64::new(0),
            lapses: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            purchases: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

impl ServerMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_request(&self, duration_us: u64, is_error: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_duration_us.fetch_add(duration_us, Ordering::Relaxed);
        if is_error {
            self.total_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn uptime_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn requests_per_second(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed) as f64;
        let uptime = self.uptime_secs();
        if uptime > 0.0 { total / uptime } else { 0.0 }
    }

    pub fn avg_duration_ms(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        let dur_us = self.total_duration_us.load(Ordering::Relaxed);
        if total > 0 {
            (dur_us as f64 / total as f64) / 1000.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// Axum Middleware — Automatic request tracking
// ============================================================================

/// Middleware that records request count and duration for every HTTP request.
pub async fn metrics_middleware(
    State(state): State<ApiState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let resp = next.run(req).await;
    let duration_us = start.elapsed().as_micros() as u64;
    let is_error = resp.status().is_client_error() || resp.status().is_server_error();

    state.metrics.record_request(duration_us, is_error);
    resp
}

// ============================================================================
// GET /metrics — Prometheus text exposition format
// ============================================================================

pub async fn prometheus_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let m = &state.metrics;
    let total_requests = m.total_requests.load(Ordering::Relaxed);
    let total_errors = m.total_errors.load(Ordering::Relaxed);
    let total_dur_us = m.total_duration_us.load(Ordering::Relaxed);
    let check_ins = m.check_ins.load(Ordering::Relaxed);
    let lapses = m.lapses.load(Ordering::Relaxed);
    let tasks_completed = m.tasks_completed.load(Ordering::Relaxed);
    let purchases = m.purchases.load(Ordering::Relaxed);
    let uptime = m.uptime_secs();
    let rps = m.requests_per_second();

    let avg_req_duration_s = if total_requests > 0 {
        (total_dur_us as f64 / total_requests as f64) / 1_000_000.0
    } else {
        0.0
    };

    let body = format!(
        "# HELP solo_requests_total Total HTTP requests served\n\
         # TYPE solo_requests_total counter\n\
         solo_requests_total {total_requests}\n\
         \n\
         # HELP solo_request_errors_total Total HTTP request errors (4xx/5xx)\n\
         # TYPE solo_request_errors_total counter\n\
         solo_request_errors_total {total_errors}\n\
         \n\
         # HELP solo_request_duration_seconds Average request duration\n\
         # TYPE solo_request_duration_seconds gauge\n\
         solo_request_duration_seconds {avg_req_duration_s:.6}\n\
         \n\
         # HELP solo_requests_per_second Current request throughput\n\
         # TYPE solo_requests_per_second gauge\n\
         solo_requests_per_second {rps:.2}\n\
         \n\
         # HELP solo_check_ins_total Check-ins that advanced the day\n\
         # TYPE solo_check_ins_total counter\n\
         solo_check_ins_total {check_ins}\n\
         \n\
         # HELP solo_streak_lapses_total Check-ins that found a broken streak\n\
         # TYPE solo_streak_lapses_total counter\n\
         solo_streak_lapses_total {lapses}\n\
         \n\
         # HELP solo_tasks_completed_total Tasks marked done\n\
         # TYPE solo_tasks_completed_total counter\n\
         solo_tasks_completed_total {tasks_completed}\n\
         \n\
         # HELP solo_purchases_total Shop purchases\n\
         # TYPE solo_purchases_total counter\n\
         solo_purchases_total {purchases}\n\
         \n\
         # HELP solo_uptime_seconds Server uptime\n\
         # TYPE solo_uptime_seconds gauge\n\
         solo_uptime_seconds {uptime:.2}\n",
    );

    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

// ============================================================================
// GET /metrics/json — JSON format for load-test clients
// ============================================================================

#[derive(Serialize)]
pub struct JsonMetrics {
    pub uptime_secs: f64,
    pub store: &'static str,
    pub total_requests: u64,
    pub total_errors: u64,
    pub rps: f64,
    pub avg_request_duration_ms: f64,
    pub check_ins: u64,
    pub lapses: u64,
    pub tasks_completed: u64,
    pub purchases: u64,
}

pub async fn json_metrics_handler(State(state): State<ApiState>) -> Json<JsonMetrics> {
    let m = &state.metrics;

    Json(JsonMetrics {
        uptime_secs: m.uptime_secs(),
        store: state.store.name(),
        total_requests: m.total_requests.load(Ordering::Relaxed),
        total_errors: m.total_errors.load(Ordering::Relaxed),
        rps: m.requests_per_second(),
        avg_request_duration_ms: m.avg_duration_ms(),
        check_ins: m.check_ins.load(Ordering::Relaxed),
        lapses: m.lapses.load(Ordering::Relaxed),
        tasks_completed: m.tasks_completed.load(Ordering::Relaxed),
        purchases: m.purchases.load(Ordering::Relaxed),
    })
}

// ============================================================================
// Tests
// ============================================================================
