//! HTTP/JSON API Layer
//!
//! JSON endpoints under `/api` for the single-page front end, plus health,
//! metrics and the static front end itself.
//!
//! ## Architecture
//! ```text
//! Browser (app.js, fetch + JSON)
//!       ↓ HTTP GET/POST
//! Axum Router (port 8000)
//!       ↓
//! Route modules (tasks, punishments, rules, journal, shop, progress)
//!       ↓ load → solo_core mutation → save, under one write lock
//! RecordStore (file / PostgREST / PostgreSQL)
//! ```
//!
//! Errors are returned as `{"error": "..."}` with a 4xx/5xx status.

pub mod error;
pub mod extract;
pub mod journal;
pub mod progress;
pub mod punishments;
pub mod rules;
pub mod shop;
pub mod tasks;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use solo_core::{Clock, PlayerRecord, ProgressionResult};

use self::error::ApiResult;
use crate::metrics::ServerMetrics;
use crate::storage::repository::RecordStore;

type SharedRng = Arc<Mutex<Box<dyn RngCore + Send>>>;

/// Shared state available to all API handlers
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn RecordStore>,
    pub clock: Arc<dyn Clock>,
    /// Server-wide metrics (lock-free atomics)
    pub metrics: Arc<ServerMetrics>,
    /// Value of the `X-App-Version` response header
    pub app_version: Arc<str>,
    /// Front-end assets; not served when `None`
    pub static_dir: Option<PathBuf>,
    /// Punishment draws on lapsed check-ins
    rng: SharedRng,
    /// Serializes load → mutate → save cycles within this process
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl ApiState {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            metrics: ServerMetrics::new(),
            app_version: Arc::from(env!("CARGO_PKG_VERSION")),
            static_dir: None,
            rng: Arc::new(Mutex::new(Box::new(StdRng::from_entropy()))),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn with_app_version(mut self, version: &str) -> Self {
        self.app_version = Arc::from(version);
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Replace the punishment RNG (seeded RNGs make lapses reproducible)
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Arc::new(Mutex::new(Box::new(rng)));
        self
    }

    /// Current record, loaded under the write lock so a concurrent save is
    /// never observed half-way.
    pub async fn read(&self) -> ApiResult<PlayerRecord> {
        let _guard = self.write_lock.lock().await;
        Ok(self.store.load().await?)
    }

    /// Load, apply `op`, save. Nothing is saved when `op` fails.
    pub async fn mutate<T, F>(&self, op: F) -> ApiResult<(T, PlayerRecord)>
    where
        F: FnOnce(&mut PlayerRecord, NaiveDateTime) -> ProgressionResult<T>,
    {
        self.mutate_with(|record, now, _rng| op(record, now).map(|out| (out, true)))
            .await
    }

    /// Like [`mutate`](Self::mutate), but `op` also gets the shared RNG and
    /// reports whether the record changed; unchanged records are not saved.
    pub async fn mutate_with<T, F>(&self, op: F) -> ApiResult<(T, PlayerRecord)>
    where
        F: FnOnce(&mut PlayerRecord, NaiveDateTime, &mut dyn RngCore) -> ProgressionResult<(T, bool)>,
    {
        let _guard = self.write_lock.lock().await;
        let mut record = self.store.load().await?;
        let now = self.clock.now();
        let (out, changed) = {
            let mut rng = self.rng.lock();
            op(&mut record, now, &mut **rng)?
        };
        if changed {
            self.store.save(&record).await?;
        }
        Ok((out, record))
    }

    /// Overwrite whatever is stored with `record`
    pub async fn replace(&self, record: &PlayerRecord) -> ApiResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.save(record).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store: &'static str,
}

async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.name(),
    })
}

/// Stamps `X-App-Version` on every response and disables caching of the
/// front-end entry page.
async fn app_headers(State(state): State<ApiState>, req: Request<Body>, next: Next) -> Response {
    let no_cache = matches!(req.uri().path(), "/" | "/index.html" | "/static/index.html");
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    if let Ok(version) = HeaderValue::from_str(&state.app_version) {
        headers.insert("x-app-version", version);
    }
    if no_cache {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
    }
    resp
}

/// Build the full API router with all service endpoints
pub fn build_router(state: ApiState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(crate::metrics::prometheus_handler))
        .route("/metrics/json", get(crate::metrics::json_metrics_handler))
        .merge(progress::routes())
        .merge(tasks::routes())
        .merge(punishments::routes())
        .merge(rules::routes())
        .merge(journal::routes())
        .merge(shop::routes());

    if let Some(dir) = &state.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        router = router
            .route_service("/", index.clone())
            .route_service("/index.html", index)
            .route_service("/sw.js", ServeFile::new(dir.join("sw.js")))
            .nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), app_headers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn start_api_server(
    state: ApiState,
    addr: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}
