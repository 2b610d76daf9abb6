//! Solo System Server Library
//!
//! HTTP host for the progression engine in `solo_core`:
//! - Record persistence behind the `RecordStore` trait (file, PostgREST, PostgreSQL)
//! - JSON API for the single-page front end
//! - Request and progression metrics (Prometheus + JSON export)
//! - Environment-driven configuration

pub mod api;  // HTTP/JSON API endpoints
pub mod config;  // ServerConfig::from_env
pub mod metrics;  // Server metrics (Prometheus + JSON export)
pub mod storage;  // Record stores and backend selection

// Re-export commonly used types
pub use api::{build_router, ApiState};
pub use config::{ServerConfig, StoreBackend};
pub use storage::repository::{RecordStore, StoreError, StoreResult};
