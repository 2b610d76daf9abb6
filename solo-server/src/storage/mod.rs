//! Storage Layer - persistence for the single player record
//!
//! Implements the Repository pattern with interchangeable backends:
//! - **File**: pretty-printed JSON on local disk
//! - **PostgREST**: one row in a remote `player_data` table (Supabase)
//! - **PostgreSQL**: the same table over a direct `sqlx` pool
//! - **Memory**: in-process, for tests
//!
//! ## Architecture
//! ```text
//! [API handlers]
//!       ↓
//! [RecordStore trait]
//!       ↓
//! ┌──────────────────────────────┬────────────┐
//! │ FallbackRecordStore          │ File only  │
//! │  primary: PostgREST/Postgres │            │
//! │  secondary: File             │            │
//! └──────────────────────────────┴────────────┘
//! ```

pub mod fallback;
pub mod file_store;
pub mod memory;
pub mod migrations;
pub mod postgres;
pub mod postgrest;
pub mod repository;

use std::sync::Arc;
use tracing::{info, warn};

use solo_core::Clock;

use crate::config::{ServerConfig, StoreBackend};

use self::fallback::FallbackRecordStore;
use self::file_store::FileRecordStore;
use self::postgres::PostgresRecordStore;
use self::postgrest::PostgRestRecordStore;
use self::repository::{RecordStore, StoreError, StoreResult};

/// Resolve `Auto` against the credentials that are actually present
pub fn resolve_backend(config: &ServerConfig) -> StoreBackend {
    match config.backend {
        StoreBackend::Auto if config.has_supabase() => StoreBackend::Supabase,
        StoreBackend::Auto if config.database_url.is_some() => StoreBackend::Postgres,
        StoreBackend::Auto => StoreBackend::File,
        explicit => explicit,
    }
}

/// Build the configured store
///
/// Remote backends are wrapped so the local file serves whenever they fail.
/// A PostgreSQL server that cannot be reached at startup leaves the file
/// store in charge for the life of the process.
pub async fn init_store(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> StoreResult<Arc<dyn RecordStore>> {
    let file: Arc<dyn RecordStore> =
        Arc::new(FileRecordStore::new(config.data_file.clone(), clock.clone()));

    let store: Arc<dyn RecordStore> = match resolve_backend(config) {
        StoreBackend::Supabase => {
            let (Some(url), Some(key)) = (&config.supabase_url, &config.supabase_key) else {
                return Err(StoreError::NotConfigured(
                    "STORE_BACKEND=supabase needs SUPABASE_URL and SUPABASE_KEY".into(),
                ));
            };
            let remote = PostgRestRecordStore::new(url, key, config.remote_timeout(), clock)?;
            Arc::new(FallbackRecordStore::new(Arc::new(remote), file))
        }
        StoreBackend::Postgres => {
            let Some(url) = &config.database_url else {
                return Err(StoreError::NotConfigured(
                    "STORE_BACKEND=postgres needs DATABASE_URL".into(),
                ));
            };
            match PostgresRecordStore::new(url, config.pg_max_connections, clock).await {
                Ok(pg) => {
                    let fallback: Arc<dyn RecordStore> =
                        Arc::new(FallbackRecordStore::new(Arc::new(pg), file));
                    fallback
                }
                Err(e) => {
                    warn!("PostgreSQL unavailable ({}), using local file only", e);
                    file
                }
            }
        }
        StoreBackend::File | StoreBackend::Auto => file,
    };

    info!(
        backend = store.name(),
        data_file = %config.data_file.display(),
        "Record store initialized"
    );
    Ok(store)
}
