//! Repository trait - abstraction layer for record persistence
//!
//! Every handler loads, mutates and saves the whole `PlayerRecord` through
//! this trait, so backends can be swapped (file → PostgREST → PostgreSQL)
//! without the engine noticing.

use async_trait::async_trait;
use solo_core::PlayerRecord;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Remote store returned {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("Store not configured: {0}")]
    NotConfigured(String),
}

impl StoreError {
    /// True when the backend could not be reached or refused the call.
    /// False when it answered with a record this build cannot read, or was
    /// never configured.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Json(_) | StoreError::NotConfigured(_) => false,
            StoreError::Http(e) => !e.is_decode(),
            _ => true,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for the single player record
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and metrics
    fn name(&self) -> &'static str;

    /// Load the record. A store with no record yet persists and returns the seed.
    async fn load(&self) -> StoreResult<PlayerRecord>;

    /// Persist the whole record, replacing what was stored
    async fn save(&self, record: &PlayerRecord) -> StoreResult<()>;
}
