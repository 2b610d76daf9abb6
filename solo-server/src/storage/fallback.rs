//! Primary-then-secondary store
//!
//! Remote backends are tried first; when they cannot be reached, the local
//! store takes over for that call. A primary that answers with a record this
//! build cannot read is reported as an error instead, so the local copy never
//! gets saved over the remote one. The two stores are not reconciled afterwards.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, warn};

use solo_core::PlayerRecord;

use super::repository::{RecordStore, StoreResult};

pub struct FallbackRecordStore {
    primary: Arc<dyn RecordStore>,
    secondary: Arc<dyn RecordStore>,
}

impl FallbackRecordStore {
    pub fn new(primary: Arc<dyn RecordStore>, secondary: Arc<dyn RecordStore>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl RecordStore for FallbackRecordStore {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn load(&self) -> StoreResult<PlayerRecord> {
        match self.primary.load().await {
            Ok(record) => Ok(record),
            Err(e) if !e.is_unavailable() => {
                error!(primary = self.primary.name(), "Load failed ({}), not falling back", e);
                Err(e)
            }
            Err(e) => {
                warn!(
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    "Load failed ({}), falling back",
                    e
                );
                self.secondary.load().await
            }
        }
    }

    async fn save(&self, record: &PlayerRecord) -> StoreResult<()> {
        match self.primary.save(record).await {
            Ok(()) => Ok(()),
            Err(e) if !e.is_unavailable() => Err(e),
            Err(e) => {
                warn!(
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    "Save failed ({}), falling back",
                    e
                );
                self.secondary.save(record).await
            }
        }
    }
}
