//! In-process store, used by tests and throwaway local runs

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use solo_core::{seed_record, Clock, PlayerRecord};

use super::repository::{RecordStore, StoreResult};

pub struct MemoryRecordStore {
    record: Mutex<Option<PlayerRecord>>,
    saves: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl MemoryRecordStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            record: Mutex::new(None),
            saves: AtomicU64::new(0),
            clock,
        }
    }

    /// Start from an existing record instead of the seed
    pub fn with_record(record: PlayerRecord, clock: Arc<dyn Clock>) -> Self {
        let store = Self::new(clock);
        *store.record.lock() = Some(record);
        store
    }

    /// Current stored record, if any was created yet
    pub fn snapshot(&self) -> Option<PlayerRecord> {
        self.record.lock().clone()
    }

    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> StoreResult<PlayerRecord> {
        let mut slot = self.record.lock();
        let record = slot.get_or_insert_with(|| seed_record(self.clock.now()));
        Ok(record.clone())
    }

    async fn save(&self, record: &PlayerRecord) -> StoreResult<()> {
        *self.record.lock() = Some(record.clone());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
