//! Local JSON file store
//!
//! The record lives in one pretty-printed JSON file. Writes go to a sibling
//! temp file first and are renamed over the target, so a crash mid-write never
//! leaves a half-written record behind.
//!
//! A file that is not JSON at all (truncated, garbage) is moved aside and the
//! seed takes its place. A file that is valid JSON but does not fit the record
//! shape is left untouched and the load fails, so nothing the user wrote is
//! replaced by the seed.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use solo_core::{seed_record, Clock, PlayerRecord};

use super::repository::{RecordStore, StoreResult};

pub struct FileRecordStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileRecordStore {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Where an unreadable record is moved before the seed replaces it
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }

    /// First free quarantine path: `.corrupt`, then `.corrupt-<timestamp>`,
    /// then `.corrupt-<timestamp>-<n>`. Earlier quarantined files are kept.
    async fn free_corrupt_path(&self) -> StoreResult<PathBuf> {
        let first = self.corrupt_path();
        if !tokio::fs::try_exists(&first).await? {
            return Ok(first);
        }
        let stamp = self.clock.now().format("%Y%m%dT%H%M%S").to_string();
        let mut candidate = self.sibling(&format!(".corrupt-{}", stamp));
        let mut n = 1u32;
        while tokio::fs::try_exists(&candidate).await? {
            candidate = self.sibling(&format!(".corrupt-{}-{}", stamp, n));
            n += 1;
        }
        Ok(candidate)
    }

    async fn write_seed(&self) -> StoreResult<PlayerRecord> {
        let seed = seed_record(self.clock.now());
        self.save(&seed).await?;
        info!(path = %self.path.display(), "Seed record written");
        Ok(seed)
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn load(&self) -> StoreResult<PlayerRecord> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return self.write_seed().await;
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<PlayerRecord>(&bytes) {
            Ok(record) => {
                debug!(path = %self.path.display(), "Record loaded");
                Ok(record)
            }
            Err(e) if e.is_syntax() || e.is_eof() => {
                let aside = self.free_corrupt_path().await?;
                warn!(
                    path = %self.path.display(),
                    moved_to = %aside.display(),
                    "Record file unreadable ({}), starting from seed",
                    e
                );
                tokio::fs::rename(&self.path, &aside).await?;
                self.write_seed().await
            }
            Err(e) => {
                error!(
                    path = %self.path.display(),
                    "Record file does not match the record shape ({}), leaving it in place",
                    e
                );
                Err(e.into())
            }
        }
    }

    async fn save(&self, record: &PlayerRecord) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = serde_json::to_vec_pretty(record)?;
        let tmp = self.sibling(".tmp");
        tokio::fs::write(&tmp, &text).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = text.len(), "Record saved");
        Ok(())
    }
}
