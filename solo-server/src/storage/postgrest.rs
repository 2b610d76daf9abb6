//! PostgREST row store (Supabase REST API)
//!
//! The whole record is one JSON value in the `data` column of a single row:
//!
//! ```text
//! player_data
//!   id   text  PRIMARY KEY   -- always "singleton"
//!   data jsonb
//! ```
//!
//! Load selects the row and inserts the seed if it is missing. Save patches
//! the row and falls back to an insert when nothing was updated.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use solo_core::{seed_record, Clock, PlayerRecord};

use super::repository::{RecordStore, StoreError, StoreResult};

pub const DEFAULT_TABLE: &str = "player_data";
pub const DEFAULT_ROW_ID: &str = "singleton";

#[derive(Deserialize)]
struct DataRow {
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    id: &'a str,
    data: &'a PlayerRecord,
}

#[derive(Serialize)]
struct PatchRow<'a> {
    data: &'a PlayerRecord,
}

pub struct PostgRestRecordStore {
    client: Client,
    table_url: String,
    key: String,
    row_id: String,
    clock: Arc<dyn Clock>,
}

impl PostgRestRecordStore {
    /// `base_url` is the project URL; `/rest/v1/<table>` is appended.
    pub fn new(
        base_url: &str,
        key: &str,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> StoreResult<Self> {
        if base_url.trim().is_empty() || key.trim().is_empty() {
            return Err(StoreError::NotConfigured(
                "SUPABASE_URL and SUPABASE_KEY are both required".into(),
            ));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), DEFAULT_TABLE),
            key: key.to_string(),
            row_id: DEFAULT_ROW_ID.to_string(),
            clock,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.key).bearer_auth(&self.key)
    }

    fn row_filter(&self) -> String {
        format!("eq.{}", self.row_id)
    }

    async fn remote_error(resp: Response) -> StoreError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        StoreError::Remote { status, body }
    }

    async fn insert(&self, record: &PlayerRecord) -> StoreResult<()> {
        let resp = self
            .authorized(self.client.post(&self.table_url))
            .header("Prefer", "return=representation")
            .json(&InsertRow {
                id: &self.row_id,
                data: record,
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }
        info!(row = %self.row_id, "Remote record row created");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgRestRecordStore {
    fn name(&self) -> &'static str {
        "postgrest"
    }

    async fn load(&self) -> StoreResult<PlayerRecord> {
        let resp = self
            .authorized(self.client.get(&self.table_url))
            .query(&[("select", "data".to_string()), ("id", self.row_filter())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }

        let rows: Vec<DataRow> = resp.json().await?;
        match rows.into_iter().next() {
            Some(DataRow { data: Some(data) }) if !data.is_null() => {
                debug!("Remote record loaded");
                Ok(serde_json::from_value(data)?)
            }
            Some(_) => {
                warn!("Remote record row has no data, using seed");
                Ok(seed_record(self.clock.now()))
            }
            None => {
                let seed = seed_record(self.clock.now());
                self.insert(&seed).await?;
                Ok(seed)
            }
        }
    }

    async fn save(&self, record: &PlayerRecord) -> StoreResult<()> {
        let resp = self
            .authorized(self.client.patch(&self.table_url))
            .query(&[("id", self.row_filter())])
            .header("Prefer", "return=representation")
            .json(&PatchRow { data: record })
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(());
        }
        if resp.status().is_success() {
            // an empty representation means no row matched the filter; a body
            // that does not parse is an error, not an empty match
            let updated: Vec<Value> = resp.json().await.map_err(|e| {
                warn!("Remote patch succeeded with an unreadable body ({})", e);
                StoreError::from(e)
            })?;
            if !updated.is_empty() {
                debug!("Remote record saved");
                return Ok(());
            }
        } else {
            let err = Self::remote_error(resp).await;
            warn!("Remote patch failed ({}), trying insert", err);
        }

        self.insert(record).await
    }
}
