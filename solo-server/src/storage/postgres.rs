//! PostgreSQL Storage - direct access to the record table
//!
//! Uses `sqlx` against the same `player_data` table the PostgREST backend
//! reads, for deployments that can reach the database directly.
//!
//! ## Tables
//! - player_data (id, data jsonb, updated_at)
//! - _migrations (applied migration names)

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::sync::Arc;
use tracing::{debug, info};

use solo_core::{seed_record, Clock, PlayerRecord};

use super::migrations;
use super::postgrest::DEFAULT_ROW_ID;
use super::repository::{RecordStore, StoreError, StoreResult};

/// PostgreSQL connection pool wrapper
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
    row_id: String,
    clock: Arc<dyn Clock>,
}

impl PostgresRecordStore {
    /// Connect to PostgreSQL and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        clock: Arc<dyn Clock>,
    ) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connected (max_connections={})", max_connections);

        let store = Self::from_pool(pool, clock);
        store.run_migrations().await?;

        Ok(store)
    }

    /// Wrap an existing pool (for testing)
    pub fn from_pool(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            row_id: DEFAULT_ROW_ID.to_string(),
            clock,
        }
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name VARCHAR(100) PRIMARY KEY,
                applied_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )",
        )
        .execute(&self.pool)
        .await?;

        for (name, sql) in migrations::get_migrations() {
            let applied: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE name = $1)")
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await?;

            if !applied {
                info!("Running migration: {}", name);
                sqlx::raw_sql(sql)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| StoreError::Migration(format!("{}: {}", name, e)))?;

                sqlx::query("INSERT INTO _migrations (name) VALUES ($1)")
                    .bind(name)
                    .execute(&self.pool)
                    .await?;

                info!("Migration applied: {}", name);
            } else {
                debug!("Migration already applied: {}", name);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn load(&self) -> StoreResult<PlayerRecord> {
        let row: Option<Json<Value>> =
            sqlx::query_scalar("SELECT data FROM player_data WHERE id = $1")
                .bind(&self.row_id)
                .fetch_optional(&self.pool)
                .await?;

        if let Some(Json(data)) = row {
            debug!("Record loaded from PostgreSQL");
            return Ok(serde_json::from_value(data)?);
        }

        let seed = seed_record(self.clock.now());
        sqlx::query(
            "INSERT INTO player_data (id, data) VALUES ($1, $2)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&self.row_id)
        .bind(Json(&seed))
        .execute(&self.pool)
        .await?;
        info!(row = %self.row_id, "Seed record inserted");
        Ok(seed)
    }

    async fn save(&self, record: &PlayerRecord) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO player_data (id, data, updated_at) VALUES ($1, $2, NOW())
             ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()",
        )
        .bind(&self.row_id)
        .bind(Json(record))
        .execute(&self.pool)
        .await?;
        debug!("Record saved to PostgreSQL");
        Ok(())
    }
}
