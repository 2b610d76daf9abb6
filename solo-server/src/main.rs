use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use solo_core::logging::init_tracing;
use solo_core::{Clock, SystemClock};
use solo_server::{api, storage, ApiState, RecordStore, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    init_tracing(&config.tracing());

    info!("Starting Solo System server v{}", env!("CARGO_PKG_VERSION"));
    info!(config = %serde_json::to_string(&config)?, "Configuration loaded");

    // ========================================================================
    // 1. Record store (remote first, local file as fallback)
    // ========================================================================
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = storage::init_store(&config, clock.clone())
        .await
        .context("Failed to initialize record store")?;

    // Touch the record once so a missing one is seeded before the first request
    store.load().await.context("Failed to load player record")?;

    // ========================================================================
    // 2. HTTP API (blocks until Ctrl-C)
    // ========================================================================
    let state = ApiState::new(store, clock)
        .with_app_version(&config.app_version)
        .with_static_dir(config.static_dir.clone());

    api::start_api_server(state, &config.bind_addr())
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {}", e))?;

    info!("Server stopped");
    Ok(())
}
