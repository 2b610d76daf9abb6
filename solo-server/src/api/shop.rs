//! Shop endpoints
//!
//! Endpoints:
//! - GET  /api/shop
//! - POST /api/shop/buy/{id}
//!
//! The catalog is fixed to the seeded items.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::atomic::Ordering;
use tracing::info;

use solo_core::buy_item;
use solo_core::record::{Shop, ShopItem};

use super::error::ApiResult;
use super::extract::ApiPath;
use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/shop", get(get_shop))
        .route("/api/shop/buy/{id}", post(buy))
}

#[derive(Serialize)]
pub struct ShopResponse {
    pub shop: Shop,
    pub catalog: Vec<ShopItem>,
}

#[derive(Serialize)]
pub struct BuyResponse {
    pub shop: Shop,
}

async fn get_shop(State(state): State<ApiState>) -> ApiResult<Json<ShopResponse>> {
    let record = state.read().await?;
    let catalog = record.shop.catalog.clone();
    Ok(Json(ShopResponse {
        shop: record.shop,
        catalog,
    }))
}

async fn buy(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<u32>,
) -> ApiResult<Json<BuyResponse>> {
    let (purchase, record) = state.mutate(|record, _| buy_item(record, id)).await?;
    state.metrics.purchases.fetch_add(1, Ordering::Relaxed);
    info!(item = %purchase.item.name, effect = ?purchase.effect, "Item bought");
    Ok(Json(BuyResponse { shop: record.shop }))
}
