//! Handler error type and its HTTP mapping
//!
//! Every failure becomes `{"error": "<message>"}` so the front end can show
//! `r.error` directly.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use solo_core::ProgressionError;

use crate::storage::repository::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),
    #[error("Invalid path: {}", .0.body_text())]
    Path(#[from] PathRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Progression(ProgressionError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Progression(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(_) | ApiError::Path(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
