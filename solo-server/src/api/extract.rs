//! Extractors whose rejections answer like every other handler error
//!
//! A body or path segment axum cannot parse becomes a 400 with the usual
//! `{"error": "..."}` body instead of axum's plain-text rejection.

use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Typed path parameters, e.g. a task index
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
