//! Custom Axum extractors

use axum::extract::FromRequest;

use super::error::ApiError;

/// `Json` with rejections rendered as `ApiError` (400, JSON body)
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
