//! API error types with IntoResponse
//!
//! Every error becomes `{"success": false, "error": "..."}` with a status
//! picked from the error class. 500s may carry a `details` field outside
//! production.

use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Body was not acceptable JSON (400)
    InvalidBody { message: String },

    /// Create hit the unique key on `order_id` (400)
    DuplicateOrder,

    /// Unique key violation outside the create path (409)
    Conflict,

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// No route matched (404)
    RouteNotFound { method: Method, path: String },

    /// Database unreachable (503, logged)
    Unavailable,

    /// Anything else (500, logged)
    Internal {
        message: &'static str,
        details: Option<String>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    /// Map a store failure for one handler.
    ///
    /// `message` is the client-facing text for unexpected failures; driver
    /// detail is attached only when `expose_details` is set.
    pub fn from_store(err: DbError, message: &'static str, expose_details: bool) -> Self {
        match err {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Duplicate { .. } => Self::Conflict,
            DbError::Unavailable(source) => {
                tracing::error!(error = %source, "{}", message);
                Self::Unavailable
            }
            DbError::Sqlx(source) => {
                tracing::error!(error = %source, "{}", message);
                Self::Internal {
                    message,
                    details: expose_details.then(|| source.to_string()),
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody { .. } | Self::DuplicateOrder => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound { .. } | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::InvalidBody { message } => message.clone(),
            Self::DuplicateOrder => "Order ID already exists".to_owned(),
            Self::Conflict => "Duplicate entry found".to_owned(),
            Self::NotFound { resource, .. } => format!("{} not found", capitalize(resource)),
            Self::RouteNotFound { method, path } => format!("Route {} {} not found", method, path),
            Self::Unavailable => "Database connection error".to_owned(),
            Self::Internal { message, .. } => (*message).to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: self.message(),
            details: match self {
                Self::Internal { details, .. } => details,
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            message: rejection.body_text(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::from_store(e, "Internal server error", false)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::MissingField { label: "Status" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Status is required");
    }

    #[tokio::test]
    async fn not_found_is_404_with_resource_name() {
        let err = ApiError::from(DbError::not_found("order", "ORD404"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Order not found");
    }

    #[tokio::test]
    async fn duplicate_maps_to_conflict_outside_create() {
        let err = ApiError::from(DbError::Duplicate {
            message: "Duplicate entry".into(),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::DuplicateOrder.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unavailable_is_503() {
        let err = ApiError::from(DbError::Unavailable(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"], "Database connection error");
    }

    #[tokio::test]
    async fn internal_details_only_when_exposed() {
        let hidden = ApiError::from_store(
            DbError::Sqlx(sqlx::Error::RowNotFound),
            "Failed to update order",
            false,
        );
        let body = body_json(hidden.into_response()).await;
        assert_eq!(body["error"], "Failed to update order");
        assert!(body.get("details").is_none());

        let shown = ApiError::from_store(
            DbError::Sqlx(sqlx::Error::RowNotFound),
            "Failed to update order",
            true,
        );
        let response = shown.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["details"].is_string());
    }

    #[tokio::test]
    async fn route_not_found_names_method_and_path() {
        let err = ApiError::RouteNotFound {
            method: Method::PATCH,
            path: "/api/cakes".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            "Route PATCH /api/cakes not found"
        );
    }
}
