//! Order endpoints
//!
//! `{id}` in paths is the business key (`order_id`), not the surrogate id.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::db::DbError;
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::{CreateOrderRequest, NewOrder, Order, UpdateOrderRequest};

/// Success envelope shared by the order endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    fn message_with(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    fn message(message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

/// Payload returned by create
#[derive(Debug, Serialize)]
pub struct CreatedOrder {
    pub id: u64,
}

/// GET /api/orders - list every order
async fn list_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    tracing::debug!("Fetching orders");

    let orders = state
        .store
        .list()
        .await
        .map_err(|err| ApiError::from_store(err, "Database error", state.expose_error_details()))?;

    tracing::info!(count = orders.len(), "Fetched orders");
    Ok(Json(ApiResponse::data(orders)))
}

/// POST /api/orders - create an order
async fn create_order(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateOrderRequest>,
) -> Result<Json<ApiResponse<CreatedOrder>>, ApiError> {
    let order = NewOrder::new(req)?;

    let id = state.store.create(&order).await.map_err(|err| match err {
        DbError::Duplicate { .. } => {
            tracing::info!(order_id = order.order_id(), "Rejected duplicate order id");
            ApiError::DuplicateOrder
        }
        other => ApiError::from_store(other, "Failed to create order", state.expose_error_details()),
    })?;

    tracing::info!(id, order_id = order.order_id(), "Order created");
    Ok(Json(ApiResponse::message_with(
        "Order added",
        CreatedOrder { id },
    )))
}

/// PUT /api/orders/{id} - change an order's status
async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
    JsonBody(req): JsonBody<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let status = req.into_status()?;

    state
        .store
        .update_status(&order_id, status)
        .await
        .map_err(|err| {
            ApiError::from_store(err, "Failed to update order", state.expose_error_details())
        })?;

    tracing::info!(order_id = %order_id, %status, "Order updated");
    Ok(Json(ApiResponse::message("Order updated")))
}

/// DELETE /api/orders/{id} - remove an order
async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.store.delete(&order_id).await.map_err(|err| {
        ApiError::from_store(err, "Failed to delete order", state.expose_error_details())
    })?;

    tracing::info!(order_id = %order_id, "Order deleted");
    Ok(Json(ApiResponse::message("Order deleted")))
}

/// Order routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}", put(update_order).delete(delete_order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{schema::SEED_ORDERS, MemoryOrderStore, OrderStore};
    use crate::http::routes::testing::DownStore;
    use crate::http::server::{build_router, ServerConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app_with(store: Arc<dyn OrderStore>) -> Router {
        build_router(AppState::new(store, ServerConfig::default()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn order_count(app: &Router) -> usize {
        let (_, body) = send(app, "GET", "/api/orders", None).await;
        body["data"].as_array().unwrap().len()
    }

    fn cake(order_id: &str) -> Value {
        json!({
            "order_id": order_id,
            "customer_name": "Grace",
            "product": "Lemon Tart",
            "quantity": 3,
            "order_date": "2024-05-01"
        })
    }

    #[tokio::test]
    async fn list_returns_seed_rows() {
        let app = app_with(Arc::new(MemoryOrderStore::with_seed_data()));
        let (status, body) = send(&app, "GET", "/api/orders", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), SEED_ORDERS.len());
        assert_eq!(body["data"][0]["order_id"], "ORD001");
    }

    #[tokio::test]
    async fn creates_add_exactly_one_row_each() {
        let app = app_with(Arc::new(MemoryOrderStore::with_seed_data()));

        for n in 0..5 {
            let (status, body) =
                send(&app, "POST", "/api/orders", Some(cake(&format!("NEW{}", n)))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "Order added");
            assert!(body["data"]["id"].as_u64().unwrap() > 0);
        }

        assert_eq!(order_count(&app).await, SEED_ORDERS.len() + 5);
    }

    #[tokio::test]
    async fn created_order_gets_defaults() {
        let app = app_with(Arc::new(MemoryOrderStore::new()));
        let (status, _) = send(
            &app,
            "POST",
            "/api/orders",
            Some(json!({"order_id": "D1", "customer_name": "Lin", "product": "Scone"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/api/orders", None).await;
        assert_eq!(body["data"][0]["quantity"], 1);
        assert_eq!(body["data"][0]["status"], "Pending");
    }

    #[tokio::test]
    async fn string_quantity_from_forms_is_accepted() {
        let app = app_with(Arc::new(MemoryOrderStore::new()));
        let mut payload = cake("F1");
        payload["quantity"] = json!("4");

        let (status, _) = send(&app, "POST", "/api/orders", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/api/orders", None).await;
        assert_eq!(body["data"][0]["quantity"], 4);
    }

    #[tokio::test]
    async fn duplicate_order_id_is_rejected_without_new_row() {
        let app = app_with(Arc::new(MemoryOrderStore::with_seed_data()));

        let (status, body) = send(&app, "POST", "/api/orders", Some(cake("ORD001"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Order ID already exists");
        assert_eq!(order_count(&app).await, SEED_ORDERS.len());
    }

    #[tokio::test]
    async fn missing_fields_never_reach_the_store() {
        // A store that fails every call: a 400 proves validation ran first.
        let app = app_with(Arc::new(DownStore));
        let (status, body) = send(
            &app,
            "POST",
            "/api/orders",
            Some(json!({"order_id": "X1", "product": "Bun"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Missing required fields: order_id, customer_name, product"
        );
    }

    #[tokio::test]
    async fn invalid_status_on_create_is_400() {
        let app = app_with(Arc::new(MemoryOrderStore::new()));
        let mut payload = cake("S1");
        payload["status"] = json!("Shipped");

        let (status, _) = send(&app, "POST", "/api/orders", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(order_count(&app).await, 0);
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let app = app_with(Arc::new(MemoryOrderStore::new()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/orders")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_changes_status() {
        let app = app_with(Arc::new(MemoryOrderStore::with_seed_data()));
        let (status, body) = send(
            &app,
            "PUT",
            "/api/orders/ORD003",
            Some(json!({"status": "Cancelled"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Order updated");

        let (_, body) = send(&app, "GET", "/api/orders", None).await;
        let updated = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["order_id"] == "ORD003")
            .unwrap()
            .clone();
        assert_eq!(updated["status"], "Cancelled");
    }

    #[tokio::test]
    async fn update_requires_status() {
        let app = app_with(Arc::new(MemoryOrderStore::with_seed_data()));
        let (status, body) = send(&app, "PUT", "/api/orders/ORD001", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Status is required");
    }

    #[tokio::test]
    async fn update_and_delete_unknown_order_are_404() {
        let app = app_with(Arc::new(MemoryOrderStore::with_seed_data()));

        let (status, body) = send(
            &app,
            "PUT",
            "/api/orders/NOPE",
            Some(json!({"status": "Completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Order not found");

        let (status, _) = send(&app, "DELETE", "/api/orders/NOPE", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, "GET", "/api/orders", None).await;
        let statuses: Vec<_> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["status"].clone())
            .collect();
        assert_eq!(statuses, vec![json!("Pending"), json!("Completed"), json!("Pending")]);
    }

    #[tokio::test]
    async fn delete_removes_order() {
        let app = app_with(Arc::new(MemoryOrderStore::with_seed_data()));
        let (status, body) = send(&app, "DELETE", "/api/orders/ORD002", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Order deleted");
        assert_eq!(order_count(&app).await, SEED_ORDERS.len() - 1);

        let (status, _) = send(&app, "DELETE", "/api/orders/ORD002", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unreachable_database_is_503() {
        let app = app_with(Arc::new(DownStore));
        let (status, body) = send(&app, "GET", "/api/orders", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Database connection error");

        let (status, _) = send(&app, "POST", "/api/orders", Some(cake("Z1"))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unsupported_method_is_json_404() {
        let app = app_with(Arc::new(MemoryOrderStore::new()));
        let (status, body) = send(&app, "PATCH", "/api/orders", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Route PATCH /api/orders not found");
    }
}
