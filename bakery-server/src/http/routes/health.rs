//! Root, health check, and route smoke-test endpoints
//!
//! All three answer 200 whatever the database state; health only degrades
//! its `database` field.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::http::server::AppState;

const SERVICE_NAME: &str = "Bakery Orders API";
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Resource groups reported by `/api/test`
const ROUTE_GROUPS: [&str; 2] = ["orders", "health"];

/// GET / response
#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub documentation: &'static str,
    pub environment: &'static str,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
    pub timestamp: String,
    pub environment: &'static str,
    pub railway: bool,
    pub version: &'static str,
    pub database: &'static str,
}

/// GET /api/test response
#[derive(Serialize)]
pub struct TestResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: TestData,
}

#[derive(Serialize)]
pub struct TestData {
    pub version: &'static str,
    pub environment: &'static str,
    pub railway_public_domain: String,
    pub routes: [&'static str; 2],
}

/// GET /
async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME,
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
        documentation: "/api/health",
        environment: state.config.environment.as_str(),
    })
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match tokio::time::timeout(PING_TIMEOUT, state.store.ping()).await {
        Ok(Ok(())) => "connected",
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "Health check: database ping failed");
            "unavailable"
        }
        Err(_) => {
            tracing::warn!("Health check: database ping timed out");
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "OK",
        message: format!("{} is running", SERVICE_NAME),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.config.environment.as_str(),
        railway: state.config.railway_public_domain.is_some(),
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

/// GET /api/test
async fn route_test(State(state): State<Arc<AppState>>) -> Json<TestResponse> {
    Json(TestResponse {
        success: true,
        message: "All routes are working!",
        data: TestData {
            version: env!("CARGO_PKG_VERSION"),
            environment: state.config.environment.as_str(),
            railway_public_domain: state
                .config
                .railway_public_domain
                .clone()
                .unwrap_or_else(|| "Not set".to_owned()),
            routes: ROUTE_GROUPS,
        },
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/test", get(route_test))
}
