//! Axum server setup
//!
//! Server skeleton with:
//! - CORS allow list built from the deployment environment
//! - Security headers, body limit, request timeout
//! - Tracing middleware
//! - JSON 404 fallback
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, OriginalUri};
use axum::http::{Method, StatusCode};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::{middleware, routes};
use crate::config::{ConfigError, Environment};
use crate::db::OrderStore;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Local frontend dev servers that are always allowed
const DEV_ORIGINS: [&str; 5] = [
    "http://localhost:3000",
    "http://localhost:5174",
    "http://localhost:5173",
    "http://127.0.0.1:5174",
    "http://127.0.0.1:5173",
];

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5000)
    pub bind_addr: SocketAddr,

    pub environment: Environment,

    /// Deployed frontend, added to the CORS allow list
    pub frontend_url: String,

    /// Railway-assigned public domain (no scheme)
    pub railway_public_domain: Option<String>,

    /// Railway static URL (with scheme)
    pub railway_static_url: Option<String>,

    /// Maximum request body size
    pub body_limit: usize,

    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            environment: Environment::default(),
            frontend_url: DEFAULT_FRONTEND_URL.to_owned(),
            railway_public_domain: None,
            railway_static_url: None,
            body_limit: BODY_LIMIT_BYTES,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load `PORT`, `NODE_ENV`, `FRONTEND_URL` and the Railway variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            bind_addr: SocketAddr::new(defaults.bind_addr.ip(), port),
            environment: Environment::from_lookup(&lookup),
            frontend_url: lookup("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            railway_public_domain: lookup("RAILWAY_PUBLIC_DOMAIN"),
            railway_static_url: lookup("RAILWAY_STATIC_URL"),
            ..defaults
        })
    }

    /// Origins allowed by CORS, in insertion order without duplicates.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = DEV_ORIGINS.iter().map(|o| o.to_string()).collect();

        if let Some(domain) = &self.railway_public_domain {
            origins.push(format!("https://{}", domain));
            origins.push(format!("http://{}", domain));
        }
        if let Some(url) = &self.railway_static_url {
            origins.push(url.clone());
        }
        origins.push(self.frontend_url.clone());

        let mut seen = Vec::with_capacity(origins.len());
        for origin in origins {
            if !seen.contains(&origin) {
                seen.push(origin);
            }
        }
        seen
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn OrderStore>, config: ServerConfig) -> Self {
        Self { store, config }
    }

    /// Whether 500 responses carry driver detail.
    pub fn expose_error_details(&self) -> bool {
        self.config.environment.exposes_error_details()
    }
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let origins = state.config.allowed_origins();
    tracing::info!(?origins, "Allowed CORS origins");

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            state.config.request_timeout,
        ))
        .layer(middleware::cors_layer(origins));

    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::orders::router())
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(DefaultBodyLimit::max(state.config.body_limit));

    middleware::with_security_headers(router)
        .layer(middleware_stack)
        .with_state(Arc::new(state))
}

/// Catch-all for unmatched paths and methods
async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| uri.path().to_owned());
    ApiError::RouteNotFound { method, path }
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MySqlOrderStore::new(pool));
/// run_server(store, ServerConfig::from_env()?).await?;
/// ```
pub async fn run_server(store: Arc<dyn OrderStore>, config: ServerConfig) -> Result<(), ServerError> {
    let bind_addr = config.bind_addr;
    let environment = config.environment;
    let railway_domain = config.railway_public_domain.clone();
    let frontend_url = config.frontend_url.clone();

    let app = build_router(AppState::new(store, config));

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        environment = %environment,
        railway_public_domain = railway_domain.as_deref().unwrap_or("Not set"),
        frontend_url = %frontend_url,
        "Bakery Orders API listening"
    );
    for (method, path, what) in routes::ROUTE_TABLE {
        tracing::debug!("{:<6} {:<18} {}", method, path, what);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
