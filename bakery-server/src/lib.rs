//! bakery-server: REST API for bakery orders
//!
//! Serves list/create/update/delete over a MySQL `orders` table, plus
//! root and health endpoints. Storage sits behind [`db::OrderStore`] so
//! the router can also run against an in-memory store.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseConfig, Environment, SslMode};
pub use db::{DbError, MemoryOrderStore, MySqlOrderStore, OrderStore};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
