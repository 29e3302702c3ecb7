//! Storage seam between route handlers and the database

use async_trait::async_trait;

use super::DbError;
use crate::models::{NewOrder, Order, OrderStatus};

/// Resource name used in not-found errors
pub const ORDER_RESOURCE: &str = "order";

/// Order persistence.
///
/// Implementations must keep `order_id` unique (`DbError::Duplicate` on
/// conflict) and report `DbError::NotFound` when an update or delete
/// matches no row.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, oldest first.
    async fn list(&self) -> Result<Vec<Order>, DbError>;

    /// Insert an order, returning the generated surrogate key.
    async fn create(&self, order: &NewOrder) -> Result<u64, DbError>;

    /// Change the status of the order with this business key.
    async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<(), DbError>;

    /// Remove the order with this business key.
    async fn delete(&self, order_id: &str) -> Result<(), DbError>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), DbError>;
}
