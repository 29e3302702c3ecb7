//! Order repository backed by MySQL
//!
//! Every operation is a single parameter-bound statement. Uniqueness of
//! `order_id` is enforced by the table's UNIQUE key, not by a prior SELECT.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};

use crate::db::store::{OrderStore, ORDER_RESOURCE};
use crate::db::DbError;
use crate::models::{NewOrder, Order, OrderStatus};

/// Order row as stored.
///
/// `status` is cast to CHAR in the SELECT so ENUM decoding never depends on
/// driver column-type quirks.
#[derive(Debug, Clone, FromRow)]
struct OrderRow {
    id: i32,
    order_id: String,
    customer_name: String,
    product: String,
    quantity: Option<i32>,
    order_date: Option<NaiveDate>,
    status: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Self {
            id: i64::from(r.id),
            order_id: r.order_id,
            customer_name: r.customer_name,
            product: r.product,
            quantity: r.quantity,
            order_date: r.order_date,
            // The ENUM column only admits known spellings; NULL reads as the column default.
            status: r
                .status
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            created_at: r.created_at,
        }
    }
}

/// Order repository
#[derive(Clone)]
pub struct MySqlOrderStore {
    pool: MySqlPool,
}

impl MySqlOrderStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for MySqlOrderStore {
    async fn list(&self) -> Result<Vec<Order>, DbError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT
                id,
                order_id,
                customer_name,
                product,
                quantity,
                order_date,
                CAST(status AS CHAR) AS status,
                created_at
            FROM orders
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn create(&self, order: &NewOrder) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO orders (order_id, customer_name, product, quantity, order_date, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.order_id())
        .bind(order.customer_name())
        .bind(order.product())
        .bind(order.quantity())
        .bind(order.order_date())
        .bind(order.status().as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE order_id = ?")
            .bind(status.as_str())
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        // sqlx sets CLIENT_FOUND_ROWS, so an unchanged status still counts.
        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ORDER_RESOURCE, order_id));
        }
        Ok(())
    }

    async fn delete(&self, order_id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = ?")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ORDER_RESOURCE, order_id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
