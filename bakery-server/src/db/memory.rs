//! In-process order store
//!
//! Same contract as the MySQL store; used by router tests and by
//! `serve --in-memory` for running the API without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::schema::SEED_ORDERS;
use super::store::{OrderStore, ORDER_RESOURCE};
use super::DbError;
use crate::models::{NewOrder, Order, OrderStatus};

#[derive(Default)]
struct Inner {
    next_id: i64,
    orders: Vec<Order>,
}

/// Order store held in memory
#[derive(Default)]
pub struct MemoryOrderStore {
    inner: RwLock<Inner>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demo orders.
    pub fn with_seed_data() -> Self {
        let today = Utc::now().date_naive();
        let orders: Vec<Order> = SEED_ORDERS
            .iter()
            .zip(1..)
            .map(|(seed, id)| Order {
                id,
                order_id: seed.order_id.to_owned(),
                customer_name: seed.customer_name.to_owned(),
                product: seed.product.to_owned(),
                quantity: Some(seed.quantity),
                order_date: Some(today),
                status: seed.status,
                created_at: Some(Utc::now()),
            })
            .collect();

        Self {
            inner: RwLock::new(Inner {
                next_id: orders.len() as i64,
                orders,
            }),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list(&self) -> Result<Vec<Order>, DbError> {
        Ok(self.inner.read().await.orders.clone())
    }

    async fn create(&self, order: &NewOrder) -> Result<u64, DbError> {
        let mut inner = self.inner.write().await;

        if inner.orders.iter().any(|o| o.order_id == order.order_id()) {
            return Err(DbError::Duplicate {
                message: format!("Duplicate entry '{}' for key 'order_id'", order.order_id()),
            });
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.orders.push(Order {
            id,
            order_id: order.order_id().to_owned(),
            customer_name: order.customer_name().to_owned(),
            product: order.product().to_owned(),
            quantity: Some(order.quantity()),
            order_date: order.order_date(),
            status: order.status(),
            created_at: Some(Utc::now()),
        });

        Ok(id as u64)
    }

    async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<(), DbError> {
        let mut inner = self.inner.write().await;
        let order = inner
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| DbError::not_found(ORDER_RESOURCE, order_id))?;
        order.status = status;
        Ok(())
    }

    async fn delete(&self, order_id: &str) -> Result<(), DbError> {
        let mut inner = self.inner.write().await;
        let before = inner.orders.len();
        inner.orders.retain(|o| o.order_id != order_id);

        if inner.orders.len() == before {
            return Err(DbError::not_found(ORDER_RESOURCE, order_id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
