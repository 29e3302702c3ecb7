//! Table creation and seed data for the `orders` table

use sqlx::MySqlPool;

use crate::models::OrderStatus;

/// `orders` table definition
pub const CREATE_ORDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id INT AUTO_INCREMENT PRIMARY KEY,
    order_id VARCHAR(50) UNIQUE NOT NULL,
    customer_name VARCHAR(100) NOT NULL,
    product VARCHAR(100) NOT NULL,
    quantity INT DEFAULT 1,
    order_date DATE,
    status ENUM('Pending', 'Completed', 'Cancelled') DEFAULT 'Pending',
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// A demo order inserted by `initialize`
#[derive(Debug, Clone, Copy)]
pub struct SeedOrder {
    pub order_id: &'static str,
    pub customer_name: &'static str,
    pub product: &'static str,
    pub quantity: i32,
    pub status: OrderStatus,
}

/// Demo orders, all dated on the day they are inserted
pub const SEED_ORDERS: [SeedOrder; 3] = [
    SeedOrder {
        order_id: "ORD001",
        customer_name: "John Doe",
        product: "Chocolate Cake",
        quantity: 2,
        status: OrderStatus::Pending,
    },
    SeedOrder {
        order_id: "ORD002",
        customer_name: "Jane Smith",
        product: "Blueberry Muffin",
        quantity: 6,
        status: OrderStatus::Completed,
    },
    SeedOrder {
        order_id: "ORD003",
        customer_name: "Mike Johnson",
        product: "Croissant",
        quantity: 12,
        status: OrderStatus::Pending,
    },
];

/// Create the `orders` table and insert seed rows that are not present yet.
///
/// Returns the number of seed rows actually inserted; rerunning is harmless.
pub async fn initialize(pool: &MySqlPool) -> Result<u64, sqlx::Error> {
    tracing::info!("Initializing database tables...");

    sqlx::query(CREATE_ORDERS_TABLE).execute(pool).await?;
    tracing::debug!("orders table ready");

    let mut inserted = 0;
    for seed in SEED_ORDERS {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO orders (order_id, customer_name, product, quantity, order_date, status)
            VALUES (?, ?, ?, ?, CURDATE(), ?)
            "#,
        )
        .bind(seed.order_id)
        .bind(seed.customer_name)
        .bind(seed.product)
        .bind(seed.quantity)
        .bind(seed.status.as_str())
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    tracing::info!(inserted, "Seed orders applied");
    Ok(inserted)
}
