//! Database layer - connection pool, schema, and order stores
//!
//! # Design Principles
//!
//! - One shared pool (or a single kept-alive connection), no Arc<Mutex<Connection>>
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Zero affected rows on update/delete means not found

pub mod error;
pub mod memory;
pub mod pool;
pub mod repos;
pub mod schema;
pub mod startup;
pub mod store;

pub use error::DbError;
pub use memory::MemoryOrderStore;
pub use pool::{check_connection, connect, wait_for_database, ConnectionInfo};
pub use repos::MySqlOrderStore;
pub use startup::{open_store, startup_check, StartupPolicy};
pub use store::OrderStore;
