//! Repository implementations for database access

pub mod orders;

pub use orders::MySqlOrderStore;
