//! Domain models with validation at construction
//!
//! Request payloads are validated into these types before any SQL runs.
//! Invalid input returns ValidationError, not panic.

pub mod order;
pub mod validation;

pub use order::{
    CreateOrderRequest, NewOrder, Order, OrderStatus, UpdateOrderRequest, DEFAULT_QUANTITY,
};
pub use validation::ValidationError;
