//! Order store for placed customer orders.
//!
//! The order placement pipeline hands each completed order to an
//! [`OrderRepository`]; the HTTP layer reads orders back through it.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::OrderId;
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderRepository;
pub use postgres::PostgresOrderRepository;
pub use store::OrderRepository;
