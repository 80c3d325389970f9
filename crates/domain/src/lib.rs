//! Domain layer for the order service.
//!
//! This crate provides:
//! - Snapshots of the resources owned by dependency services
//! - The `CustomerOrder` aggregate and the new-order request
//! - Order total calculation and reference parsing
//! - The order placement error taxonomy

pub mod error;
pub mod order;

pub use error::{Dependency, OrderError};
pub use order::{
    Address, Card, Customer, CustomerOrder, Item, NewOrderRequest, PaymentRequest,
    PaymentResponse, SHIPPING_SURCHARGE, Shipment, Snapshot, ValidatedOrderRequest,
    compute_total, extract_id,
};
