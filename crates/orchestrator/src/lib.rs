//! Order placement orchestration.
//!
//! Placing an order follows these steps:
//! 1. Validate the request's four references
//! 2. Fetch address, customer, card and cart items concurrently
//! 3. Authorise payment for the computed total
//! 4. Request a shipment
//! 5. Hand the assembled order to the order store
//!
//! Every dependency call is bounded by the configured timeout and any
//! failure aborts the placement. Nothing already done is rolled back.

pub mod client;
pub mod config;
pub mod orchestrator;
pub mod state;

pub use client::{HttpResourceClient, InMemoryResourceClient, PendingCall, ResourceClient};
pub use config::OrchestratorConfig;
pub use orchestrator::OrderOrchestrator;
pub use state::PlacementState;
