use async_trait::async_trait;
use domain::CustomerOrder;

use crate::{OrderId, Result};

/// Durable storage for placed orders.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores an order and returns the stored copy.
    ///
    /// Orders without an ID are assigned a new one. Saving an order whose ID
    /// already exists replaces the stored document.
    async fn save(&self, order: CustomerOrder) -> Result<CustomerOrder>;

    /// Returns every stored order, oldest first.
    async fn find_all(&self) -> Result<Vec<CustomerOrder>>;

    /// Returns the orders placed by one customer, oldest first.
    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Vec<CustomerOrder>>;

    /// Looks up a single order.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<CustomerOrder>>;
}
