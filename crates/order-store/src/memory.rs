use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use domain::CustomerOrder;
use tokio::sync::RwLock;

use crate::{OrderId, OrderRepository, Result, StoreError};

/// In-memory order repository for tests and local runs.
///
/// Orders are kept in insertion order and provide the same interface as the
/// PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<Vec<CustomerOrder>>>,
    fail_on_save: Arc<AtomicBool>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the repository to reject subsequent saves.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.fail_on_save.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: CustomerOrder) -> Result<CustomerOrder> {
        if self.fail_on_save.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("saves are disabled".to_string()));
        }

        let id = order.id.unwrap_or_default();
        let order = order.with_id(id);

        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| o.id == Some(id)) {
            Some(existing) => *existing = order.clone(),
            None => orders.push(order.clone()),
        }

        Ok(order)
    }

    async fn find_all(&self) -> Result<Vec<CustomerOrder>> {
        Ok(self.orders.read().await.clone())
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Vec<CustomerOrder>> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<CustomerOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == Some(id)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use domain::{Address, Card, Customer, Item, Shipment};

    use super::*;

    fn order_for(customer_id: &str, total: f64) -> CustomerOrder {
        CustomerOrder {
            id: None,
            customer_id: customer_id.to_string(),
            customer: Customer::default(),
            address: Address::default(),
            card: Card::default(),
            items: vec![Item::new("A", 1, total - 4.99)],
            shipment: Shipment::for_customer(customer_id),
            date: Utc::now(),
            total,
        }
    }

    #[tokio::test]
    async fn test_save_assigns_id() {
        let repo = InMemoryOrderRepository::new();

        let saved = repo.save(order_for("c1", 10.0)).await.unwrap();
        assert!(saved.id.is_some());
        assert_eq!(repo.order_count().await, 1);

        let found = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found.customer_id, "c1");
    }

    #[tokio::test]
    async fn test_save_keeps_existing_id_and_replaces() {
        let repo = InMemoryOrderRepository::new();
        let id = OrderId::new();

        repo.save(order_for("c1", 10.0).with_id(id)).await.unwrap();
        let replaced = repo.save(order_for("c1", 20.0).with_id(id)).await.unwrap();

        assert_eq!(replaced.id, Some(id));
        assert_eq!(repo.order_count().await, 1);
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().total, 20.0);
    }

    #[tokio::test]
    async fn test_find_all_preserves_insertion_order() {
        let repo = InMemoryOrderRepository::new();
        repo.save(order_for("c1", 10.0)).await.unwrap();
        repo.save(order_for("c2", 20.0)).await.unwrap();
        repo.save(order_for("c1", 30.0)).await.unwrap();

        let totals: Vec<f64> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|o| o.total)
            .collect();
        assert_eq!(totals, vec![10.0, 20.0, 30.0]);
    }

    #[tokio::test]
    async fn test_find_by_customer_id() {
        let repo = InMemoryOrderRepository::new();
        repo.save(order_for("c1", 10.0)).await.unwrap();
        repo.save(order_for("c2", 20.0)).await.unwrap();
        repo.save(order_for("c1", 30.0)).await.unwrap();

        let orders = repo.find_by_customer_id("c1").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.customer_id == "c1"));

        assert!(repo.find_by_customer_id("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fail_on_save() {
        let repo = InMemoryOrderRepository::new();
        repo.set_fail_on_save(true);

        let result = repo.save(order_for("c1", 10.0)).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(repo.order_count().await, 0);

        repo.set_fail_on_save(false);
        assert!(repo.save(order_for("c1", 10.0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_missing_id() {
        let repo = InMemoryOrderRepository::new();
        assert!(repo.find_by_id(OrderId::new()).await.unwrap().is_none());
    }
}
