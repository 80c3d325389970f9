//! The order aggregate handed to the order store.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use super::value_objects::{Address, Card, Customer, Item, Shipment};

/// A fully placed order.
///
/// Assembled once, after payment was authorised and the shipment accepted,
/// and not modified afterwards. `id` stays `None` until the order store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    pub customer_id: String,
    pub customer: Customer,
    pub address: Address,
    pub card: Card,
    pub items: Vec<Item>,
    pub shipment: Shipment,
    pub date: DateTime<Utc>,
    pub total: f64,
}

impl CustomerOrder {
    /// Returns a copy of this order carrying the given storage ID.
    pub fn with_id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }
}
