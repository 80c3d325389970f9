//! Snapshots of resources owned by dependency services.

use std::hash::{Hash, Hasher};

use common::ShipmentId;
use serde::{Deserialize, Serialize};

/// A resource fetched from a dependency service and identified by that service's ID.
///
/// HAL responses frequently omit the ID from the body and only carry it in
/// the `self` link, so clients need a way to fill it in after decoding.
pub trait Snapshot {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub long_num: String,
    #[serde(default)]
    pub expires: String,
    #[serde(default)]
    pub ccv: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

macro_rules! impl_snapshot {
    ($($ty:ty),*) => {
        $(impl Snapshot for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        })*
    };
}

impl_snapshot!(Address, Card, Customer);

/// A line entry of a cart.
///
/// Two items are the same catalog item when their `item_id` matches,
/// regardless of the quantity or price captured at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub item_id: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
}

impl Item {
    pub fn new(item_id: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            id: None,
            item_id: item_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns `quantity * unit_price`.
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.item_id == other.item_id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.item_id.hash(state);
    }
}

/// A shipment request, labelled with the customer's canonical ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    pub name: String,
}

impl Shipment {
    /// Creates a new shipment with a freshly generated ID.
    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        Self {
            id: ShipmentId::new().to_string(),
            name: customer_id.into(),
        }
    }
}
