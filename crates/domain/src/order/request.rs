//! Inbound new-order request.

use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// Request to place an order, as received from the storefront.
///
/// Each field is a reference (URL) to a resource owned by another service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub items: Option<String>,
    /// Optional tag used by load-testing tools; ignored by order placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulate: Option<String>,
}

impl NewOrderRequest {
    /// Creates a request with all four references set.
    pub fn new(
        address: impl Into<String>,
        customer: impl Into<String>,
        card: impl Into<String>,
        items: impl Into<String>,
    ) -> Self {
        Self {
            address: Some(address.into()),
            customer: Some(customer.into()),
            card: Some(card.into()),
            items: Some(items.into()),
            simulate: None,
        }
    }

    /// Checks that every reference is present and non-blank.
    pub fn validate(&self) -> Result<ValidatedOrderRequest, OrderError> {
        fn required(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        match (
            required(&self.address),
            required(&self.customer),
            required(&self.card),
            required(&self.items),
        ) {
            (Some(address), Some(customer), Some(card), Some(items)) => Ok(ValidatedOrderRequest {
                address,
                customer,
                card,
                items,
            }),
            _ => Err(OrderError::InvalidOrder(
                "Order requires customer, address, card and items.".to_string(),
            )),
        }
    }
}

/// A new-order request whose four references are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrderRequest {
    pub address: String,
    pub customer: String,
    pub card: String,
    pub items: String,
}
