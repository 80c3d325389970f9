//! Payment authorisation messages.

use serde::{Deserialize, Serialize};

use super::value_objects::{Address, Card, Customer};

/// Body posted to the payment service. Built per order and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub address: Address,
    pub card: Card,
    pub customer: Customer,
    pub amount: f64,
}

impl PaymentRequest {
    pub fn new(address: Address, card: Card, customer: Customer, amount: f64) -> Self {
        Self {
            address,
            card,
            customer,
            amount,
        }
    }
}

/// The payment service's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub authorised: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentResponse {
    pub fn authorised() -> Self {
        Self {
            authorised: true,
            message: Some("Payment authorised".to_string()),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            authorised: false,
            message: Some(message.into()),
        }
    }
}
