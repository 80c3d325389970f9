//! Order placement error taxonomy.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A collaborator the order service depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dependency {
    Address,
    Customer,
    Card,
    Items,
    Payment,
    Shipping,
}

impl Dependency {
    /// Returns the dependency name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependency::Address => "address",
            Dependency::Customer => "customer",
            Dependency::Card => "card",
            Dependency::Items => "items",
            Dependency::Payment => "payment",
            Dependency::Shipping => "shipping",
        }
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while placing or looking up orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request is missing one of its required references.
    #[error("Invalid order request: {0}")]
    InvalidOrder(String),

    /// A reference could not be parsed into an identifier.
    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    /// A dependency call did not complete before its deadline.
    #[error("Timed out waiting {timeout:?} for the {dependency} service")]
    DependencyTimeout {
        dependency: Dependency,
        timeout: Duration,
    },

    /// A dependency call failed at the transport or protocol level.
    #[error("The {dependency} service failed at {endpoint}: {message}")]
    DependencyError {
        dependency: Dependency,
        endpoint: String,
        message: String,
    },

    /// The payment service refused to authorise the order.
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    /// The completed order could not be handed to the order store.
    #[error("Unable to persist order: {0}")]
    Persistence(String),
}

impl OrderError {
    /// Creates a dependency error from any displayable failure.
    pub fn dependency(
        dependency: Dependency,
        endpoint: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        OrderError::DependencyError {
            dependency,
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Returns true for outcomes caused by the caller rather than the infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OrderError::InvalidOrder(_) | OrderError::PaymentDeclined(_)
        )
    }

    /// Returns true if order placement is unavailable because a dependency is too slow.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, OrderError::DependencyTimeout { .. })
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::InvalidOrder(_) => "invalid_order",
            OrderError::MalformedReference(_) => "malformed_reference",
            OrderError::DependencyTimeout { .. } => "dependency_timeout",
            OrderError::DependencyError { .. } => "dependency_error",
            OrderError::PaymentDeclined(_) => "payment_declined",
            OrderError::Persistence(_) => "persistence",
        }
    }
}
