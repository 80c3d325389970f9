//! Order placement state machine.

use serde::{Deserialize, Serialize};

/// The stage an order placement has reached.
///
/// State transitions:
/// ```text
/// Validating ──► FetchingDependencies ──► Authorizing ──► Shipping ──► Persisting ──► Completed
///     │                  │                     │              │             │
///     └──────────────────┴─────────────────────┴──────────────┴─────────────┴──► Failed
/// ```
///
/// There is no retry transition: `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlacementState {
    /// The request's references are being checked.
    #[default]
    Validating,

    /// Address, customer, card and items are being fetched concurrently.
    FetchingDependencies,

    /// Waiting for the payment service's decision.
    Authorizing,

    /// Payment was authorised and a shipment is being requested.
    Shipping,

    /// The assembled order is being handed to the order store.
    Persisting,

    /// The order was stored (terminal state).
    Completed,

    /// A step failed (terminal state).
    Failed,
}

impl PlacementState {
    /// Returns the state that follows this one when the current step succeeds.
    pub fn next(&self) -> Option<PlacementState> {
        match self {
            PlacementState::Validating => Some(PlacementState::FetchingDependencies),
            PlacementState::FetchingDependencies => Some(PlacementState::Authorizing),
            PlacementState::Authorizing => Some(PlacementState::Shipping),
            PlacementState::Shipping => Some(PlacementState::Persisting),
            PlacementState::Persisting => Some(PlacementState::Completed),
            PlacementState::Completed | PlacementState::Failed => None,
        }
    }

    /// Returns true if moving from this state to `next` is allowed.
    pub fn can_transition_to(&self, next: PlacementState) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == PlacementState::Failed || self.next() == Some(next)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlacementState::Completed | PlacementState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementState::Validating => "Validating",
            PlacementState::FetchingDependencies => "FetchingDependencies",
            PlacementState::Authorizing => "Authorizing",
            PlacementState::Shipping => "Shipping",
            PlacementState::Persisting => "Persisting",
            PlacementState::Completed => "Completed",
            PlacementState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for PlacementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
