//! Order attempt state machine.

use serde::{Deserialize, Serialize};

/// The state of an order attempt in its lifecycle.
///
/// State transitions:
/// ```text
/// Created ──► Reserving ──► Paying ──► Shipping ──► Completed
///    │            │            │           │
///    │            └────────────┴───────────┴──► RollingBack ──► Failed
///    └──────────────────────────────────────────────────────────► Failed
/// ```
///
/// `Created ──► Failed` is taken only by guard failures, before any
/// collaborator has been called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderState {
    /// Attempt recorded, nothing reserved yet.
    #[default]
    Created,

    /// Items are being checked and reserved.
    Reserving,

    /// The cart total is being charged.
    Paying,

    /// The shipment is being created.
    Shipping,

    /// Shipment created and reservations committed (terminal state).
    Completed,

    /// A phase failed and reservations are being released.
    RollingBack,

    /// Rollback finished after a failure (terminal state).
    Failed,
}

impl OrderState {
    /// Returns true if the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderState) -> bool {
        use OrderState::*;
        matches!(
            (self, next),
            (Created, Reserving)
                | (Created, Failed)
                | (Reserving, Paying)
                | (Reserving, RollingBack)
                | (Paying, Shipping)
                | (Paying, RollingBack)
                | (Shipping, Completed)
                | (Shipping, RollingBack)
                | (RollingBack, Failed)
        )
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Completed | OrderState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Created => "Created",
            OrderState::Reserving => "Reserving",
            OrderState::Paying => "Paying",
            OrderState::Shipping => "Shipping",
            OrderState::Completed => "Completed",
            OrderState::RollingBack => "RollingBack",
            OrderState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
