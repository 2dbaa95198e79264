//! Order attempt events.

use cart::LineItem;
use chrono::{DateTime, Utc};
use common::{AttemptId, Money};
use serde::{Deserialize, Serialize};

use crate::outcome::FailureReason;
use crate::services::{PaymentResult, Shipment};
use crate::state::OrderState;

/// Everything that can happen during one order attempt, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AttemptEvent {
    /// The attempt was created from a cart snapshot.
    AttemptStarted(AttemptStartedData),

    /// The attempt moved to another state.
    StateChanged(StateChangedData),

    /// An item was reserved.
    ItemReserved(ItemData),

    /// The charge was attempted.
    PaymentCharged(PaymentChargedData),

    /// The shipment was created.
    ShipmentCreated(Shipment),

    /// An item's reservation was released during rollback.
    ItemReleased(ItemData),

    /// Releasing an item failed (logged, rollback continues).
    ReleaseFailed(ItemFailedData),

    /// An item's reservation was committed after shipment.
    ItemCommitted(ItemData),

    /// Committing an item failed (logged, the order still completes).
    CommitFailed(ItemFailedData),

    /// The attempt completed.
    AttemptCompleted(AttemptCompletedData),

    /// The attempt failed after rollback.
    AttemptFailed(AttemptFailedData),
}

impl AttemptEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            AttemptEvent::AttemptStarted(_) => "AttemptStarted",
            AttemptEvent::StateChanged(_) => "StateChanged",
            AttemptEvent::ItemReserved(_) => "ItemReserved",
            AttemptEvent::PaymentCharged(_) => "PaymentCharged",
            AttemptEvent::ShipmentCreated(_) => "ShipmentCreated",
            AttemptEvent::ItemReleased(_) => "ItemReleased",
            AttemptEvent::ReleaseFailed(_) => "ReleaseFailed",
            AttemptEvent::ItemCommitted(_) => "ItemCommitted",
            AttemptEvent::CommitFailed(_) => "CommitFailed",
            AttemptEvent::AttemptCompleted(_) => "AttemptCompleted",
            AttemptEvent::AttemptFailed(_) => "AttemptFailed",
        }
    }
}

/// Data for AttemptStarted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptStartedData {
    /// The attempt ID.
    pub attempt_id: AttemptId,
    /// Snapshot of the cart at the time the order was placed.
    pub items: Vec<LineItem>,
    /// Cart total.
    pub total: Money,
    /// Card token with all but the last four characters masked.
    pub card_token: String,
    /// Shipping address as given.
    pub address: String,
    /// When the attempt started.
    pub started_at: DateTime<Utc>,
}

/// Data for StateChanged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChangedData {
    pub from: OrderState,
    pub to: OrderState,
}

/// Data for events about a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    /// The item name.
    pub item: String,
}

/// Data for events about a failed call on a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailedData {
    /// The item name.
    pub item: String,
    /// Error message describing the failure.
    pub error: String,
}

/// Data for PaymentCharged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentChargedData {
    /// Amount that was charged.
    pub amount: Money,
    /// The payment service's answer.
    pub result: PaymentResult,
}

/// Data for AttemptCompleted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptCompletedData {
    /// Tracking id of the shipment.
    pub tracking_id: String,
    /// When the attempt completed.
    pub completed_at: DateTime<Utc>,
}

/// Data for AttemptFailed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptFailedData {
    /// Reason for failure.
    pub reason: FailureReason,
    /// Whether a charge had been captured before the failure.
    pub was_payment_captured: bool,
    /// When the attempt failed.
    pub failed_at: DateTime<Utc>,
}

/// Masks all but the last four characters of a card token.
pub fn mask_card_token(card_token: &str) -> String {
    let chars: Vec<char> = card_token.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;
    std::iter::repeat_n('*', hidden)
        .chain(chars[hidden..].iter().copied())
        .collect()
}

// Factory methods for creating events
impl AttemptEvent {
    pub fn attempt_started(
        attempt_id: AttemptId,
        items: Vec<LineItem>,
        total: Money,
        card_token: &str,
        address: &str,
    ) -> Self {
        AttemptEvent::AttemptStarted(AttemptStartedData {
            attempt_id,
            items,
            total,
            card_token: mask_card_token(card_token),
            address: address.to_string(),
            started_at: Utc::now(),
        })
    }

    pub fn state_changed(from: OrderState, to: OrderState) -> Self {
        AttemptEvent::StateChanged(StateChangedData { from, to })
    }

    pub fn item_reserved(item: &str) -> Self {
        AttemptEvent::ItemReserved(ItemData {
            item: item.to_string(),
        })
    }

    pub fn payment_charged(amount: Money, result: PaymentResult) -> Self {
        AttemptEvent::PaymentCharged(PaymentChargedData { amount, result })
    }

    pub fn shipment_created(shipment: Shipment) -> Self {
        AttemptEvent::ShipmentCreated(shipment)
    }

    pub fn item_released(item: &str) -> Self {
        AttemptEvent::ItemReleased(ItemData {
            item: item.to_string(),
        })
    }

    pub fn release_failed(item: &str, error: String) -> Self {
        AttemptEvent::ReleaseFailed(ItemFailedData {
            item: item.to_string(),
            error,
        })
    }

    pub fn item_committed(item: &str) -> Self {
        AttemptEvent::ItemCommitted(ItemData {
            item: item.to_string(),
        })
    }

    pub fn commit_failed(item: &str, error: String) -> Self {
        AttemptEvent::CommitFailed(ItemFailedData {
            item: item.to_string(),
            error,
        })
    }

    pub fn attempt_completed(tracking_id: impl Into<String>) -> Self {
        AttemptEvent::AttemptCompleted(AttemptCompletedData {
            tracking_id: tracking_id.into(),
            completed_at: Utc::now(),
        })
    }

    pub fn attempt_failed(reason: FailureReason, was_payment_captured: bool) -> Self {
        AttemptEvent::AttemptFailed(AttemptFailedData {
            reason,
            was_payment_captured,
            failed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_card_token() {
        assert_eq!(mask_card_token("1234-5678"), "*****5678");
        assert_eq!(mask_card_token("123"), "123");
        assert_eq!(mask_card_token(""), "");
    }

    #[test]
    fn test_attempt_started_masks_card() {
        let event = AttemptEvent::attempt_started(
            AttemptId::new(),
            vec![LineItem::new("Laptop", Money::from_dollars(800))],
            Money::from_dollars(800),
            "1234-5678",
            "NY-Street",
        );
        match event {
            AttemptEvent::AttemptStarted(data) => assert_eq!(data.card_token, "*****5678"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_event_types() {
        assert_eq!(
            AttemptEvent::item_reserved("Laptop").event_type(),
            "ItemReserved"
        );
        assert_eq!(
            AttemptEvent::state_changed(OrderState::Created, OrderState::Reserving).event_type(),
            "StateChanged"
        );
        assert_eq!(
            AttemptEvent::attempt_failed(FailureReason::EmptyCart, false).event_type(),
            "AttemptFailed"
        );
    }

    #[test]
    fn test_serialization_is_tagged() {
        let event = AttemptEvent::item_released("Laptop");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ItemReleased");
        assert_eq!(json["data"]["item"], "Laptop");

        let back: AttemptEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
