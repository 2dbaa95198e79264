//! Order attempt aggregate.

use cart::LineItem;
use common::{AttemptId, Money};
use serde::{Deserialize, Serialize};

use crate::events::AttemptEvent;
use crate::outcome::FailureReason;
use crate::services::{PaymentResult, ReservationRecord, ReservationState, Shipment};
use crate::state::OrderState;

/// The record of one order attempt, rebuilt from its events.
///
/// Tracks the cart snapshot, every reservation made, the payment result and
/// the shipment, plus the full event history that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderAttempt {
    id: Option<AttemptId>,
    state: OrderState,
    items: Vec<LineItem>,
    total: Money,
    /// Masked card token.
    card_token: String,
    address: String,
    reservations: Vec<ReservationRecord>,
    payment: Option<PaymentResult>,
    shipment: Option<Shipment>,
    failure_reason: Option<FailureReason>,
    history: Vec<AttemptEvent>,
}

impl OrderAttempt {
    /// Rebuilds an attempt by applying events in order.
    pub fn from_events(events: impl IntoIterator<Item = AttemptEvent>) -> Self {
        let mut attempt = Self::default();
        for event in events {
            attempt.apply(event);
        }
        attempt
    }

    /// Applies an event and appends it to the history.
    pub fn apply(&mut self, event: AttemptEvent) {
        match &event {
            AttemptEvent::AttemptStarted(data) => {
                self.id = Some(data.attempt_id);
                self.items = data.items.clone();
                self.total = data.total;
                self.card_token = data.card_token.clone();
                self.address = data.address.clone();
                self.state = OrderState::Created;
            }
            AttemptEvent::StateChanged(data) => {
                self.state = data.to;
            }
            AttemptEvent::ItemReserved(data) => {
                self.set_reservation(&data.item, ReservationState::Reserved);
            }
            AttemptEvent::PaymentCharged(data) => {
                self.payment = Some(data.result.clone());
            }
            AttemptEvent::ShipmentCreated(shipment) => {
                self.shipment = Some(shipment.clone());
            }
            AttemptEvent::ItemReleased(data) => {
                self.set_reservation(&data.item, ReservationState::Released);
            }
            AttemptEvent::ItemCommitted(data) => {
                self.set_reservation(&data.item, ReservationState::Committed);
            }
            AttemptEvent::ReleaseFailed(_) | AttemptEvent::CommitFailed(_) => {
                // Reservation stays as it was; the failure is kept in history
            }
            AttemptEvent::AttemptCompleted(_) => {
                self.state = OrderState::Completed;
            }
            AttemptEvent::AttemptFailed(data) => {
                self.state = OrderState::Failed;
                self.failure_reason = Some(data.reason.clone());
            }
        }
        self.history.push(event);
    }

    fn set_reservation(&mut self, item: &str, state: ReservationState) {
        match self.reservations.iter_mut().find(|r| r.item == item) {
            Some(record) => record.state = state,
            None => self.reservations.push(ReservationRecord {
                item: item.to_string(),
                state,
            }),
        }
    }
}

// Query methods
impl OrderAttempt {
    pub fn id(&self) -> Option<AttemptId> {
        self.id
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    /// Returns the cart snapshot the attempt was placed with.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Returns the masked card token.
    pub fn card_token(&self) -> &str {
        &self.card_token
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns every reservation the attempt made, in reservation order.
    pub fn reservations(&self) -> &[ReservationRecord] {
        &self.reservations
    }

    /// Returns the names of items in the given reservation state.
    pub fn items_in_state(&self, state: ReservationState) -> Vec<String> {
        self.reservations
            .iter()
            .filter(|r| r.state == state)
            .map(|r| r.item.clone())
            .collect()
    }

    /// Returns the names of items still held by this attempt.
    pub fn reserved_items(&self) -> Vec<String> {
        self.items_in_state(ReservationState::Reserved)
    }

    pub fn payment(&self) -> Option<&PaymentResult> {
        self.payment.as_ref()
    }

    /// Returns true if a charge was captured during this attempt.
    pub fn was_payment_captured(&self) -> bool {
        self.payment.as_ref().is_some_and(|p| p.approved)
    }

    pub fn shipment(&self) -> Option<&Shipment> {
        self.shipment.as_ref()
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        self.failure_reason.as_ref()
    }

    /// Returns every event applied to this attempt, oldest first.
    pub fn history(&self) -> &[AttemptEvent] {
        &self.history
    }

    /// Returns the states the attempt passed through, starting at `Created`.
    pub fn state_path(&self) -> Vec<OrderState> {
        let mut path = Vec::new();
        for event in &self.history {
            match event {
                AttemptEvent::AttemptStarted(_) => path.push(OrderState::Created),
                AttemptEvent::StateChanged(data) => path.push(data.to),
                AttemptEvent::AttemptCompleted(_) => path.push(OrderState::Completed),
                AttemptEvent::AttemptFailed(_) => path.push(OrderState::Failed),
                _ => {}
            }
        }
        path
    }

    /// Returns how many times the item was released during this attempt.
    pub fn release_count(&self, item: &str) -> usize {
        self.history
            .iter()
            .filter(|e| matches!(e, AttemptEvent::ItemReleased(data) if data.item == item))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> AttemptEvent {
        AttemptEvent::attempt_started(
            AttemptId::new(),
            vec![
                LineItem::new("Laptop", Money::from_dollars(800)),
                LineItem::new("Mouse", Money::from_dollars(20)),
            ],
            Money::from_dollars(820),
            "1234-5678",
            "NY-Street",
        )
    }

    #[test]
    fn test_default_attempt() {
        let attempt = OrderAttempt::default();
        assert_eq!(attempt.id(), None);
        assert_eq!(attempt.state(), OrderState::Created);
        assert!(attempt.history().is_empty());
    }

    #[test]
    fn test_started_sets_snapshot() {
        let attempt = OrderAttempt::from_events([started()]);

        assert!(attempt.id().is_some());
        assert_eq!(attempt.items().len(), 2);
        assert_eq!(attempt.total(), Money::from_dollars(820));
        assert_eq!(attempt.card_token(), "*****5678");
        assert_eq!(attempt.address(), "NY-Street");
    }

    #[test]
    fn test_reservations_tracked_through_release() {
        let attempt = OrderAttempt::from_events([
            started(),
            AttemptEvent::state_changed(OrderState::Created, OrderState::Reserving),
            AttemptEvent::item_reserved("Laptop"),
            AttemptEvent::item_reserved("Mouse"),
            AttemptEvent::state_changed(OrderState::Reserving, OrderState::RollingBack),
            AttemptEvent::item_released("Laptop"),
            AttemptEvent::item_released("Mouse"),
            AttemptEvent::attempt_failed(
                FailureReason::PaymentDeclined {
                    reason: "limit exceeded".to_string(),
                },
                false,
            ),
        ]);

        assert_eq!(attempt.state(), OrderState::Failed);
        assert!(attempt.reserved_items().is_empty());
        assert_eq!(
            attempt.items_in_state(ReservationState::Released),
            vec!["Laptop", "Mouse"]
        );
        assert_eq!(attempt.release_count("Laptop"), 1);
        assert!(matches!(
            attempt.failure_reason(),
            Some(FailureReason::PaymentDeclined { .. })
        ));
        assert_eq!(
            attempt.state_path(),
            vec![
                OrderState::Created,
                OrderState::Reserving,
                OrderState::RollingBack,
                OrderState::Failed
            ]
        );
    }

    #[test]
    fn test_release_failure_keeps_reservation() {
        let attempt = OrderAttempt::from_events([
            started(),
            AttemptEvent::item_reserved("Laptop"),
            AttemptEvent::release_failed("Laptop", "down".to_string()),
        ]);
        assert_eq!(attempt.reserved_items(), vec!["Laptop"]);
    }

    #[test]
    fn test_payment_captured() {
        let declined = OrderAttempt::from_events([
            started(),
            AttemptEvent::payment_charged(
                Money::from_dollars(820),
                PaymentResult::declined("limit exceeded"),
            ),
        ]);
        assert!(!declined.was_payment_captured());

        let approved = OrderAttempt::from_events([
            started(),
            AttemptEvent::payment_charged(
                Money::from_dollars(820),
                PaymentResult::approved("PAY-0001"),
            ),
        ]);
        assert!(approved.was_payment_captured());
    }

    #[test]
    fn test_completed_attempt() {
        let attempt = OrderAttempt::from_events([
            started(),
            AttemptEvent::item_reserved("Laptop"),
            AttemptEvent::shipment_created(Shipment {
                tracking_id: "TRACK-NY--0001".to_string(),
                address: "NY-Street".to_string(),
            }),
            AttemptEvent::item_committed("Laptop"),
            AttemptEvent::attempt_completed("TRACK-NY--0001"),
        ]);

        assert_eq!(attempt.state(), OrderState::Completed);
        assert_eq!(
            attempt.shipment().map(|s| s.tracking_id.as_str()),
            Some("TRACK-NY--0001")
        );
        assert_eq!(
            attempt.items_in_state(ReservationState::Committed),
            vec!["Laptop"]
        );
    }

    #[test]
    fn test_serialization_roundtrip_keeps_history() {
        let attempt = OrderAttempt::from_events([started(), AttemptEvent::item_reserved("Laptop")]);

        let json = serde_json::to_string(&attempt).unwrap();
        let back: OrderAttempt = serde_json::from_str(&json).unwrap();
        assert_eq!(back.history(), attempt.history());
        assert_eq!(back.reserved_items(), vec!["Laptop"]);
    }
}
