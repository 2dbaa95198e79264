//! Order coordinator for placing orders with compensating rollback.

use std::time::Instant;

use cart::{Cart, LineItem};
use common::AttemptId;

use crate::attempt::OrderAttempt;
use crate::error::SagaError;
use crate::events::AttemptEvent;
use crate::order_fulfillment;
use crate::outcome::{FailureReason, OrderConfirmation, OrderFailure, OrderOutcome};
use crate::services::inventory::{InventoryService, ReservationState};
use crate::services::payment::PaymentService;
use crate::services::shipping::ShippingService;
use crate::state::OrderState;

/// Orchestrates order placement across inventory, payment and shipping.
///
/// The coordinator drives one attempt through reserve → charge → ship. If
/// any phase fails, every reservation made by that attempt is released
/// before `place_order` returns. A captured payment is never refunded here;
/// the failure reports it so the caller can.
pub struct OrderCoordinator<I, P, Sh>
where
    I: InventoryService,
    P: PaymentService,
    Sh: ShippingService,
{
    inventory: I,
    payment: P,
    shipping: Sh,
}

impl<I, P, Sh> OrderCoordinator<I, P, Sh>
where
    I: InventoryService,
    P: PaymentService,
    Sh: ShippingService,
{
    /// Creates a new order coordinator.
    pub fn new(inventory: I, payment: P, shipping: Sh) -> Self {
        Self {
            inventory,
            payment,
            shipping,
        }
    }

    /// Returns the inventory collaborator.
    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Returns the payment collaborator.
    pub fn payment(&self) -> &P {
        &self.payment
    }

    /// Returns the shipping collaborator.
    pub fn shipping(&self) -> &Sh {
        &self.shipping
    }

    /// Places an order for the current contents of `cart`.
    ///
    /// Works on a snapshot of the cart taken on entry. Never panics on
    /// collaborator errors: every failure comes back as
    /// [`OrderOutcome::Failed`] with all of the attempt's reservations
    /// released.
    #[tracing::instrument(skip(self, cart, card_token), fields(items = cart.len()))]
    pub fn place_order(&self, cart: &Cart, card_token: &str, address: &str) -> OrderOutcome {
        metrics::counter!("checkout_attempts_total").increment(1);
        let started = Instant::now();

        let items = cart.items();
        let total = cart.total();
        let attempt_id = AttemptId::new();

        let mut attempt = OrderAttempt::default();
        record(
            &mut attempt,
            AttemptEvent::attempt_started(attempt_id, items.clone(), total, card_token, address),
        );

        // 1. Guards: nothing has been touched yet, so failures skip rollback
        if items.is_empty() {
            return self.finish_failed(attempt, &SagaError::EmptyCart, started);
        }
        if card_token.trim().is_empty() {
            let err = SagaError::InvalidInput("card token must not be empty".to_string());
            return self.finish_failed(attempt, &err, started);
        }

        // 2. Reserve every item
        tracing::info!(%attempt_id, step = order_fulfillment::STEP_RESERVE_INVENTORY, "order phase started");
        transition(&mut attempt, OrderState::Reserving);
        if let Err(e) = self.reserve_all(attempt_id, &mut attempt, &items) {
            return self.roll_back(attempt_id, attempt, e, started);
        }

        // 3. Charge the total
        tracing::info!(%attempt_id, step = order_fulfillment::STEP_PROCESS_PAYMENT, %total, "order phase started");
        transition(&mut attempt, OrderState::Paying);
        let payment = match self.payment.charge(total, card_token) {
            Ok(payment) => payment,
            Err(e) => return self.roll_back(attempt_id, attempt, e, started),
        };
        let approved = payment.approved;
        let decline_reason = payment.reason.clone();
        record(&mut attempt, AttemptEvent::payment_charged(total, payment));
        if !approved {
            let reason = decline_reason.unwrap_or_else(|| "declined".to_string());
            let err = SagaError::PaymentDeclined { reason };
            return self.roll_back(attempt_id, attempt, err, started);
        }

        // 4. Ship
        tracing::info!(%attempt_id, step = order_fulfillment::STEP_CREATE_SHIPMENT, "order phase started");
        transition(&mut attempt, OrderState::Shipping);
        let shipment = match self.shipping.create_shipment(address) {
            Ok(shipment) => shipment,
            Err(e) => return self.roll_back(attempt_id, attempt, e, started),
        };
        let tracking_id = shipment.tracking_id.clone();
        record(&mut attempt, AttemptEvent::shipment_created(shipment));

        // 5. Turn the holds into deductions
        for item in attempt.reserved_items() {
            match self.inventory.commit(attempt_id, &item) {
                Ok(()) => record(&mut attempt, AttemptEvent::item_committed(&item)),
                Err(e) => {
                    tracing::warn!(%attempt_id, item = %item, error = %e, "commit failed");
                    record(&mut attempt, AttemptEvent::commit_failed(&item, e.to_string()));
                }
            }
        }

        record(&mut attempt, AttemptEvent::attempt_completed(&tracking_id));

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        metrics::counter!("checkout_completed_total").increment(1);
        tracing::info!(%attempt_id, %tracking_id, %total, duration, "order completed");

        let reserved_items = attempt
            .reservations()
            .iter()
            .filter(|r| r.state != ReservationState::Released)
            .map(|r| r.item.clone())
            .collect();

        OrderOutcome::Completed(OrderConfirmation {
            tracking_id,
            total,
            reserved_items,
            attempt,
        })
    }

    /// Checks and reserves each item in turn, stopping at the first failure.
    fn reserve_all(
        &self,
        attempt_id: AttemptId,
        attempt: &mut OrderAttempt,
        items: &[LineItem],
    ) -> Result<(), SagaError> {
        for item in items {
            if !self.inventory.check_stock(&item.name)? {
                return Err(SagaError::OutOfStock {
                    item: item.name.clone(),
                });
            }
            let reservation = self.inventory.reserve(attempt_id, &item.name)?;
            record(attempt, AttemptEvent::item_reserved(&reservation.item));
        }
        Ok(())
    }

    /// Releases every item still held by the attempt, then fails it.
    #[tracing::instrument(skip(self, attempt_id, attempt, started), fields(%attempt_id))]
    fn roll_back(
        &self,
        attempt_id: AttemptId,
        mut attempt: OrderAttempt,
        error: SagaError,
        started: Instant,
    ) -> OrderOutcome {
        tracing::warn!(error = %error, from = %attempt.state(), "order phase failed, rolling back");
        transition(&mut attempt, OrderState::RollingBack);

        for item in attempt.reserved_items() {
            match self.inventory.release(attempt_id, &item) {
                Ok(()) => {
                    metrics::counter!("checkout_reservations_released_total").increment(1);
                    record(&mut attempt, AttemptEvent::item_released(&item));
                }
                Err(e) => {
                    tracing::warn!(item = %item, error = %e, "release failed");
                    record(&mut attempt, AttemptEvent::release_failed(&item, e.to_string()));
                }
            }
        }

        self.finish_failed(attempt, &error, started)
    }

    fn finish_failed(
        &self,
        mut attempt: OrderAttempt,
        error: &SagaError,
        started: Instant,
    ) -> OrderOutcome {
        let reason = FailureReason::from(error);
        let was_payment_captured = attempt.was_payment_captured();
        let payment_id = attempt
            .payment()
            .filter(|p| p.approved)
            .and_then(|p| p.payment_id.clone());

        record(
            &mut attempt,
            AttemptEvent::attempt_failed(reason.clone(), was_payment_captured),
        );

        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        metrics::counter!("checkout_failed_total", "reason" => reason.code()).increment(1);
        tracing::warn!(
            attempt_id = ?attempt.id(),
            reason = %reason,
            was_payment_captured,
            "order failed"
        );

        OrderOutcome::Failed(OrderFailure {
            reason,
            was_payment_captured,
            payment_id,
            attempt,
        })
    }
}

/// Applies an event to the attempt.
fn record(attempt: &mut OrderAttempt, event: AttemptEvent) {
    tracing::debug!(event_type = event.event_type(), "attempt event");
    attempt.apply(event);
}

/// Moves the attempt to `next`, recording the change.
fn transition(attempt: &mut OrderAttempt, next: OrderState) {
    let current = attempt.state();
    debug_assert!(
        current.can_transition_to(next),
        "invalid order transition {current} -> {next}"
    );
    record(attempt, AttemptEvent::state_changed(current, next));
}
