//! Payment service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::Money;
use serde::{Deserialize, Serialize};

use crate::error::SagaError;
use crate::order_fulfillment;

/// Outcome of a charge attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Whether the charge was captured.
    pub approved: bool,
    /// Why the charge was declined, if it was.
    pub reason: Option<String>,
    /// The payment ID assigned to a captured charge.
    pub payment_id: Option<String>,
}

impl PaymentResult {
    /// A captured charge.
    pub fn approved(payment_id: impl Into<String>) -> Self {
        Self {
            approved: true,
            reason: None,
            payment_id: Some(payment_id.into()),
        }
    }

    /// A declined charge.
    pub fn declined(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            reason: Some(reason.into()),
            payment_id: None,
        }
    }
}

/// Trait for payment processing operations.
pub trait PaymentService: Send + Sync {
    /// Attempts to charge `amount` to the card.
    ///
    /// A policy decline is an `Ok` result with `approved == false`; `Err` is
    /// reserved for the service itself being unusable.
    fn charge(&self, amount: Money, card_token: &str) -> Result<PaymentResult, SagaError>;

    /// Refunds a previously captured payment.
    fn refund(&self, payment_id: &str) -> Result<(), SagaError>;
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    payments: HashMap<String, (Money, String)>,
    refunded: Vec<String>,
    next_id: u32,
    charge_calls: usize,
    fail_on_charge: bool,
}

/// In-memory payment service that approves charges up to a fixed limit.
#[derive(Debug, Clone)]
pub struct InMemoryPaymentService {
    limit: Money,
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentService {
    /// Creates a payment service with the default limit.
    pub fn new() -> Self {
        Self::with_limit(Money::from_dollars(
            order_fulfillment::DEFAULT_PAYMENT_LIMIT_DOLLARS,
        ))
    }

    /// Creates a payment service that approves charges up to `limit` inclusive.
    pub fn with_limit(limit: Money) -> Self {
        Self {
            limit,
            state: Arc::default(),
        }
    }

    /// Returns the configured limit.
    pub fn limit(&self) -> Money {
        self.limit
    }

    /// Configures the service to fail every charge call with an error.
    pub fn set_fail_on_charge(&self, fail: bool) {
        self.state.write().unwrap().fail_on_charge = fail;
    }

    /// Returns the number of captured payments not yet refunded.
    pub fn payment_count(&self) -> usize {
        self.state.read().unwrap().payments.len()
    }

    /// Returns true if a captured payment exists with the given ID.
    pub fn has_payment(&self, payment_id: &str) -> bool {
        self.state.read().unwrap().payments.contains_key(payment_id)
    }

    /// Returns the IDs of refunded payments, in refund order.
    pub fn refunded(&self) -> Vec<String> {
        self.state.read().unwrap().refunded.clone()
    }

    /// Returns the number of charge calls received.
    pub fn charge_count(&self) -> usize {
        self.state.read().unwrap().charge_calls
    }
}

impl Default for InMemoryPaymentService {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentService for InMemoryPaymentService {
    fn charge(&self, amount: Money, card_token: &str) -> Result<PaymentResult, SagaError> {
        let mut state = self.state.write().unwrap();
        state.charge_calls += 1;

        if state.fail_on_charge {
            return Err(SagaError::PaymentService(
                "Payment gateway unavailable".to_string(),
            ));
        }

        if amount.is_negative() {
            return Err(SagaError::InvalidInput(format!(
                "charge amount {amount} is negative"
            )));
        }

        if amount > self.limit {
            tracing::debug!(%amount, limit = %self.limit, "charge declined");
            return Ok(PaymentResult::declined(order_fulfillment::LIMIT_EXCEEDED));
        }

        state.next_id += 1;
        let payment_id = format!("PAY-{:04}", state.next_id);
        state
            .payments
            .insert(payment_id.clone(), (amount, card_token.to_string()));

        tracing::debug!(%amount, %payment_id, "charge captured");
        Ok(PaymentResult::approved(payment_id))
    }

    fn refund(&self, payment_id: &str) -> Result<(), SagaError> {
        let mut state = self.state.write().unwrap();
        if state.payments.remove(payment_id).is_none() {
            return Err(SagaError::PaymentService(format!(
                "Unknown payment: {payment_id}"
            )));
        }
        state.refunded.push(payment_id.to_string());
        Ok(())
    }
}
