//! Results of placing an order.

use common::Money;
use serde::{Deserialize, Serialize};

use crate::attempt::OrderAttempt;
use crate::error::SagaError;

/// Why an order attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The cart was empty.
    EmptyCart,
    /// A caller-supplied value was rejected.
    InvalidInput { message: String },
    /// An item is not in the inventory catalog.
    UnknownItem { item: String },
    /// An item could not be reserved.
    OutOfStock { item: String },
    /// The inventory service itself failed during reservation.
    InventoryUnavailable { message: String },
    /// The charge was declined or could not be made.
    PaymentDeclined { reason: String },
    /// The shipping address was rejected.
    InvalidAddress { address: String },
    /// The shipping service itself failed.
    ShippingFailed { message: String },
}

impl FailureReason {
    /// Short machine-readable code, used as a metrics label.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::EmptyCart => "empty_cart",
            FailureReason::InvalidInput { .. } => "invalid_input",
            FailureReason::UnknownItem { .. } => "unknown_item",
            FailureReason::OutOfStock { .. } => "out_of_stock",
            FailureReason::InventoryUnavailable { .. } => "inventory_unavailable",
            FailureReason::PaymentDeclined { .. } => "payment_declined",
            FailureReason::InvalidAddress { .. } => "invalid_address",
            FailureReason::ShippingFailed { .. } => "shipping_failed",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::EmptyCart => write!(f, "cart is empty"),
            FailureReason::InvalidInput { message } => write!(f, "invalid input: {message}"),
            FailureReason::UnknownItem { item } => write!(f, "unknown item: {item}"),
            FailureReason::OutOfStock { item } => write!(f, "out of stock: {item}"),
            FailureReason::InventoryUnavailable { message } => {
                write!(f, "inventory unavailable: {message}")
            }
            FailureReason::PaymentDeclined { reason } => write!(f, "payment declined: {reason}"),
            FailureReason::InvalidAddress { address } => write!(f, "invalid address: '{address}'"),
            FailureReason::ShippingFailed { message } => write!(f, "shipping failed: {message}"),
        }
    }
}

impl From<&SagaError> for FailureReason {
    fn from(err: &SagaError) -> Self {
        match err {
            SagaError::EmptyCart => FailureReason::EmptyCart,
            SagaError::InvalidInput(message) => FailureReason::InvalidInput {
                message: message.clone(),
            },
            SagaError::ItemNotFound { item } => FailureReason::UnknownItem { item: item.clone() },
            SagaError::OutOfStock { item } => FailureReason::OutOfStock { item: item.clone() },
            SagaError::InventoryService(message) => FailureReason::InventoryUnavailable {
                message: message.clone(),
            },
            SagaError::PaymentDeclined { reason } => FailureReason::PaymentDeclined {
                reason: reason.clone(),
            },
            SagaError::PaymentService(message) => FailureReason::PaymentDeclined {
                reason: message.clone(),
            },
            SagaError::InvalidAddress { address, .. } => FailureReason::InvalidAddress {
                address: address.clone(),
            },
            SagaError::ShippingService(message) => FailureReason::ShippingFailed {
                message: message.clone(),
            },
        }
    }
}

/// A completed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Tracking id of the created shipment.
    pub tracking_id: String,
    /// Amount charged.
    pub total: Money,
    /// Items whose reservations were committed.
    pub reserved_items: Vec<String>,
    /// Full record of the attempt.
    pub attempt: OrderAttempt,
}

/// A failed order. All reservations of the attempt were rolled back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFailure {
    /// Why the attempt failed.
    pub reason: FailureReason,
    /// True if the charge was captured before the failure. The caller owes
    /// the customer a refund of `payment_id`.
    pub was_payment_captured: bool,
    /// The captured payment, if any.
    pub payment_id: Option<String>,
    /// Full record of the attempt.
    pub attempt: OrderAttempt,
}

impl OrderFailure {
    /// Returns true if the caller must refund a captured payment.
    pub fn requires_refund(&self) -> bool {
        self.was_payment_captured
    }
}

/// The result of placing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderOutcome {
    Completed(OrderConfirmation),
    Failed(OrderFailure),
}

impl OrderOutcome {
    /// Returns true if the order went through.
    pub fn is_completed(&self) -> bool {
        matches!(self, OrderOutcome::Completed(_))
    }

    /// Returns the confirmation of a completed order.
    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        match self {
            OrderOutcome::Completed(confirmation) => Some(confirmation),
            OrderOutcome::Failed(_) => None,
        }
    }

    /// Returns the failure of a failed order.
    pub fn failure(&self) -> Option<&OrderFailure> {
        match self {
            OrderOutcome::Completed(_) => None,
            OrderOutcome::Failed(failure) => Some(failure),
        }
    }

    /// Returns the tracking id of a completed order.
    pub fn tracking_id(&self) -> Option<&str> {
        self.confirmation().map(|c| c.tracking_id.as_str())
    }

    /// Returns the record of the attempt that produced this outcome.
    pub fn attempt(&self) -> &OrderAttempt {
        match self {
            OrderOutcome::Completed(confirmation) => &confirmation.attempt,
            OrderOutcome::Failed(failure) => &failure.attempt,
        }
    }
}
