//! Saga error types.

use thiserror::Error;

/// Errors raised by the collaborators and guards of an order attempt.
///
/// The coordinator never returns these directly. Each one is caught,
/// compensated for, and converted into a [`FailureReason`](crate::FailureReason).
#[derive(Debug, Error)]
pub enum SagaError {
    /// The cart had no items when the order was placed.
    #[error("Cart is empty")]
    EmptyCart,

    /// A caller-supplied value was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The item is not part of the inventory catalog.
    #[error("Item not found in catalog: {item}")]
    ItemNotFound { item: String },

    /// The item has no stock left to reserve.
    #[error("Out of stock: {item}")]
    OutOfStock { item: String },

    /// The payment provider rejected the charge.
    #[error("Payment declined: {reason}")]
    PaymentDeclined { reason: String },

    /// The shipping address cannot be used.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Inventory service error.
    #[error("Inventory service error: {0}")]
    InventoryService(String),

    /// Payment service error.
    #[error("Payment service error: {0}")]
    PaymentService(String),

    /// Shipping service error.
    #[error("Shipping service error: {0}")]
    ShippingService(String),
}
