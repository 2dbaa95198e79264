//! Saga pattern implementation for order placement.
//!
//! This crate places an order for a cart by driving three collaborators in
//! sequence, with compensating rollback on failure:
//! 1. Reserve every cart item in inventory
//! 2. Charge the cart total
//! 3. Create the shipment
//!
//! If a step fails, every reservation made by the attempt is released before
//! the call returns. A payment captured before a shipping failure is reported,
//! not refunded.

pub mod attempt;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod facade;
pub mod order_fulfillment;
pub mod outcome;
pub mod services;
pub mod state;

pub use attempt::OrderAttempt;
pub use coordinator::OrderCoordinator;
pub use error::SagaError;
pub use events::AttemptEvent;
pub use facade::OrderFacade;
pub use outcome::{FailureReason, OrderConfirmation, OrderFailure, OrderOutcome};
pub use services::{
    InMemoryInventoryService, InMemoryPaymentService, InMemoryShippingService, InventoryService,
    PaymentResult, PaymentService, ReservationRecord, ReservationState, Shipment,
    ShippingService,
};
pub use state::OrderState;
