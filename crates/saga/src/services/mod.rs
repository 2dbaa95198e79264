//! Collaborator traits and in-memory implementations for the order saga.

pub mod inventory;
pub mod payment;
pub mod shipping;

pub use inventory::{
    InMemoryInventoryService, InventoryService, ReservationRecord, ReservationState,
};
pub use payment::{InMemoryPaymentService, PaymentResult, PaymentService};
pub use shipping::{InMemoryShippingService, Shipment, ShippingService};
