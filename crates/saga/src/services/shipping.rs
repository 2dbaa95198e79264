//! Shipping service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::SagaError;
use crate::order_fulfillment;

/// A created shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// The tracking id assigned by the shipping service.
    pub tracking_id: String,
    /// Destination address.
    pub address: String,
}

/// Trait for shipping operations.
pub trait ShippingService: Send + Sync {
    /// Creates a shipment to the given address.
    fn create_shipment(&self, address: &str) -> Result<Shipment, SagaError>;
}

#[derive(Debug, Default)]
struct InMemoryShippingState {
    shipments: HashMap<String, String>,
    next_seq: u64,
    create_calls: usize,
    fail_on_create: bool,
}

/// In-memory shipping service.
///
/// Tracking ids have the form `TRACK-<first 3 chars of address>-<seq>`,
/// where the sequence number increases with every shipment.
#[derive(Debug, Clone)]
pub struct InMemoryShippingService {
    min_address_len: usize,
    state: Arc<RwLock<InMemoryShippingState>>,
}

impl InMemoryShippingService {
    /// Creates a shipping service with the default minimum address length.
    pub fn new() -> Self {
        Self::with_min_address_len(order_fulfillment::DEFAULT_MIN_ADDRESS_LEN)
    }

    /// Creates a shipping service that rejects addresses shorter than `min_len`.
    ///
    /// The floor is three characters so that the tracking id prefix is
    /// always complete.
    pub fn with_min_address_len(min_len: usize) -> Self {
        Self {
            min_address_len: min_len.max(order_fulfillment::DEFAULT_MIN_ADDRESS_LEN),
            state: Arc::default(),
        }
    }

    /// Returns the minimum accepted address length.
    pub fn min_address_len(&self) -> usize {
        self.min_address_len
    }

    /// Configures the service to fail every create call with an error.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of created shipments.
    pub fn shipment_count(&self) -> usize {
        self.state.read().unwrap().shipments.len()
    }

    /// Returns true if a shipment exists with the given tracking id.
    pub fn has_shipment(&self, tracking_id: &str) -> bool {
        self.state
            .read()
            .unwrap()
            .shipments
            .contains_key(tracking_id)
    }

    /// Returns the number of create calls received.
    pub fn create_count(&self) -> usize {
        self.state.read().unwrap().create_calls
    }
}

impl Default for InMemoryShippingService {
    fn default() -> Self {
        Self::new()
    }
}

impl ShippingService for InMemoryShippingService {
    fn create_shipment(&self, address: &str) -> Result<Shipment, SagaError> {
        let mut state = self.state.write().unwrap();
        state.create_calls += 1;

        if state.fail_on_create {
            return Err(SagaError::ShippingService(
                "Shipping unavailable".to_string(),
            ));
        }

        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(SagaError::InvalidAddress {
                address: address.to_string(),
                reason: "address is empty".to_string(),
            });
        }
        if trimmed.chars().count() < self.min_address_len {
            return Err(SagaError::InvalidAddress {
                address: address.to_string(),
                reason: format!(
                    "address must have at least {} characters",
                    self.min_address_len
                ),
            });
        }

        state.next_seq += 1;
        let prefix: String = trimmed.chars().take(3).collect();
        let tracking_id = format!(
            "{}-{}-{:04}",
            order_fulfillment::TRACKING_PREFIX,
            prefix,
            state.next_seq
        );
        state
            .shipments
            .insert(tracking_id.clone(), trimmed.to_string());

        Ok(Shipment {
            tracking_id,
            address: trimmed.to_string(),
        })
    }
}
