//! Inventory service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use common::AttemptId;
use serde::{Deserialize, Serialize};

use crate::error::SagaError;

/// State of a single item's reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationState {
    /// Held for an in-flight order attempt.
    Reserved,
    /// Hold given back; stock is available again.
    Released,
    /// Hold turned into a permanent deduction by a completed order.
    Committed,
}

/// A reservation of one item by one order attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    /// The reserved item's name.
    pub item: String,
    /// Current state of the reservation.
    pub state: ReservationState,
}

impl ReservationRecord {
    /// Creates a record in the `Reserved` state.
    pub fn reserved(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            state: ReservationState::Reserved,
        }
    }
}

/// Trait for inventory management operations.
///
/// Holds are owned by an attempt: each attempt that reserves an item takes
/// its own unit, and `release`/`commit` only settle that attempt's hold.
pub trait InventoryService: Send + Sync {
    /// Returns true if the item can be reserved right now.
    ///
    /// Fails with [`SagaError::ItemNotFound`] for items outside the catalog.
    fn check_stock(&self, item: &str) -> Result<bool, SagaError>;

    /// Places a hold on one unit of the item for `attempt_id`.
    ///
    /// Reserving an item the attempt already holds does not take a second
    /// unit. Fails with [`SagaError::OutOfStock`] if no unit is available.
    fn reserve(&self, attempt_id: AttemptId, item: &str) -> Result<ReservationRecord, SagaError>;

    /// Gives the attempt's hold back. Releasing an item the attempt does not
    /// hold is a no-op.
    fn release(&self, attempt_id: AttemptId, item: &str) -> Result<(), SagaError>;

    /// Turns the attempt's hold into a permanent deduction. Committing an
    /// item the attempt does not hold is a no-op.
    fn commit(&self, attempt_id: AttemptId, item: &str) -> Result<(), SagaError>;
}

type HoldKey = (AttemptId, String);

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    /// Units available per item. `None` means every item is known and
    /// stock is unlimited.
    stock: Option<HashMap<String, u32>>,
    holds: HashMap<HoldKey, ReservationState>,
    release_calls: HashMap<String, usize>,
    fail_on_release: bool,
    fail_on_commit: bool,
}

impl InMemoryInventoryState {
    fn in_stock(&self, item: &str) -> Result<bool, SagaError> {
        match &self.stock {
            None => Ok(true),
            Some(stock) => stock
                .get(item)
                .map(|available| *available > 0)
                .ok_or_else(|| SagaError::ItemNotFound {
                    item: item.to_string(),
                }),
        }
    }

    fn adjust_stock(&mut self, item: &str, reserve: bool) {
        if let Some(available) = self.stock.as_mut().and_then(|s| s.get_mut(item)) {
            if reserve {
                *available = available.saturating_sub(1);
            } else {
                *available += 1;
            }
        }
    }

    fn hold(&self, attempt_id: AttemptId, item: &str) -> Option<ReservationState> {
        self.holds.get(&(attempt_id, item.to_string())).copied()
    }
}

/// In-memory inventory service for tests and demos.
///
/// Clones share the same state. Check-and-reserve of an item happens under a
/// single write lock, so concurrent attempts never hold more units than the
/// catalog has.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryService {
    state: Arc<RwLock<InMemoryInventoryState>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryInventoryService {
    /// Creates an inventory where every item is known and always in stock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory limited to the given catalog and quantities.
    pub fn with_stock<I, S>(stock: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let service = Self::default();
        service.state.write().unwrap().stock = Some(
            stock
                .into_iter()
                .map(|(item, quantity)| (item.into(), quantity))
                .collect(),
        );
        service
    }

    /// Sets the available quantity of an item, adding it to the catalog.
    ///
    /// Has no effect on an unlimited inventory.
    pub fn set_stock(&self, item: impl Into<String>, quantity: u32) {
        if let Some(stock) = self.state.write().unwrap().stock.as_mut() {
            stock.insert(item.into(), quantity);
        }
    }

    /// Configures release calls to fail.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.state.write().unwrap().fail_on_release = fail;
    }

    /// Configures commit calls to fail.
    pub fn set_fail_on_commit(&self, fail: bool) {
        self.state.write().unwrap().fail_on_commit = fail;
    }

    /// Returns the available quantity, or `None` for unlimited or unknown items.
    pub fn available(&self, item: &str) -> Option<u32> {
        self.state
            .read()
            .unwrap()
            .stock
            .as_ref()
            .and_then(|s| s.get(item).copied())
    }

    /// Returns the state of an attempt's hold on an item, if it ever reserved it.
    pub fn reservation_state(&self, attempt_id: AttemptId, item: &str) -> Option<ReservationState> {
        self.state.read().unwrap().hold(attempt_id, item)
    }

    /// Returns the number of holds currently in the `Reserved` state.
    pub fn reserved_count(&self) -> usize {
        self.state
            .read()
            .unwrap()
            .holds
            .values()
            .filter(|s| **s == ReservationState::Reserved)
            .count()
    }

    /// Returns how many attempts hold an item in the given state.
    pub fn holds_in_state(&self, item: &str, state: ReservationState) -> usize {
        self.state
            .read()
            .unwrap()
            .holds
            .iter()
            .filter(|((_, held), s)| held == item && **s == state)
            .count()
    }

    /// Returns how many times `release` was called for an item.
    pub fn release_calls(&self, item: &str) -> usize {
        self.state
            .read()
            .unwrap()
            .release_calls
            .get(item)
            .copied()
            .unwrap_or(0)
    }

    /// Returns the total number of trait calls made against this service.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn track_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl InventoryService for InMemoryInventoryService {
    fn check_stock(&self, item: &str) -> Result<bool, SagaError> {
        self.track_call();
        self.state.read().unwrap().in_stock(item)
    }

    fn reserve(&self, attempt_id: AttemptId, item: &str) -> Result<ReservationRecord, SagaError> {
        self.track_call();
        let mut state = self.state.write().unwrap();

        if state.hold(attempt_id, item) == Some(ReservationState::Reserved) {
            return Ok(ReservationRecord::reserved(item));
        }
        if !state.in_stock(item)? {
            return Err(SagaError::OutOfStock {
                item: item.to_string(),
            });
        }

        state
            .holds
            .insert((attempt_id, item.to_string()), ReservationState::Reserved);
        state.adjust_stock(item, true);

        tracing::debug!(%attempt_id, item, "inventory reserved");
        Ok(ReservationRecord::reserved(item))
    }

    fn release(&self, attempt_id: AttemptId, item: &str) -> Result<(), SagaError> {
        self.track_call();
        let mut state = self.state.write().unwrap();
        *state.release_calls.entry(item.to_string()).or_default() += 1;

        if state.fail_on_release {
            return Err(SagaError::InventoryService(
                "Release unavailable".to_string(),
            ));
        }

        if state.hold(attempt_id, item) == Some(ReservationState::Reserved) {
            state
                .holds
                .insert((attempt_id, item.to_string()), ReservationState::Released);
            state.adjust_stock(item, false);
            tracing::debug!(%attempt_id, item, "inventory released");
        }
        Ok(())
    }

    fn commit(&self, attempt_id: AttemptId, item: &str) -> Result<(), SagaError> {
        self.track_call();
        let mut state = self.state.write().unwrap();

        if state.fail_on_commit {
            return Err(SagaError::InventoryService(
                "Commit unavailable".to_string(),
            ));
        }

        if let Some(hold) = state.holds.get_mut(&(attempt_id, item.to_string())) {
            if *hold == ReservationState::Reserved {
                *hold = ReservationState::Committed;
            }
        }
        Ok(())
    }
}
