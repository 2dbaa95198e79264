//! Shopping cart.

use std::collections::BTreeMap;

use common::Money;
use serde::{Deserialize, Serialize};

use crate::error::{CartError, Result};
use crate::item::LineItem;

/// A shopping cart keyed by item name.
///
/// Items are kept ordered by name, so snapshots and the order in which
/// items are reserved are deterministic. Adding an item whose name is
/// already present replaces its price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: BTreeMap<String, Money>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item, overwriting the price of an existing item with the same name.
    pub fn add_item(&mut self, name: impl Into<String>, price: Money) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CartError::EmptyName);
        }
        if price.is_negative() {
            return Err(CartError::NegativePrice { name, price });
        }
        let others: Money = self
            .items
            .iter()
            .filter(|(existing, _)| **existing != name)
            .map(|(_, price)| *price)
            .sum();
        if others.checked_add(price).is_none() {
            return Err(CartError::TotalOverflow { name, price });
        }

        tracing::debug!(item = %name, %price, "item added to cart");
        self.items.insert(name, price);
        Ok(())
    }

    /// Removes an item by name, returning it if it was present.
    pub fn remove_item(&mut self, name: &str) -> Option<LineItem> {
        self.items
            .remove_entry(name)
            .map(|(name, price)| LineItem { name, price })
    }

    /// Returns the price of the named item, if present.
    pub fn price_of(&self, name: &str) -> Option<Money> {
        self.items.get(name).copied()
    }

    /// Sum of all item prices. Zero for an empty cart.
    ///
    /// `add_item` keeps the sum within range, so this never overflows.
    pub fn total(&self) -> Money {
        self.items.values().copied().sum()
    }

    /// Returns an owned snapshot of the current items.
    ///
    /// Later changes to the cart do not affect a snapshot already taken.
    pub fn items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|(name, price)| LineItem::new(name.clone(), *price))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
