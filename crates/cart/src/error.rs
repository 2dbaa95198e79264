//! Cart error types.

use common::Money;
use thiserror::Error;

/// Errors that can occur while editing a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Item name is empty or whitespace.
    #[error("Invalid input: item name must not be empty")]
    EmptyName,

    /// Item price is below zero.
    #[error("Invalid input: price for '{name}' is {price} (must be zero or more)")]
    NegativePrice { name: String, price: Money },

    /// Adding the item would push the cart total past the largest amount.
    #[error("Invalid input: price for '{name}' of {price} overflows the cart total")]
    TotalOverflow { name: String, price: Money },
}

/// Convenience type alias for cart results.
pub type Result<T> = std::result::Result<T, CartError>;
