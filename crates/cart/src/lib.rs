//! Cart layer for the checkout workspace.
//!
//! Holds the line items a customer intends to buy and computes the
//! order total that the saga later charges.

pub mod cart;
pub mod error;
pub mod item;

pub use cart::Cart;
pub use error::CartError;
pub use item::LineItem;
