//! Cart line items.

use common::Money;
use serde::{Deserialize, Serialize};

/// A single named item in a cart with its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name, unique within a cart.
    pub name: String,

    /// Price of the item.
    pub price: Money,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

impl std::fmt::Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let item = LineItem::new("Laptop", Money::from_dollars(800));
        assert_eq!(item.to_string(), "Laptop ($800.00)");
    }

    #[test]
    fn test_serialization_shape() {
        let item = LineItem::new("Laptop", Money::from_cents(999));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "Laptop");
        assert_eq!(json["price"], 999);
    }
}
