//! Single entry point owning a cart and a coordinator.

use cart::{Cart, CartError, LineItem};
use common::Money;

use crate::coordinator::OrderCoordinator;
use crate::outcome::OrderOutcome;
use crate::services::{InventoryService, PaymentService, ShippingService};

/// A shopping session: fill the cart, then place the order.
///
/// The cart is cleared after a completed order and kept after a failed one,
/// so the customer can fix the problem and try again.
pub struct OrderFacade<I, P, Sh>
where
    I: InventoryService,
    P: PaymentService,
    Sh: ShippingService,
{
    cart: Cart,
    coordinator: OrderCoordinator<I, P, Sh>,
}

impl<I, P, Sh> OrderFacade<I, P, Sh>
where
    I: InventoryService,
    P: PaymentService,
    Sh: ShippingService,
{
    /// Creates a facade with an empty cart.
    pub fn new(coordinator: OrderCoordinator<I, P, Sh>) -> Self {
        Self {
            cart: Cart::new(),
            coordinator,
        }
    }

    pub fn add_to_cart(&mut self, name: impl Into<String>, price: Money) -> Result<(), CartError> {
        self.cart.add_item(name, price)
    }

    pub fn remove_from_cart(&mut self, name: &str) -> Option<LineItem> {
        self.cart.remove_item(name)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn coordinator(&self) -> &OrderCoordinator<I, P, Sh> {
        &self.coordinator
    }

    /// Places an order for the cart's current contents.
    pub fn place_order(&mut self, card_token: &str, address: &str) -> OrderOutcome {
        let outcome = self.coordinator.place_order(&self.cart, card_token, address);
        if outcome.is_completed() {
            self.cart.clear();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InMemoryInventoryService, InMemoryPaymentService, InMemoryShippingService};

    fn facade() -> OrderFacade<InMemoryInventoryService, InMemoryPaymentService, InMemoryShippingService>
    {
        OrderFacade::new(OrderCoordinator::new(
            InMemoryInventoryService::new(),
            InMemoryPaymentService::new(),
            InMemoryShippingService::new(),
        ))
    }

    #[test]
    fn test_completed_order_clears_cart() {
        let mut facade = facade();
        facade.add_to_cart("Laptop", Money::from_dollars(800)).unwrap();

        let outcome = facade.place_order("1234-5678", "NY-Street");

        assert!(outcome.is_completed());
        assert!(facade.cart().is_empty());
    }

    #[test]
    fn test_failed_order_keeps_cart_for_retry() {
        let mut facade = facade();
        facade.add_to_cart("Gaming PC", Money::from_dollars(2000)).unwrap();

        let outcome = facade.place_order("1234-5678", "LA-Avenue");
        assert!(!outcome.is_completed());
        assert_eq!(facade.cart().len(), 1);

        facade.remove_from_cart("Gaming PC");
        facade.add_to_cart("Laptop", Money::from_dollars(900)).unwrap();
        let retry = facade.place_order("1234-5678", "LA-Avenue");
        assert!(retry.tracking_id().unwrap().starts_with("TRACK-LA-"));
    }

    #[test]
    fn test_invalid_price_rejected_by_cart() {
        let mut facade = facade();
        assert!(facade.add_to_cart("Laptop", Money::from_cents(-1)).is_err());
        assert!(facade.cart().is_empty());
    }
}
