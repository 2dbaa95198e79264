//! Order placement policy constants.

/// Default maximum amount a single charge may have, in whole dollars.
pub const DEFAULT_PAYMENT_LIMIT_DOLLARS: i64 = 1000;

/// Decline reason reported when a charge is above the payment limit.
pub const LIMIT_EXCEEDED: &str = "limit exceeded";

/// Default minimum number of characters a shipping address must have.
///
/// Tracking ids embed the first three characters of the address.
pub const DEFAULT_MIN_ADDRESS_LEN: usize = 3;

/// Prefix of every tracking id.
pub const TRACKING_PREFIX: &str = "TRACK";

/// Phase name: Reserve every cart item.
pub const STEP_RESERVE_INVENTORY: &str = "reserve_inventory";

/// Phase name: Charge the cart total.
pub const STEP_PROCESS_PAYMENT: &str = "process_payment";

/// Phase name: Create the shipment.
pub const STEP_CREATE_SHIPMENT: &str = "create_shipment";
