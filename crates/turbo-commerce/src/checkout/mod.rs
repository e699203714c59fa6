//! Checkout module.
//!
//! Contains shipping addresses, orders, and the order status lifecycle.

mod address;
mod order;
mod status;

pub use address::ShippingAddress;
pub use order::{ListingInfo, Order, PaymentMethod};
pub use status::OrderStatus;
