//! Marketplace domain types for TurboCommerce.
//!
//! This crate holds the pure, I/O-free half of the storefront core:
//!
//! - **Cart**: server-authoritative line items, one line per listing, derived totals
//! - **Checkout**: shipping addresses, immutable orders, the order status lifecycle
//! - **Money**: integer-cent amounts for a single currency
//!
//! # Example
//!
//! ```rust
//! use turbo_commerce::prelude::*;
//!
//! let status = OrderStatus::Pending;
//! assert!(status.can_transition_to(OrderStatus::Processing));
//! assert!(status.transition(OrderStatus::Delivered).is_err());
//!
//! let address = ShippingAddress::new("1 Main St", "Springfield", "IL", "USA");
//! assert!(address.validate().is_ok());
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod party;

pub mod cart;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;
pub use party::Party;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;
    pub use crate::party::Party;

    // Cart
    pub use crate::cart::{Cart, CartLine, CartTotals, ListingSnapshot, ListingStatus};

    // Checkout
    pub use crate::checkout::{ListingInfo, Order, OrderStatus, PaymentMethod, ShippingAddress};
}
