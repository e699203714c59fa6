//! Commerce error types.

use crate::checkout::OrderStatus;
use crate::ids::ListingId;
use thiserror::Error;

/// Errors raised by domain invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Quantity must be at least one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u64, u32),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// A cart payload listed the same listing on two lines.
    #[error("Listing {0} appears on more than one cart line")]
    DuplicateListing(ListingId),

    /// Required shipping address fields are blank.
    #[error("Shipping address incomplete: missing {}", .missing.join(", "))]
    IncompleteAddress { missing: Vec<&'static str> },

    /// Status change not permitted by the order lifecycle.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Unrecognised status name.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),
}
