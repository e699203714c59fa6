//! Shopping cart module.
//!
//! Contains the cart, its lines, the denormalized listing snapshot carried on
//! each line, and the totals derived from them.

mod cart;
mod listing;
mod totals;

pub use cart::{validate_quantity, Cart, CartLine, MAX_QUANTITY_PER_LINE};
pub use listing::{ListingSnapshot, ListingStatus};
pub use totals::CartTotals;
