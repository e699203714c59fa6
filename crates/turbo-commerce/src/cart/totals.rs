//! Totals derived from cart lines.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Cart totals.
///
/// Never stored alongside the lines; always produced by [`Cart::totals`]
/// from the current lines.
///
/// [`Cart::totals`]: crate::cart::Cart::totals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of line quantities.
    pub total_quantity: u64,
    /// Sum of price x quantity over every line.
    pub total_amount: Money,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there is nothing in the cart.
    pub fn is_empty(&self) -> bool {
        self.total_quantity == 0
    }
}
