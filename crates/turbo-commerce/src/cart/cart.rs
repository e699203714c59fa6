//! Cart and cart line types.

use crate::cart::{CartTotals, ListingSnapshot};
use crate::error::CommerceError;
use crate::ids::{LineId, ListingId, UserId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_LINE: u32 = 9999;

/// Check a caller-supplied quantity.
///
/// The per-line cap applies to what this client asks for. Carts read back
/// from the server are only checked for a zero quantity.
pub fn validate_quantity(quantity: u32) -> Result<(), CommerceError> {
    if quantity == 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_LINE {
        return Err(CommerceError::QuantityExceedsLimit(
            u64::from(quantity),
            MAX_QUANTITY_PER_LINE,
        ));
    }
    Ok(())
}

/// A user's cart, exactly as the server last reported it.
///
/// A cart holds at most one line per listing. The constructor and the
/// deserializer both reject payloads that break this, so a `Cart` value in
/// hand always satisfies it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(try_from = "CartPayload")]
pub struct Cart {
    items: Vec<CartLine>,
}

/// Wire shape of `GET /cart` and the cart mutation responses.
#[derive(Deserialize)]
struct CartPayload {
    #[serde(default)]
    items: Vec<CartLine>,
}

impl TryFrom<CartPayload> for Cart {
    type Error = CommerceError;

    fn try_from(payload: CartPayload) -> Result<Self, Self::Error> {
        Cart::from_lines(payload.items)
    }
}

impl Cart {
    /// An empty cart.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a cart from lines, enforcing one line per listing.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CommerceError> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if line.quantity == 0 {
                return Err(CommerceError::InvalidQuantity(0));
            }
            if !seen.insert(&line.listing.id) {
                return Err(CommerceError::DuplicateListing(line.listing.id.clone()));
            }
        }
        Ok(Self { items: lines })
    }

    /// Lines in server order.
    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Get a line by ID.
    pub fn line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.items.iter().find(|l| &l.id == line_id)
    }

    /// Get the line holding a listing.
    pub fn line_for_listing(&self, listing_id: &ListingId) -> Option<&CartLine> {
        self.items.iter().find(|l| &l.listing.id == listing_id)
    }

    /// Check if a listing is already in the cart.
    pub fn contains_listing(&self, listing_id: &ListingId) -> bool {
        self.line_for_listing(listing_id).is_some()
    }

    /// A copy of this cart without the given line.
    pub fn without_line(&self, line_id: &LineId) -> Cart {
        Cart {
            items: self.items.iter().filter(|l| &l.id != line_id).cloned().collect(),
        }
    }

    /// Lines whose listing the catalog marked unavailable.
    pub fn unavailable_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.items.iter().filter(|l| !l.listing.is_available())
    }

    /// Distinct sellers across all lines, in first-seen order.
    pub fn sellers(&self) -> Vec<&UserId> {
        let mut sellers: Vec<&UserId> = Vec::new();
        for seller in self.items.iter().filter_map(|l| l.listing.seller.as_ref()) {
            if !sellers.contains(&seller.id()) {
                sellers.push(seller.id());
            }
        }
        sellers
    }

    /// Recompute totals from the current lines.
    pub fn totals(&self) -> Result<CartTotals, CommerceError> {
        let total_quantity = self.items.iter().map(|l| u64::from(l.quantity)).sum();
        let total_amount = self
            .items
            .iter()
            .map(CartLine::line_total)
            .try_fold(Money::zero(), |acc, line| {
                line.and_then(|amount| acc.checked_add(amount))
            })
            .ok_or(CommerceError::Overflow)?;

        Ok(CartTotals {
            total_quantity,
            total_amount,
        })
    }
}

/// One listing and its quantity within a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Line ID assigned by the backend.
    #[serde(rename = "_id")]
    pub id: LineId,
    /// Listing snapshot.
    pub listing: ListingSnapshot,
    /// Quantity, at least one.
    pub quantity: u32,
}

impl CartLine {
    /// Create a line.
    pub fn new(id: impl Into<LineId>, listing: ListingSnapshot, quantity: u32) -> Self {
        Self {
            id: id.into(),
            listing,
            quantity,
        }
    }

    /// Unit price times quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.listing.price.checked_mul(self.quantity)
    }

    /// Quantity after adding `additional` to this line.
    pub fn merged_quantity(&self, additional: u32) -> Result<u32, CommerceError> {
        let merged = u64::from(self.quantity) + u64::from(additional);
        if merged > u64::from(MAX_QUANTITY_PER_LINE) {
            return Err(CommerceError::QuantityExceedsLimit(merged, MAX_QUANTITY_PER_LINE));
        }
        Ok(merged as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ListingStatus;

    fn line(id: &str, listing: &str, cents: i64, quantity: u32) -> CartLine {
        CartLine::new(
            id,
            ListingSnapshot::new(listing, "Title", "Author", Money::from_cents(cents)),
            quantity,
        )
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::empty();
        assert!(cart.is_empty());
        assert_eq!(cart.totals().unwrap(), CartTotals::empty());
    }

    #[test]
    fn test_totals_recomputed_from_lines() {
        let cart = Cart::from_lines(vec![
            line("l1", "a", 1000, 3),
            line("l2", "b", 250, 2),
        ])
        .unwrap();

        let totals = cart.totals().unwrap();
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.total_amount, Money::from_cents(3500));
    }

    #[test]
    fn test_duplicate_listing_rejected() {
        let result = Cart::from_lines(vec![line("l1", "a", 1000, 1), line("l2", "a", 1000, 2)]);
        assert_eq!(
            result,
            Err(CommerceError::DuplicateListing(ListingId::new("a")))
        );
    }

    #[test]
    fn test_zero_quantity_line_rejected() {
        let result = Cart::from_lines(vec![line("l1", "a", 1000, 0)]);
        assert_eq!(result, Err(CommerceError::InvalidQuantity(0)));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_listing() {
        let json = r#"{"items":[
            {"_id":"l1","listing":{"_id":"a","title":"T","price":1},"quantity":1},
            {"_id":"l2","listing":{"_id":"a","title":"T","price":1},"quantity":1}
        ]}"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_deserialize_keeps_quantity_above_client_cap() {
        let json = r#"{"items":[
            {"_id":"l1","listing":{"_id":"a","title":"T","price":1},"quantity":10000}
        ]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.lines()[0].quantity, 10000);
        assert_eq!(cart.totals().unwrap().total_quantity, 10000);
        assert!(validate_quantity(10000).is_err());
    }

    #[test]
    fn test_deserialize_missing_items_is_empty() {
        let cart: Cart = serde_json::from_str("{}").unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lookup_by_listing_and_line() {
        let cart = Cart::from_lines(vec![line("l1", "a", 1000, 1)]).unwrap();
        assert!(cart.contains_listing(&ListingId::new("a")));
        assert_eq!(cart.line(&LineId::new("l1")).unwrap().quantity, 1);
        assert!(cart.line_for_listing(&ListingId::new("zz")).is_none());
    }

    #[test]
    fn test_without_line() {
        let cart = Cart::from_lines(vec![line("l1", "a", 1000, 1), line("l2", "b", 500, 1)]).unwrap();
        let trimmed = cart.without_line(&LineId::new("l1"));
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed.totals().unwrap().total_amount, Money::from_cents(500));
        assert_eq!(trimmed.without_line(&LineId::new("l1")), trimmed);
    }

    #[test]
    fn test_merged_quantity() {
        let l = line("l1", "a", 1000, 1);
        assert_eq!(l.merged_quantity(2), Ok(3));
        assert!(l.merged_quantity(MAX_QUANTITY_PER_LINE).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert_eq!(validate_quantity(0), Err(CommerceError::InvalidQuantity(0)));
        assert!(validate_quantity(MAX_QUANTITY_PER_LINE + 1).is_err());
    }

    #[test]
    fn test_unavailable_lines_and_sellers() {
        let mut sold = line("l2", "b", 500, 1);
        sold.listing = sold
            .listing
            .with_status(ListingStatus::Unavailable)
            .with_seller(UserId::new("s2"));
        let mut first = line("l1", "a", 500, 1);
        first.listing = first.listing.with_seller(UserId::new("s1"));
        let mut third = line("l3", "c", 500, 1);
        third.listing = third.listing.with_seller(UserId::new("s1"));

        let cart = Cart::from_lines(vec![first, sold, third]).unwrap();

        let unavailable: Vec<_> = cart.unavailable_lines().map(|l| l.id.as_str()).collect();
        assert_eq!(unavailable, vec!["l2"]);
        assert_eq!(
            cart.sellers(),
            vec![&UserId::new("s1"), &UserId::new("s2")]
        );
    }
}
