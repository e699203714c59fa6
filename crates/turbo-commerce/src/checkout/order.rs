//! Order types.

use crate::cart::CartLine;
use crate::checkout::{OrderStatus, ShippingAddress};
use crate::error::CommerceError;
use crate::ids::{ListingId, OrderId, UserId};
use crate::money::Money;
use crate::party::Party;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method. The marketplace only takes cash on delivery.
///
/// The backend stores the method as free text, so any spelling reads back
/// as cash on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "Option<String>")]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl From<Option<String>> for PaymentMethod {
    fn from(_: Option<String>) -> Self {
        PaymentMethod::CashOnDelivery
    }
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing details frozen into an order when it is placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingInfo {
    pub listing_id: ListingId,
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// Unit price at order time.
    pub price: Money,
    pub quantity: u32,
}

impl ListingInfo {
    /// Price times quantity.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }
}

impl From<&CartLine> for ListingInfo {
    fn from(line: &CartLine) -> Self {
        Self {
            listing_id: line.listing.id.clone(),
            title: line.listing.title.clone(),
            author: line.listing.author.clone(),
            price: line.listing.price,
            quantity: line.quantity,
        }
    }
}

/// A placed order.
///
/// Everything except the status is fixed at creation. The status changes
/// only through [`Order::transitioned`], which follows the lifecycle in
/// [`OrderStatus`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    id: OrderId,
    buyer: Party,
    seller: Party,
    listing_info: ListingInfo,
    total_price: Money,
    #[serde(default)]
    payment_method: PaymentMethod,
    shipping_address: ShippingAddress,
    #[serde(default)]
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Place a pending order for one cart line.
    pub fn place(
        id: impl Into<OrderId>,
        buyer: impl Into<Party>,
        seller: impl Into<Party>,
        line: &CartLine,
        shipping_address: ShippingAddress,
        now: DateTime<Utc>,
    ) -> Result<Self, CommerceError> {
        shipping_address.validate()?;
        let listing_info = ListingInfo::from(line);
        let total_price = listing_info.line_total().ok_or(CommerceError::Overflow)?;

        Ok(Self {
            id: id.into(),
            buyer: buyer.into(),
            seller: seller.into(),
            listing_info,
            total_price,
            payment_method: PaymentMethod::CashOnDelivery,
            shipping_address,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// A copy of this order moved to `to`.
    pub fn transitioned(&self, to: OrderStatus, now: DateTime<Utc>) -> Result<Self, CommerceError> {
        let status = self.status.transition(to)?;
        Ok(Self {
            status,
            updated_at: now,
            ..self.clone()
        })
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn buyer(&self) -> &Party {
        &self.buyer
    }

    pub fn seller(&self) -> &Party {
        &self.seller
    }

    pub fn buyer_id(&self) -> &UserId {
        self.buyer.id()
    }

    pub fn seller_id(&self) -> &UserId {
        self.seller.id()
    }

    pub fn listing_info(&self) -> &ListingInfo {
        &self.listing_info
    }

    /// Price the backend charged.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
