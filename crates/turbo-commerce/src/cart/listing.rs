//! Listing snapshot carried on a cart line.

use crate::ids::ListingId;
use crate::money::Money;
use crate::party::Party;
use serde::{Deserialize, Serialize};

/// Availability of a listing in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ListingStatus {
    /// Listed and purchasable.
    #[default]
    Available,
    /// Sold out or withdrawn.
    #[serde(alias = "Sold")]
    Unavailable,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "Available",
            ListingStatus::Unavailable => "Unavailable",
        }
    }
}

/// Denormalized view of a listing, as the backend returned it with the cart.
///
/// The price here is whatever the catalog said at the time of the last cart
/// mutation; it is refreshed every time the server returns the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingSnapshot {
    /// Listing ID.
    #[serde(rename = "_id")]
    pub id: ListingId,
    /// Title.
    pub title: String,
    /// Author.
    #[serde(default)]
    pub author: String,
    /// Unit price.
    pub price: Money,
    /// Image URLs, first one is the cover.
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// The seller, when the backend populated it.
    #[serde(default)]
    pub seller: Option<Party>,
    /// Catalog availability.
    #[serde(default)]
    pub status: ListingStatus,
}

impl ListingSnapshot {
    /// Create a snapshot with the minimum display fields.
    pub fn new(
        id: impl Into<ListingId>,
        title: impl Into<String>,
        author: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            price,
            image_urls: Vec::new(),
            seller: None,
            status: ListingStatus::Available,
        }
    }

    /// Set the seller.
    pub fn with_seller(mut self, seller: impl Into<Party>) -> Self {
        self.seller = Some(seller.into());
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    /// Check if the listing can still be bought.
    pub fn is_available(&self) -> bool {
        self.status == ListingStatus::Available
    }

    /// Cover image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}
