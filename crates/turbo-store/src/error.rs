//! Store error taxonomy.

use crate::feedback::{Feedback, FeedbackDetail};
use thiserror::Error;
use turbo_commerce::checkout::OrderStatus;
use turbo_commerce::ids::{ListingId, OrderId};
use turbo_commerce::CommerceError;
use turbo_data::FetchError;

/// Every way a cart or order operation can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backend could not be reached or did not answer in time.
    #[error("Network error: {0}")]
    Network(String),

    /// The session is over; the user has to log in again.
    #[error("Your session has expired, please log in again")]
    Auth(String),

    /// Caller-supplied data was rejected.
    #[error("{message}")]
    Validation {
        /// Offending fields, when known.
        fields: Vec<String>,
        message: String,
    },

    /// The listing is already in the cart. Informational.
    #[error("Listing {listing_id} is already in your cart")]
    DuplicateItem { listing_id: ListingId },

    /// The same operation is still running for this key. Informational.
    #[error("An update for {key} is already in progress")]
    AlreadyInProgress { key: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A listing became unavailable between display and checkout.
    #[error("{message}")]
    StaleCart {
        listing_id: Option<ListingId>,
        message: String,
    },

    /// The order lifecycle does not allow this status change.
    #[error("{}", transition_message(.from, .to))]
    InvalidTransition {
        order_id: Option<OrderId>,
        /// Current status, when known.
        from: Option<OrderStatus>,
        to: OrderStatus,
    },

    /// The actor may not perform this operation.
    #[error("You are not allowed to do that: {0}")]
    Authorization(String),

    /// The addressed cart line or order does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend failed.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The backend answered with something unreadable.
    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),

    /// A cart mutation failed for a specific listing.
    #[error("{source}")]
    Listing {
        listing_id: ListingId,
        #[source]
        source: Box<StoreError>,
    },
}

fn transition_message(from: &Option<OrderStatus>, to: &OrderStatus) -> String {
    match from {
        Some(from) => format!("Cannot move an order from {} to {}", from, to),
        None => format!("Cannot move this order to {}", to),
    }
}

impl StoreError {
    /// Validation failure for named fields.
    pub fn validation(fields: &[&str], message: impl Into<String>) -> Self {
        StoreError::Validation {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            message: message.into(),
        }
    }

    /// Attribute this error to a listing.
    pub fn for_listing(self, listing_id: &ListingId) -> Self {
        match self {
            e @ (StoreError::Listing { .. } | StoreError::DuplicateItem { .. }) => e,
            other => StoreError::Listing {
                listing_id: listing_id.clone(),
                source: Box::new(other),
            },
        }
    }

    /// The error underneath any listing attribution.
    pub fn root(&self) -> &StoreError {
        match self {
            StoreError::Listing { source, .. } => source.root(),
            other => other,
        }
    }

    /// The listing this failure concerns, if any.
    pub fn listing_id(&self) -> Option<&ListingId> {
        match self {
            StoreError::Listing { listing_id, .. } => Some(listing_id),
            StoreError::DuplicateItem { listing_id } => Some(listing_id),
            StoreError::StaleCart { listing_id, .. } => listing_id.as_ref(),
            _ => None,
        }
    }

    /// Signals that are not failures: the request was simply not needed.
    pub fn is_informational(&self) -> bool {
        matches!(
            self.root(),
            StoreError::DuplicateItem { .. } | StoreError::AlreadyInProgress { .. }
        )
    }

    /// Check if the user has to log in again.
    pub fn is_auth(&self) -> bool {
        matches!(self.root(), StoreError::Auth(_))
    }

    /// Short machine-readable name of the root error.
    pub fn kind(&self) -> &'static str {
        match self.root() {
            StoreError::Network(_) => "network",
            StoreError::Auth(_) => "auth",
            StoreError::Validation { .. } => "validation",
            StoreError::DuplicateItem { .. } => "duplicate_item",
            StoreError::AlreadyInProgress { .. } => "already_in_progress",
            StoreError::EmptyCart => "empty_cart",
            StoreError::StaleCart { .. } => "stale_cart",
            StoreError::InvalidTransition { .. } => "invalid_transition",
            StoreError::Authorization(_) => "authorization",
            StoreError::NotFound(_) => "not_found",
            StoreError::Server { .. } => "server",
            StoreError::InvalidResponse(_) => "invalid_response",
            StoreError::Listing { .. } => "listing",
        }
    }

    /// Render as a user-facing message with structured detail.
    pub fn feedback(&self, operation: &'static str) -> Feedback {
        let mut detail = FeedbackDetail {
            kind: Some(self.kind()),
            listing_id: self.listing_id().cloned(),
            ..FeedbackDetail::default()
        };
        match self.root() {
            StoreError::Validation { fields, .. } => detail.fields = fields.clone(),
            StoreError::InvalidTransition { order_id, from, to } => {
                detail.order_id = order_id.clone();
                detail.from = *from;
                detail.to = Some(*to);
            }
            _ => {}
        }

        let feedback = if self.is_informational() {
            Feedback::info(operation, self.to_string())
        } else {
            Feedback::error(operation, self.to_string())
        };
        feedback.with_detail(detail)
    }
}

impl From<FetchError> for StoreError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => StoreError::Network("request timed out".to_string()),
            FetchError::Connection(m) | FetchError::Request(m) | FetchError::InvalidUrl(m) => {
                StoreError::Network(m)
            }
            FetchError::Auth(e) | FetchError::SessionExpired(e) => StoreError::Auth(e.to_string()),
            FetchError::Unauthorized => StoreError::Auth("unauthorized".to_string()),
            FetchError::Parse(m) | FetchError::Json(m) => StoreError::InvalidResponse(m),
            FetchError::Http {
                status,
                message,
                body,
            } => match status {
                401 => StoreError::Auth(message),
                403 => StoreError::Authorization(message),
                404 => StoreError::NotFound(message),
                500..=599 => StoreError::Server { status, message },
                _ => StoreError::Validation {
                    fields: body
                        .as_ref()
                        .and_then(|b| b.get("field"))
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                        .into_iter()
                        .collect(),
                    message,
                },
            },
        }
    }
}

impl From<CommerceError> for StoreError {
    fn from(err: CommerceError) -> Self {
        match err {
            CommerceError::InvalidQuantity(_) | CommerceError::QuantityExceedsLimit(..) => {
                StoreError::validation(&["quantity"], err.to_string())
            }
            CommerceError::IncompleteAddress { ref missing } => {
                StoreError::validation(missing, err.to_string())
            }
            CommerceError::UnknownStatus(_) => StoreError::validation(&["status"], err.to_string()),
            CommerceError::InvalidTransition { from, to } => StoreError::InvalidTransition {
                order_id: None,
                from: Some(from),
                to,
            },
            CommerceError::DuplicateListing(_) | CommerceError::Overflow => {
                StoreError::InvalidResponse(err.to_string())
            }
        }
    }
}
