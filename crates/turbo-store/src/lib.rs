//! Cart and order engines for TurboCommerce.
//!
//! - [`CartEngine`]: the user's cart, kept in step with the backend, one
//!   pending mutation per listing
//! - [`OrderEngine`]: checkout and the order status lifecycle
//! - [`MarketplaceBackend`]: what the engines need from the server, with
//!   [`HttpBackend`] as the REST implementation
//! - [`StoreError`]: the failures callers see, each renderable as
//!   [`Feedback`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_store::{CartEngine, HttpBackend, OrderEngine};
//!
//! let backend = Arc::new(HttpBackend::new(client));
//! let cart = Arc::new(CartEngine::new(backend.clone()));
//! let orders = OrderEngine::new(backend, cart.clone());
//!
//! cart.fetch().await?;
//! cart.add_item(&ListingId::new("lst-1"), 1).await?;
//! let receipt = orders.checkout(&address).await?;
//! ```

mod backend;
mod cart;
mod error;
mod feedback;
mod inflight;
mod orders;

pub use backend::{CheckoutReceipt, HttpBackend, MarketplaceBackend, StatusRoute};
pub use cart::CartEngine;
pub use error::StoreError;
pub use feedback::{
    CollectedFeedback, Feedback, FeedbackDetail, FeedbackLevel, FeedbackSink, TracingFeedback,
};
pub use inflight::{InFlight, InFlightGuard};
pub use orders::OrderEngine;
