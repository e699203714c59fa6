//! Cart engine.
//!
//! Keeps the one authoritative copy of the user's cart. Every mutation goes
//! to the backend first and the local copy is replaced wholesale with the
//! cart the server returns. A failed call leaves the local copy untouched.
//!
//! Mutations are serialized per listing: while a listing has a request
//! pending, another mutation for it is turned away with
//! [`StoreError::AlreadyInProgress`]. Mutations for different listings run
//! independently and may complete in any order.

use crate::backend::MarketplaceBackend;
use crate::feedback::{Feedback, FeedbackSink, TracingFeedback};
use crate::inflight::{InFlight, InFlightGuard};
use crate::StoreError;
use std::sync::{Arc, PoisonError, RwLock};
use turbo_commerce::cart::{validate_quantity, Cart, CartLine, CartTotals};
use turbo_commerce::ids::{LineId, ListingId};

/// Client-side cart, synchronized with the backend.
pub struct CartEngine<B: ?Sized> {
    backend: Arc<B>,
    state: RwLock<Cart>,
    inflight: InFlight<ListingId>,
    feedback: Arc<dyn FeedbackSink>,
}

impl<B: MarketplaceBackend + ?Sized> CartEngine<B> {
    /// Create an engine with an empty local cart. Call [`CartEngine::fetch`]
    /// before trusting it.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: RwLock::new(Cart::empty()),
            inflight: InFlight::new(),
            feedback: Arc::new(TracingFeedback),
        }
    }

    /// Set where outcomes are reported.
    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    /// The current cart.
    pub fn snapshot(&self) -> Cart {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Totals of the current cart.
    pub fn totals(&self) -> Result<CartTotals, StoreError> {
        Ok(self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .totals()?)
    }

    /// Check if a mutation for `listing_id` is pending.
    pub fn is_in_flight(&self, listing_id: &ListingId) -> bool {
        self.inflight.contains(listing_id)
    }

    /// Forget the local cart without telling the backend.
    pub fn reset_local(&self) {
        self.replace(Cart::empty());
    }

    /// Load the cart from the backend, replacing the local copy.
    pub async fn fetch(&self) -> Result<Cart, StoreError> {
        match self.backend.fetch_cart().await {
            Ok(cart) => {
                tracing::debug!(lines = cart.len(), "cart fetched");
                self.replace(cart.clone());
                Ok(cart)
            }
            Err(e) => Err(self.fail("cart.fetch", StoreError::from(e))),
        }
    }

    /// Add `quantity` of a listing.
    ///
    /// If the cart already holds the listing its line is raised to the
    /// combined quantity; otherwise a new line is created.
    pub async fn add_item(&self, listing_id: &ListingId, quantity: u32) -> Result<Cart, StoreError> {
        const OP: &str = "cart.add";

        if let Err(e) = validate_quantity(quantity) {
            return Err(self.fail(OP, StoreError::from(e).for_listing(listing_id)));
        }
        let _guard = self.begin(OP, listing_id)?;

        let existing = self.snapshot().line_for_listing(listing_id).cloned();
        let result = match existing {
            Some(line) => self.merge_into(&line, quantity).await,
            None => {
                tracing::debug!(listing_id = %listing_id, quantity, "creating cart line");
                self.backend
                    .add_line(listing_id, quantity)
                    .await
                    .map_err(StoreError::from)
            }
        };

        match result {
            Ok(cart) => {
                self.replace(cart.clone());
                self.feedback
                    .notify(Feedback::success(OP, "Added to cart").with_listing(listing_id));
                Ok(cart)
            }
            Err(e) => Err(self.fail(OP, e.for_listing(listing_id))),
        }
    }

    /// Add a listing only if the cart does not hold it yet.
    ///
    /// Fails with [`StoreError::DuplicateItem`] without calling the backend
    /// when the listing is already present.
    pub async fn add_if_absent(
        &self,
        listing_id: &ListingId,
        quantity: u32,
    ) -> Result<Cart, StoreError> {
        if self.snapshot().contains_listing(listing_id) {
            tracing::debug!(listing_id = %listing_id, "listing already in cart");
            return Err(self.fail(
                "cart.add",
                StoreError::DuplicateItem {
                    listing_id: listing_id.clone(),
                },
            ));
        }
        self.add_item(listing_id, quantity).await
    }

    /// Set a line's quantity. Use [`CartEngine::remove_item`] for zero.
    pub async fn update_quantity(&self, line_id: &LineId, quantity: u32) -> Result<Cart, StoreError> {
        const OP: &str = "cart.update";

        let line = self.snapshot().line(line_id).cloned();
        let Some(line) = line else {
            return Err(self.fail(OP, StoreError::NotFound(format!("cart line {}", line_id))));
        };
        let listing_id = &line.listing.id;

        if quantity == 0 {
            return Err(self.fail(
                OP,
                StoreError::validation(&["quantity"], "Quantity must be at least 1, remove the item instead")
                    .for_listing(listing_id),
            ));
        }
        if let Err(e) = validate_quantity(quantity) {
            return Err(self.fail(OP, StoreError::from(e).for_listing(listing_id)));
        }
        let _guard = self.begin(OP, listing_id)?;

        match self.backend.update_line(line_id, quantity).await {
            Ok(cart) => {
                tracing::debug!(line_id = %line_id, quantity, "cart line updated");
                self.replace(cart.clone());
                self.feedback.notify(
                    Feedback::success(OP, "Quantity updated")
                        .with_listing(listing_id)
                        .with_line(line_id),
                );
                Ok(cart)
            }
            Err(e) => Err(self.fail(OP, StoreError::from(e).for_listing(listing_id))),
        }
    }

    /// Remove a line. Removing a line that is already gone succeeds and
    /// leaves the cart as it is.
    pub async fn remove_item(&self, line_id: &LineId) -> Result<Cart, StoreError> {
        const OP: &str = "cart.remove";

        let snapshot = self.snapshot();
        let Some(line) = snapshot.line(line_id).cloned() else {
            tracing::debug!(line_id = %line_id, "line already absent");
            return Ok(snapshot);
        };
        let listing_id = &line.listing.id;
        let _guard = self.begin(OP, listing_id)?;

        match self.backend.remove_line(line_id).await {
            Ok(cart) => {
                self.replace(cart.clone());
                self.feedback.notify(
                    Feedback::success(OP, "Removed from cart")
                        .with_listing(listing_id)
                        .with_line(line_id),
                );
                Ok(cart)
            }
            Err(e) if e.status() == Some(404) => {
                tracing::debug!(line_id = %line_id, "line already removed on server");
                let cart = self.snapshot().without_line(line_id);
                self.replace(cart.clone());
                Ok(cart)
            }
            Err(e) => Err(self.fail(OP, StoreError::from(e).for_listing(listing_id))),
        }
    }

    /// Empty the cart on the server and locally.
    pub async fn clear(&self) -> Result<(), StoreError> {
        const OP: &str = "cart.clear";

        match self.backend.clear_cart().await {
            Ok(()) => {
                self.replace(Cart::empty());
                tracing::debug!("cart cleared");
                self.feedback.notify(Feedback::success(OP, "Cart cleared"));
                Ok(())
            }
            Err(e) => Err(self.fail(OP, StoreError::from(e))),
        }
    }

    async fn merge_into(&self, line: &CartLine, quantity: u32) -> Result<Cart, StoreError> {
        let merged = line.merged_quantity(quantity)?;
        tracing::debug!(
            listing_id = %line.listing.id,
            line_id = %line.id,
            from = line.quantity,
            to = merged,
            "merging into existing cart line"
        );

        match self.backend.update_line(&line.id, merged).await {
            Err(e) if e.status() == Some(404) => {
                tracing::debug!(line_id = %line.id, "line vanished on server, creating it");
                Ok(self.backend.add_line(&line.listing.id, quantity).await?)
            }
            other => Ok(other?),
        }
    }

    fn begin(
        &self,
        operation: &'static str,
        listing_id: &ListingId,
    ) -> Result<InFlightGuard<'_, ListingId>, StoreError> {
        self.inflight.try_begin(listing_id.clone()).ok_or_else(|| {
            tracing::debug!(listing_id = %listing_id, operation, "mutation already in flight");
            self.fail(
                operation,
                StoreError::AlreadyInProgress {
                    key: listing_id.to_string(),
                }
                .for_listing(listing_id),
            )
        })
    }

    fn replace(&self, cart: Cart) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = cart;
    }

    fn fail(&self, operation: &'static str, err: StoreError) -> StoreError {
        if !err.is_informational() {
            tracing::warn!(operation, kind = err.kind(), error = %err, "cart operation failed");
        }
        self.feedback.notify(err.feedback(operation));
        err
    }
}
