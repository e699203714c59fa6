//! Order engine: checkout and the status lifecycle.
//!
//! Checkout turns the cart engine's current cart plus a shipping address
//! into orders. The buyer and the price are decided by the backend; the
//! request carries only the address.
//!
//! Status changes are checked client-side (actor and lifecycle) before the
//! request is sent. The backend still has the final word.

use crate::backend::{CheckoutReceipt, MarketplaceBackend, StatusRoute};
use crate::cart::CartEngine;
use crate::feedback::{Feedback, FeedbackSink, TracingFeedback};
use crate::inflight::InFlight;
use crate::StoreError;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use turbo_auth::Actor;
use turbo_commerce::checkout::{Order, OrderStatus, ShippingAddress};
use turbo_commerce::ids::{ListingId, OrderId};
use turbo_data::FetchError;

const CHECKOUT_KEY: &str = "checkout";

/// Places orders and advances their status.
pub struct OrderEngine<B: ?Sized> {
    backend: Arc<B>,
    cart: Arc<CartEngine<B>>,
    orders: RwLock<HashMap<OrderId, Order>>,
    inflight: InFlight<String>,
    feedback: Arc<dyn FeedbackSink>,
}

impl<B: MarketplaceBackend + ?Sized> OrderEngine<B> {
    pub fn new(backend: Arc<B>, cart: Arc<CartEngine<B>>) -> Self {
        Self {
            backend,
            cart,
            orders: RwLock::new(HashMap::new()),
            inflight: InFlight::new(),
            feedback: Arc::new(TracingFeedback),
        }
    }

    /// Set where outcomes are reported.
    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    /// The cart engine checkout reads from and clears.
    pub fn cart(&self) -> &Arc<CartEngine<B>> {
        &self.cart
    }

    /// The last known copy of an order.
    pub fn cached(&self, order_id: &OrderId) -> Option<Order> {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(order_id)
            .cloned()
    }

    /// Place orders for everything in the cart.
    ///
    /// The cart must not be empty and the address must be complete; both are
    /// checked before anything is sent. On success the cart is cleared.
    pub async fn checkout(&self, address: &ShippingAddress) -> Result<CheckoutReceipt, StoreError> {
        const OP: &str = "checkout";

        let cart = self.cart.snapshot();
        if cart.is_empty() {
            return Err(self.fail(OP, StoreError::EmptyCart));
        }
        if let Err(e) = address.validate() {
            return Err(self.fail(OP, StoreError::from(e)));
        }
        let Some(_guard) = self.inflight.try_begin(CHECKOUT_KEY.to_string()) else {
            return Err(self.fail(
                OP,
                StoreError::AlreadyInProgress {
                    key: CHECKOUT_KEY.to_string(),
                },
            ));
        };

        let unavailable: Vec<&ListingId> = cart.unavailable_lines().map(|l| &l.listing.id).collect();
        if !unavailable.is_empty() {
            tracing::debug!(?unavailable, "cart holds listings marked unavailable");
        }
        tracing::info!(
            lines = cart.len(),
            sellers = cart.sellers().len(),
            "placing order"
        );

        let receipt = match self.backend.place_order(address).await {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.fail(OP, checkout_error(e))),
        };

        self.remember(receipt.orders.iter().cloned());
        if let Err(e) = self.cart.clear().await {
            tracing::warn!(error = %e, "order placed but clearing the cart failed, dropping local cart");
            self.cart.reset_local();
        }

        let mut feedback = Feedback::success(OP, "Order placed");
        if let Some(id) = receipt.primary_id() {
            feedback = feedback.with_order(id);
        }
        tracing::info!(orders = receipt.order_ids.len(), "checkout complete");
        self.feedback.notify(feedback);
        Ok(receipt)
    }

    /// Load one order.
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, StoreError> {
        match self.backend.get_order(order_id).await {
            Ok(order) => {
                self.remember(std::iter::once(order.clone()));
                Ok(order)
            }
            Err(e) => Err(self.fail("order.get", StoreError::from(e))),
        }
    }

    /// Orders the current user bought.
    pub async fn my_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.list("order.my_orders", self.backend.my_orders().await)
    }

    /// Orders for the current user's listings.
    pub async fn my_sales(&self) -> Result<Vec<Order>, StoreError> {
        self.list("order.my_sales", self.backend.my_sales().await)
    }

    /// Every order in the marketplace. Administrators only.
    pub async fn all_orders(&self, actor: &Actor) -> Result<Vec<Order>, StoreError> {
        const OP: &str = "order.all";

        if !actor.is_admin() {
            return Err(self.fail(
                OP,
                StoreError::Authorization("only administrators can list all orders".to_string()),
            ));
        }
        self.list(OP, self.backend.all_orders().await)
    }

    /// Move an order to `target`.
    ///
    /// Only the order's seller or an administrator may do this, and only
    /// along the lifecycle in [`OrderStatus`]. A cached copy that rejects the
    /// move is reloaded once before giving up. The cached copy is replaced by
    /// the order the backend returns.
    pub async fn advance_status(
        &self,
        actor: &Actor,
        order_id: &OrderId,
        target: OrderStatus,
    ) -> Result<Order, StoreError> {
        const OP: &str = "order.advance";

        let Some(_guard) = self.inflight.try_begin(order_id.to_string()) else {
            return Err(self.fail(
                OP,
                StoreError::AlreadyInProgress {
                    key: order_id.to_string(),
                },
            ));
        };

        let (mut current, reloaded) = match self.cached(order_id) {
            Some(order) => (order, false),
            None => (self.get_order(order_id).await?, true),
        };

        if let Err(e) = actor.authorize_order(current.seller_id()) {
            tracing::debug!(
                order_id = %order_id,
                user_id = %actor.user_id,
                "actor is neither seller nor admin"
            );
            return Err(self.fail(OP, StoreError::Authorization(e.to_string())));
        }

        // The cached copy may be behind the server; only reject on a fresh one.
        if !reloaded && !current.status().can_transition_to(target) {
            tracing::debug!(
                order_id = %order_id,
                cached = %current.status(),
                to = %target,
                "cached order rejects transition, reloading"
            );
            current = self.get_order(order_id).await?;
        }

        let from = current.status();
        if !from.can_transition_to(target) {
            return Err(self.fail(
                OP,
                StoreError::InvalidTransition {
                    order_id: Some(order_id.clone()),
                    from: Some(from),
                    to: target,
                },
            ));
        }

        let route = if actor.is_admin() {
            StatusRoute::Admin
        } else {
            StatusRoute::Seller
        };
        tracing::info!(order_id = %order_id, from = %from, to = %target, ?route, "advancing order");

        match self.backend.update_order_status(order_id, target, route).await {
            Ok(order) => {
                self.remember(std::iter::once(order.clone()));
                self.feedback.notify(
                    Feedback::success(OP, format!("Order marked {}", order.status()))
                        .with_order(order_id),
                );
                Ok(order)
            }
            Err(e) => Err(self.fail(OP, status_error(e, order_id, from, target))),
        }
    }

    fn list(
        &self,
        operation: &'static str,
        result: Result<Vec<Order>, FetchError>,
    ) -> Result<Vec<Order>, StoreError> {
        match result {
            Ok(orders) => {
                tracing::debug!(operation, count = orders.len(), "orders loaded");
                self.remember(orders.iter().cloned());
                Ok(orders)
            }
            Err(e) => Err(self.fail(operation, StoreError::from(e))),
        }
    }

    fn remember(&self, orders: impl Iterator<Item = Order>) {
        let mut cache = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        for order in orders {
            cache.insert(order.id().clone(), order);
        }
    }

    fn fail(&self, operation: &'static str, err: StoreError) -> StoreError {
        if !err.is_informational() {
            tracing::warn!(operation, kind = err.kind(), error = %err, "order operation failed");
        }
        self.feedback.notify(err.feedback(operation));
        err
    }
}

/// 409 and 410 at checkout mean a listing is no longer for sale.
fn checkout_error(err: FetchError) -> StoreError {
    match err.status() {
        Some(409) | Some(410) => StoreError::StaleCart {
            listing_id: err.body_field("listingId").map(ListingId::new),
            message: match err {
                FetchError::Http { message, .. } => message,
                other => other.to_string(),
            },
        },
        _ => StoreError::from(err),
    }
}

/// 400, 409 and 422 on a status change mean the backend refused the
/// transition.
fn status_error(err: FetchError, order_id: &OrderId, from: OrderStatus, to: OrderStatus) -> StoreError {
    match err.status() {
        Some(400) | Some(409) | Some(422) => StoreError::InvalidTransition {
            order_id: Some(order_id.clone()),
            from: Some(from),
            to,
        },
        _ => StoreError::from(err),
    }
}
