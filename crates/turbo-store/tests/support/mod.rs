//! In-memory marketplace backend for engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use turbo_auth::AuthError;
use turbo_commerce::cart::{Cart, CartLine, ListingSnapshot, ListingStatus};
use turbo_commerce::checkout::{Order, OrderStatus, ShippingAddress};
use turbo_commerce::ids::{LineId, ListingId, OrderId, UserId};
use turbo_commerce::money::Money;
use turbo_data::FetchError;
use turbo_store::{
    CartEngine, CheckoutReceipt, CollectedFeedback, MarketplaceBackend, OrderEngine, StatusRoute,
};

pub const BUYER: &str = "buyer-1";
pub const SELLER_A: &str = "seller-a";
pub const SELLER_B: &str = "seller-b";

/// One backend call, as the engines made it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchCart,
    AddLine(ListingId, u32),
    UpdateLine(LineId, u32),
    RemoveLine(LineId),
    ClearCart,
    PlaceOrder(ShippingAddress),
    GetOrder(OrderId),
    UpdateStatus(OrderId, OrderStatus, StatusRoute),
    MyOrders,
    MySales,
    AllOrders,
}

impl Call {
    fn op(&self) -> &'static str {
        match self {
            Call::FetchCart => "fetch_cart",
            Call::AddLine(..) => "add_line",
            Call::UpdateLine(..) => "update_line",
            Call::RemoveLine(..) => "remove_line",
            Call::ClearCart => "clear_cart",
            Call::PlaceOrder(..) => "place_order",
            Call::GetOrder(..) => "get_order",
            Call::UpdateStatus(..) => "update_order_status",
            Call::MyOrders => "my_orders",
            Call::MySales => "my_sales",
            Call::AllOrders => "all_orders",
        }
    }
}

#[derive(Default)]
struct State {
    catalog: HashMap<ListingId, ListingSnapshot>,
    lines: Vec<CartLine>,
    next_line: u32,
    orders: Vec<Order>,
    next_order: u32,
}

impl State {
    fn cart(&self) -> Result<Cart, FetchError> {
        Cart::from_lines(self.lines.clone()).map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Re-read every line's listing from the catalog.
    fn refresh_snapshots(&mut self) {
        for line in &mut self.lines {
            if let Some(listing) = self.catalog.get(&line.listing.id) {
                line.listing = listing.clone();
            }
        }
    }
}

/// Behaves like the marketplace REST API, minus HTTP.
///
/// `add_line` creates a new line every time, as the real endpoint does; the
/// engine is responsible for merging.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, Vec<FetchError>>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
}

pub fn http_error(status: u16, body: serde_json::Value) -> FetchError {
    FetchError::Http {
        status,
        message: body["message"].as_str().unwrap_or_default().to_string(),
        body: Some(body),
    }
}

pub fn address() -> ShippingAddress {
    ShippingAddress::new("1 Main St", "Springfield", "IL", "USA").with_zip("62701")
}

impl FakeBackend {
    /// A catalog of two listings from two sellers: `lst-1` at $10.00 and
    /// `lst-2` at $25.00.
    pub fn new() -> Arc<Self> {
        let backend = Self::default();
        backend.list("lst-1", "Dune", 1000, SELLER_A);
        backend.list("lst-2", "Neuromancer", 2500, SELLER_B);
        Arc::new(backend)
    }

    pub fn list(&self, id: &str, title: &str, cents: i64, seller: &str) {
        let listing = ListingSnapshot::new(id, title, "Author", Money::from_cents(cents))
            .with_seller(UserId::new(seller));
        self.state
            .lock()
            .unwrap()
            .catalog
            .insert(listing.id.clone(), listing);
    }

    pub fn set_price(&self, id: &str, cents: i64) {
        let mut state = self.state.lock().unwrap();
        if let Some(listing) = state.catalog.get_mut(&ListingId::new(id)) {
            listing.price = Money::from_cents(cents);
        }
    }

    pub fn mark_unavailable(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(listing) = state.catalog.get_mut(&ListingId::new(id)) {
            listing.status = ListingStatus::Unavailable;
        }
    }

    /// Put a line straight into the server-side cart.
    pub fn seed_line(&self, listing: &str, quantity: u32) -> LineId {
        let mut state = self.state.lock().unwrap();
        state.next_line += 1;
        let id = LineId::new(format!("line-{}", state.next_line));
        let snapshot = state.catalog[&ListingId::new(listing)].clone();
        state.lines.push(CartLine::new(id.clone(), snapshot, quantity));
        id
    }

    /// Drop a line server-side only, as another tab would.
    pub fn drop_line(&self, line_id: &LineId) {
        self.state.lock().unwrap().lines.retain(|l| &l.id != line_id);
    }

    /// Put an order straight into the server.
    pub fn seed_order(&self, seller: &str, status: OrderStatus) -> OrderId {
        let mut state = self.state.lock().unwrap();
        state.next_order += 1;
        let id = OrderId::new(format!("ord-{}", state.next_order));
        let listing = ListingSnapshot::new("lst-9", "Snow Crash", "Author", Money::from_cents(1500));
        let line = CartLine::new("line-x", listing, 1);
        let mut order = Order::place(
            id.clone(),
            UserId::new(BUYER),
            UserId::new(seller),
            &line,
            address(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let path: &[OrderStatus] = match status {
            OrderStatus::Pending => &[],
            OrderStatus::Processing => &[OrderStatus::Processing],
            OrderStatus::Shipped => &[OrderStatus::Processing, OrderStatus::Shipped],
            OrderStatus::Delivered => &[
                OrderStatus::Processing,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
            ],
            OrderStatus::Cancelled => &[OrderStatus::Cancelled],
        };
        for step in path {
            order = order.transitioned(*step, Utc::now()).unwrap();
        }
        state.orders.push(order);
        id
    }

    /// Move an order server-side only, as another session would.
    pub fn advance_on_server(&self, id: &OrderId, to: OrderStatus) {
        let mut state = self.state.lock().unwrap();
        let order = state.orders.iter_mut().find(|o| o.id() == id).unwrap();
        *order = order.transitioned(to, Utc::now()).unwrap();
    }

    pub fn server_cart(&self) -> Cart {
        self.state.lock().unwrap().cart().unwrap()
    }

    pub fn server_order(&self, id: &OrderId) -> Option<Order> {
        self.state
            .lock()
            .unwrap()
            .orders
            .iter()
            .find(|o| o.id() == id)
            .cloned()
    }

    /// Fail the next call to `op` with `err`.
    pub fn fail_next(&self, op: &'static str, err: FetchError) {
        self.failures.lock().unwrap().entry(op).or_default().push(err);
    }

    /// Hold every call to `op` until the returned gate is notified.
    pub fn hold(&self, op: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(op, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.op() == op).count()
    }

    async fn enter(&self, call: Call) -> Result<(), FetchError> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);

        let gate = self.gates.lock().unwrap().get(op).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(op) {
            Some(queue) if !queue.is_empty() => Err(queue.remove(0)),
            _ => Ok(()),
        }
    }
}

fn not_found(what: &str) -> FetchError {
    http_error(404, serde_json::json!({ "message": format!("{} not found", what) }))
}

#[async_trait]
impl MarketplaceBackend for FakeBackend {
    async fn fetch_cart(&self) -> Result<Cart, FetchError> {
        self.enter(Call::FetchCart).await?;
        let mut state = self.state.lock().unwrap();
        state.refresh_snapshots();
        state.cart()
    }

    async fn add_line(&self, listing_id: &ListingId, quantity: u32) -> Result<Cart, FetchError> {
        self.enter(Call::AddLine(listing_id.clone(), quantity)).await?;
        let mut state = self.state.lock().unwrap();
        let Some(listing) = state.catalog.get(listing_id).cloned() else {
            return Err(not_found("Listing"));
        };
        state.next_line += 1;
        let id = LineId::new(format!("line-{}", state.next_line));
        state.lines.push(CartLine::new(id, listing, quantity));
        state.refresh_snapshots();
        state.cart()
    }

    async fn update_line(&self, line_id: &LineId, quantity: u32) -> Result<Cart, FetchError> {
        self.enter(Call::UpdateLine(line_id.clone(), quantity)).await?;
        let mut state = self.state.lock().unwrap();
        match state.lines.iter_mut().find(|l| &l.id == line_id) {
            Some(line) => line.quantity = quantity,
            None => return Err(not_found("Cart item")),
        }
        state.refresh_snapshots();
        state.cart()
    }

    async fn remove_line(&self, line_id: &LineId) -> Result<Cart, FetchError> {
        self.enter(Call::RemoveLine(line_id.clone())).await?;
        let mut state = self.state.lock().unwrap();
        if !state.lines.iter().any(|l| &l.id == line_id) {
            return Err(not_found("Cart item"));
        }
        state.lines.retain(|l| &l.id != line_id);
        state.refresh_snapshots();
        state.cart()
    }

    async fn clear_cart(&self) -> Result<(), FetchError> {
        self.enter(Call::ClearCart).await?;
        self.state.lock().unwrap().lines.clear();
        Ok(())
    }

    async fn place_order(&self, address: &ShippingAddress) -> Result<CheckoutReceipt, FetchError> {
        self.enter(Call::PlaceOrder(address.clone())).await?;
        let mut state = self.state.lock().unwrap();
        state.refresh_snapshots();
        if state.lines.is_empty() {
            return Err(http_error(400, serde_json::json!({"message": "Cart is empty"})));
        }
        if let Some(line) = state.lines.iter().find(|l| !l.listing.is_available()) {
            return Err(http_error(
                409,
                serde_json::json!({
                    "message": format!("{} is no longer available", line.listing.title),
                    "listingId": line.listing.id,
                }),
            ));
        }

        let mut orders = Vec::new();
        for line in state.lines.clone() {
            state.next_order += 1;
            let id = OrderId::new(format!("ord-{}", state.next_order));
            let seller = line
                .listing
                .seller
                .clone()
                .unwrap_or_else(|| UserId::new(SELLER_A).into());
            let order = Order::place(id, UserId::new(BUYER), seller, &line, address.clone(), Utc::now())
                .map_err(|e| http_error(400, serde_json::json!({ "message": e.to_string() })))?;
            orders.push(order);
        }
        state.orders.extend(orders.iter().cloned());

        Ok(CheckoutReceipt {
            order_ids: orders.iter().map(|o| o.id().clone()).collect(),
            orders,
        })
    }

    async fn get_order(&self, order_id: &OrderId) -> Result<Order, FetchError> {
        self.enter(Call::GetOrder(order_id.clone())).await?;
        self.server_order(order_id).ok_or_else(|| not_found("Order"))
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        route: StatusRoute,
    ) -> Result<Order, FetchError> {
        self.enter(Call::UpdateStatus(order_id.clone(), status, route)).await?;
        let mut state = self.state.lock().unwrap();
        let Some(order) = state.orders.iter_mut().find(|o| o.id() == order_id) else {
            return Err(not_found("Order"));
        };
        let updated = order
            .transitioned(status, Utc::now())
            .map_err(|e| http_error(400, serde_json::json!({ "message": e.to_string() })))?;
        *order = updated.clone();
        Ok(updated)
    }

    async fn my_orders(&self) -> Result<Vec<Order>, FetchError> {
        self.enter(Call::MyOrders).await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .filter(|o| o.buyer_id().as_str() == BUYER)
            .cloned()
            .collect())
    }

    async fn my_sales(&self) -> Result<Vec<Order>, FetchError> {
        self.enter(Call::MySales).await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .filter(|o| o.seller_id().as_str() == SELLER_A)
            .cloned()
            .collect())
    }

    async fn all_orders(&self) -> Result<Vec<Order>, FetchError> {
        self.enter(Call::AllOrders).await?;
        Ok(self.state.lock().unwrap().orders.clone())
    }
}

/// Engines wired to a fresh fake backend.
pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub cart: Arc<CartEngine<FakeBackend>>,
    pub orders: OrderEngine<FakeBackend>,
    pub feedback: Arc<CollectedFeedback>,
}

impl Harness {
    pub fn new() -> Self {
        let backend = FakeBackend::new();
        let feedback = Arc::new(CollectedFeedback::new());
        let cart = Arc::new(CartEngine::new(backend.clone()).with_feedback(feedback.clone()));
        let orders = OrderEngine::new(backend.clone(), cart.clone()).with_feedback(feedback.clone());
        Self {
            backend,
            cart,
            orders,
            feedback,
        }
    }
}

pub fn session_expired() -> FetchError {
    FetchError::SessionExpired(AuthError::RenewalFailed("refresh token revoked".into()))
}

pub fn lst(id: &str) -> ListingId {
    ListingId::new(id)
}
