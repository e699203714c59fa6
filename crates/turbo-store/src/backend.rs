//! Backend seam for the engines.
//!
//! [`MarketplaceBackend`] is everything the engines need from the server.
//! [`HttpBackend`] speaks the REST API over any [`HttpTransport`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use turbo_commerce::cart::Cart;
use turbo_commerce::checkout::{Order, OrderStatus, ShippingAddress};
use turbo_commerce::ids::{LineId, ListingId, OrderId};
use turbo_data::{FetchError, HttpTransport, RequestBuilder};

/// Which status endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRoute {
    /// `PUT /admin/orders/:id/status`
    Admin,
    /// `PUT /orders/:id/status`
    Seller,
}

/// What a successful checkout produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckoutReceipt {
    /// Every created order, in server order.
    pub order_ids: Vec<OrderId>,
    /// Full orders, when the server returned them.
    pub orders: Vec<Order>,
}

impl CheckoutReceipt {
    /// The first created order, used for the confirmation screen.
    pub fn primary_id(&self) -> Option<&OrderId> {
        self.order_ids.first()
    }
}

/// Server operations used by the cart and order engines.
#[async_trait]
pub trait MarketplaceBackend: Send + Sync {
    /// `GET /cart`
    async fn fetch_cart(&self) -> Result<Cart, FetchError>;

    /// `POST /cart`. Creates a line; never merges.
    async fn add_line(&self, listing_id: &ListingId, quantity: u32) -> Result<Cart, FetchError>;

    /// `PUT /cart/:lineId` with the absolute quantity.
    async fn update_line(&self, line_id: &LineId, quantity: u32) -> Result<Cart, FetchError>;

    /// `DELETE /cart/:lineId`
    async fn remove_line(&self, line_id: &LineId) -> Result<Cart, FetchError>;

    /// `DELETE /cart`
    async fn clear_cart(&self) -> Result<(), FetchError>;

    /// `POST /orders`
    async fn place_order(&self, address: &ShippingAddress) -> Result<CheckoutReceipt, FetchError>;

    /// `GET /orders/:id`
    async fn get_order(&self, order_id: &OrderId) -> Result<Order, FetchError>;

    /// Set an order's status.
    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        route: StatusRoute,
    ) -> Result<Order, FetchError>;

    /// `GET /orders/my-orders`
    async fn my_orders(&self) -> Result<Vec<Order>, FetchError>;

    /// `GET /orders/my-sales`
    async fn my_sales(&self) -> Result<Vec<Order>, FetchError>;

    /// `GET /admin/orders`
    async fn all_orders(&self) -> Result<Vec<Order>, FetchError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddLineRequest<'a> {
    listing_id: &'a ListingId,
    quantity: u32,
}

#[derive(Serialize)]
struct QuantityRequest {
    quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutRequest<'a> {
    shipping_address: &'a ShippingAddress,
}

#[derive(Serialize)]
struct StatusRequest {
    status: OrderStatus,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CheckoutResponse {
    Orders { orders: Vec<Order> },
    Many {
        #[serde(rename = "orderIds")]
        order_ids: Vec<OrderId>,
    },
    Single {
        #[serde(rename = "orderId")]
        order_id: OrderId,
    },
    Order(Box<Order>),
}

impl From<CheckoutResponse> for CheckoutReceipt {
    fn from(response: CheckoutResponse) -> Self {
        match response {
            CheckoutResponse::Orders { orders } => CheckoutReceipt {
                order_ids: orders.iter().map(|o| o.id().clone()).collect(),
                orders,
            },
            CheckoutResponse::Many { order_ids } => CheckoutReceipt {
                order_ids,
                orders: Vec::new(),
            },
            CheckoutResponse::Single { order_id } => CheckoutReceipt {
                order_ids: vec![order_id],
                orders: Vec::new(),
            },
            CheckoutResponse::Order(order) => CheckoutReceipt {
                order_ids: vec![order.id().clone()],
                orders: vec![*order],
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderList {
    Bare(Vec<Order>),
    Wrapped { orders: Vec<Order> },
}

impl From<OrderList> for Vec<Order> {
    fn from(list: OrderList) -> Self {
        match list {
            OrderList::Bare(orders) | OrderList::Wrapped { orders } => orders,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderEnvelope {
    Bare(Box<Order>),
    Wrapped { order: Box<Order> },
}

impl From<OrderEnvelope> for Order {
    fn from(envelope: OrderEnvelope) -> Self {
        match envelope {
            OrderEnvelope::Bare(order) | OrderEnvelope::Wrapped { order } => *order,
        }
    }
}

/// REST implementation of [`MarketplaceBackend`].
pub struct HttpBackend<T> {
    transport: T,
}

impl<T: HttpTransport> HttpBackend<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, FetchError> {
        self.transport.send(request).await?.error_for_status()?.json()
    }
}

#[async_trait]
impl<T: HttpTransport> MarketplaceBackend for HttpBackend<T> {
    async fn fetch_cart(&self) -> Result<Cart, FetchError> {
        self.call(RequestBuilder::get("/cart")).await
    }

    async fn add_line(&self, listing_id: &ListingId, quantity: u32) -> Result<Cart, FetchError> {
        let request =
            RequestBuilder::post("/cart").json(&AddLineRequest { listing_id, quantity })?;
        self.call(request).await
    }

    async fn update_line(&self, line_id: &LineId, quantity: u32) -> Result<Cart, FetchError> {
        let request =
            RequestBuilder::put(format!("/cart/{}", line_id)).json(&QuantityRequest { quantity })?;
        self.call(request).await
    }

    async fn remove_line(&self, line_id: &LineId) -> Result<Cart, FetchError> {
        self.call(RequestBuilder::delete(format!("/cart/{}", line_id)))
            .await
    }

    async fn clear_cart(&self) -> Result<(), FetchError> {
        self.transport
            .send(RequestBuilder::delete("/cart"))
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn place_order(&self, address: &ShippingAddress) -> Result<CheckoutReceipt, FetchError> {
        let request = RequestBuilder::post("/orders").json(&CheckoutRequest {
            shipping_address: address,
        })?;
        let response: CheckoutResponse = self.call(request).await?;
        Ok(response.into())
    }

    async fn get_order(&self, order_id: &OrderId) -> Result<Order, FetchError> {
        let envelope: OrderEnvelope = self
            .call(RequestBuilder::get(format!("/orders/{}", order_id)))
            .await?;
        Ok(envelope.into())
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        route: StatusRoute,
    ) -> Result<Order, FetchError> {
        let path = match route {
            StatusRoute::Admin => format!("/admin/orders/{}/status", order_id),
            StatusRoute::Seller => format!("/orders/{}/status", order_id),
        };
        let request = RequestBuilder::put(path).json(&StatusRequest { status })?;
        let envelope: OrderEnvelope = self.call(request).await?;
        Ok(envelope.into())
    }

    async fn my_orders(&self) -> Result<Vec<Order>, FetchError> {
        let list: OrderList = self.call(RequestBuilder::get("/orders/my-orders")).await?;
        Ok(list.into())
    }

    async fn my_sales(&self) -> Result<Vec<Order>, FetchError> {
        let list: OrderList = self.call(RequestBuilder::get("/orders/my-sales")).await?;
        Ok(list.into())
    }

    async fn all_orders(&self) -> Result<Vec<Order>, FetchError> {
        let list: OrderList = self.call(RequestBuilder::get("/admin/orders")).await?;
        Ok(list.into())
    }
}
