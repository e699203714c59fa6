mod support;

use support::{address, http_error, lst, Call, Harness, BUYER, SELLER_A, SELLER_B};
use turbo_auth::Actor;
use turbo_commerce::checkout::{OrderStatus, ShippingAddress};
use turbo_commerce::money::Money;
use turbo_data::FetchError;
use turbo_store::{FeedbackLevel, StatusRoute, StoreError};

#[tokio::test]
async fn test_checkout_empty_cart_makes_no_request() {
    let h = Harness::new();

    let err = h.orders.checkout(&address()).await.unwrap_err();

    assert_eq!(err, StoreError::EmptyCart);
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn test_checkout_incomplete_address_names_fields() {
    let h = Harness::new();
    h.backend.seed_line("lst-1", 1);
    h.cart.fetch().await.unwrap();

    let incomplete = ShippingAddress::new("", "Springfield", " ", "USA");
    let err = h.orders.checkout(&incomplete).await.unwrap_err();

    match err {
        StoreError::Validation { fields, .. } => assert_eq!(fields, vec!["street", "state"]),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(h.backend.count("place_order"), 0);
    assert_eq!(h.cart.snapshot().len(), 1);
}

#[tokio::test]
async fn test_checkout_places_one_order_per_line_and_clears_cart() {
    let h = Harness::new();
    h.backend.seed_line("lst-1", 2);
    h.backend.seed_line("lst-2", 1);
    h.cart.fetch().await.unwrap();

    let receipt = h.orders.checkout(&address()).await.unwrap();

    assert_eq!(receipt.order_ids.len(), 2);
    assert_eq!(receipt.orders.len(), 2);
    let first = &receipt.orders[0];
    assert_eq!(first.status(), OrderStatus::Pending);
    assert_eq!(first.buyer_id().as_str(), BUYER);
    assert_eq!(first.seller_id().as_str(), SELLER_A);
    assert_eq!(first.total_price(), Money::from_cents(2000));
    assert_eq!(receipt.orders[1].seller_id().as_str(), SELLER_B);

    assert!(h.cart.snapshot().is_empty());
    assert!(h.cart.fetch().await.unwrap().is_empty());
    assert!(h.orders.cached(&receipt.order_ids[0]).is_some());
    assert!(h.backend.calls().contains(&Call::PlaceOrder(address())));

    let last = h.feedback.items().pop().unwrap();
    assert_eq!(last.level, FeedbackLevel::Success);
    assert_eq!(last.detail.order_id.as_ref(), receipt.primary_id());
}

#[tokio::test]
async fn test_checkout_with_sold_listing_is_stale_cart() {
    let h = Harness::new();
    h.backend.seed_line("lst-1", 1);
    h.cart.fetch().await.unwrap();
    h.backend.mark_unavailable("lst-1");

    let err = h.orders.checkout(&address()).await.unwrap_err();

    assert!(matches!(err, StoreError::StaleCart { .. }));
    assert_eq!(err.listing_id(), Some(&lst("lst-1")));
    assert_eq!(h.cart.snapshot().len(), 1);
    assert_eq!(h.backend.count("clear_cart"), 0);
}

#[tokio::test]
async fn test_checkout_survives_failed_clear() {
    let h = Harness::new();
    h.backend.seed_line("lst-1", 1);
    h.cart.fetch().await.unwrap();
    h.backend.fail_next("clear_cart", FetchError::Timeout);

    let receipt = h.orders.checkout(&address()).await.unwrap();

    assert_eq!(receipt.order_ids.len(), 1);
    assert!(h.cart.snapshot().is_empty());
}

#[tokio::test]
async fn test_seller_advances_pending_order() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_A, OrderStatus::Pending);
    let seller = Actor::user(SELLER_A);

    let order = h
        .orders
        .advance_status(&seller, &order_id, OrderStatus::Processing)
        .await
        .unwrap();

    assert_eq!(order.status(), OrderStatus::Processing);
    assert_eq!(h.orders.cached(&order_id).unwrap().status(), OrderStatus::Processing);
    assert!(h.backend.calls().contains(&Call::UpdateStatus(
        order_id,
        OrderStatus::Processing,
        StatusRoute::Seller
    )));
}

#[tokio::test]
async fn test_admin_uses_admin_route() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_B, OrderStatus::Processing);
    let admin = Actor::admin("admin-1");

    h.orders
        .advance_status(&admin, &order_id, OrderStatus::Shipped)
        .await
        .unwrap();

    assert!(h.backend.calls().contains(&Call::UpdateStatus(
        order_id.clone(),
        OrderStatus::Shipped,
        StatusRoute::Admin
    )));
    assert_eq!(
        h.backend.server_order(&order_id).unwrap().status(),
        OrderStatus::Shipped
    );
}

#[tokio::test]
async fn test_skipping_a_step_is_rejected_locally() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_A, OrderStatus::Pending);

    let err = h
        .orders
        .advance_status(&Actor::user(SELLER_A), &order_id, OrderStatus::Delivered)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        StoreError::InvalidTransition {
            order_id: Some(order_id),
            from: Some(OrderStatus::Pending),
            to: OrderStatus::Delivered,
        }
    );
    assert_eq!(h.backend.count("update_order_status"), 0);
}

#[tokio::test]
async fn test_shipped_order_cannot_be_cancelled() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_A, OrderStatus::Shipped);
    h.orders.my_sales().await.unwrap();
    let before = h.backend.calls().len();

    let err = h
        .orders
        .advance_status(&Actor::admin("admin-1"), &order_id, OrderStatus::Cancelled)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "invalid_transition");
    assert_eq!(h.backend.calls().len(), before + 1);
    assert_eq!(h.backend.count("get_order"), 1);
    assert_eq!(h.backend.count("update_order_status"), 0);

    let last = h.feedback.items().pop().unwrap();
    assert_eq!(last.detail.from, Some(OrderStatus::Shipped));
    assert_eq!(last.detail.to, Some(OrderStatus::Cancelled));
}

#[tokio::test]
async fn test_stale_cached_order_is_reloaded_before_rejecting() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_A, OrderStatus::Pending);
    h.orders.my_sales().await.unwrap();
    h.backend.advance_on_server(&order_id, OrderStatus::Processing);

    let order = h
        .orders
        .advance_status(&Actor::user(SELLER_A), &order_id, OrderStatus::Shipped)
        .await
        .unwrap();

    assert_eq!(order.status(), OrderStatus::Shipped);
    assert_eq!(h.backend.count("get_order"), 1);
    assert!(h.backend.calls().contains(&Call::UpdateStatus(
        order_id.clone(),
        OrderStatus::Shipped,
        StatusRoute::Seller
    )));
    assert_eq!(h.orders.cached(&order_id).unwrap().status(), OrderStatus::Shipped);
}

#[tokio::test]
async fn test_fresh_cached_order_skips_reload() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_A, OrderStatus::Pending);
    h.orders.my_sales().await.unwrap();

    h.orders
        .advance_status(&Actor::user(SELLER_A), &order_id, OrderStatus::Processing)
        .await
        .unwrap();

    assert_eq!(h.backend.count("get_order"), 0);
    assert_eq!(h.backend.count("update_order_status"), 1);
}

#[tokio::test]
async fn test_buyer_cannot_advance_order() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_A, OrderStatus::Pending);

    let err = h
        .orders
        .advance_status(&Actor::user(BUYER), &order_id, OrderStatus::Processing)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Authorization(_)));
    assert_eq!(h.backend.count("update_order_status"), 0);
}

#[tokio::test]
async fn test_server_rejection_maps_to_invalid_transition() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_A, OrderStatus::Pending);
    h.backend.fail_next(
        "update_order_status",
        http_error(400, serde_json::json!({"message": "Invalid status transition"})),
    );

    let err = h
        .orders
        .advance_status(&Actor::user(SELLER_A), &order_id, OrderStatus::Cancelled)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidTransition { .. }));
    assert_eq!(h.orders.cached(&order_id).unwrap().status(), OrderStatus::Pending);
}

#[tokio::test]
async fn test_concurrent_advance_same_order_is_turned_away() {
    let h = Harness::new();
    let order_id = h.backend.seed_order(SELLER_A, OrderStatus::Pending);
    let seller = Actor::user(SELLER_A);
    let gate = h.backend.hold("update_order_status");

    let (first, second, _) = tokio::join!(
        h.orders
            .advance_status(&seller, &order_id, OrderStatus::Processing),
        h.orders
            .advance_status(&seller, &order_id, OrderStatus::Cancelled),
        async {
            tokio::task::yield_now().await;
            gate.notify_one();
        }
    );

    assert_eq!(first.unwrap().status(), OrderStatus::Processing);
    let err = second.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyInProgress { .. }));
    assert_eq!(h.backend.count("update_order_status"), 1);
}

#[tokio::test]
async fn test_all_orders_requires_admin() {
    let h = Harness::new();
    h.backend.seed_order(SELLER_A, OrderStatus::Pending);

    let err = h
        .orders
        .all_orders(&Actor::user(BUYER))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Authorization(_)));
    assert!(h.backend.calls().is_empty());

    let all = h.orders.all_orders(&Actor::admin("admin-1")).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_order_lists() {
    let h = Harness::new();
    h.backend.seed_order(SELLER_A, OrderStatus::Pending);
    h.backend.seed_order(SELLER_B, OrderStatus::Delivered);

    assert_eq!(h.orders.my_orders().await.unwrap().len(), 2);
    let sales = h.orders.my_sales().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].seller_id().as_str(), SELLER_A);
}
