//! Integration tests for `CartAdmissionGate` against the in-memory cart.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use storefront_core::{
    AdmissionOutcome, CartAdmissionGate, CartError, CartService, GateState, InMemoryCart,
    NotificationKind, Product, RejectReason, Session, StorefrontConfig,
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn in_stock() -> Product {
    Product::new("chai", "Masala Chai", 400.0)
        .with_reference_price(500.0)
        .with_stock(5)
}

fn out_of_stock() -> Product {
    Product::new("kettle", "Kettle", 1250.0).with_stock(0)
}

fn signed_in() -> Session {
    Session::authenticated("user-1")
}

/// Cart service that always fails, optionally without a message.
struct FailingCart {
    message: Option<&'static str>,
    calls: AtomicUsize,
}

impl CartService for FailingCart {
    fn add_to_cart(
        &self,
        _product_id: &str,
        _quantity: u32,
    ) -> impl Future<Output = Result<(), CartError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let err = CartError {
            message: self.message.map(str::to_owned),
        };
        async move { Err(err) }
    }
}

#[tokio::test]
async fn admits_authenticated_in_stock_request() {
    let gate = CartAdmissionGate::new(InMemoryCart::new(), TIMEOUT);
    let product = in_stock();

    let outcome = gate.request_add(&signed_in(), &product, 2).await;

    assert_eq!(outcome, AdmissionOutcome::Admitted);
    assert_eq!(gate.cart().quantity_of("chai"), 2);
    assert_eq!(gate.cart().call_count(), 1);
    assert_eq!(gate.last_outcome(), GateState::Admitted);
    assert_eq!(gate.state("chai"), GateState::Idle);

    let notification = outcome.notification(&product).expect("expected notification");
    assert_eq!(notification.kind, NotificationKind::Success);
}

#[tokio::test]
async fn unauthenticated_takes_precedence_over_out_of_stock() {
    let gate = CartAdmissionGate::new(InMemoryCart::new(), TIMEOUT);

    let outcome = gate
        .request_add(&Session::anonymous(), &out_of_stock(), 1)
        .await;

    assert_eq!(outcome, AdmissionOutcome::Rejected(RejectReason::Unauthenticated));
    assert_eq!(gate.cart().call_count(), 0);
}

#[tokio::test]
async fn out_of_stock_rejected_for_authenticated_user() {
    let gate = CartAdmissionGate::new(InMemoryCart::new(), TIMEOUT);
    let missing_stock = Product::new("mystery", "Mystery Box", 99.0);

    for product in [out_of_stock(), missing_stock, out_of_stock().with_stock(-1)] {
        let outcome = gate.request_add(&signed_in(), &product, 1).await;
        assert_eq!(outcome, AdmissionOutcome::Rejected(RejectReason::OutOfStock));
    }
    assert_eq!(gate.cart().call_count(), 0);
    assert_eq!(
        gate.last_outcome(),
        GateState::Rejected(RejectReason::OutOfStock)
    );
}

#[tokio::test]
async fn cart_full_surfaces_as_add_failed_with_detail() {
    let gate = CartAdmissionGate::new(InMemoryCart::new().with_capacity(0), TIMEOUT);
    let product = in_stock();

    let outcome = gate.request_add(&signed_in(), &product, 1).await;

    assert_eq!(
        outcome,
        AdmissionOutcome::Rejected(RejectReason::AddFailed {
            detail: Some("Cart full".to_owned()),
        })
    );
    let notification = outcome.notification(&product).expect("expected notification");
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, "Cart full");
    assert_eq!(gate.state("chai"), GateState::Idle);
}

#[tokio::test]
async fn failure_without_message_uses_generic_text() {
    let cart = FailingCart {
        message: None,
        calls: AtomicUsize::new(0),
    };
    let gate = CartAdmissionGate::new(cart, TIMEOUT);
    let product = in_stock();

    let outcome = gate.request_add(&signed_in(), &product, 1).await;

    assert_eq!(
        outcome,
        AdmissionOutcome::Rejected(RejectReason::AddFailed { detail: None })
    );
    let notification = outcome.notification(&product).expect("expected notification");
    assert_eq!(notification.message, "Failed to add item to cart");
    assert_eq!(gate.cart().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn gate_is_reusable_after_failure() {
    let cart = FailingCart {
        message: Some("Service unavailable"),
        calls: AtomicUsize::new(0),
    };
    let gate = CartAdmissionGate::new(cart, TIMEOUT);
    let product = in_stock();

    gate.request_add(&signed_in(), &product, 1).await;
    let second = gate.request_add(&signed_in(), &product, 1).await;

    assert_eq!(second.reject_reason().map(RejectReason::tag), Some("add_failed"));
    assert_eq!(gate.cart().calls.load(Ordering::SeqCst), 2);
    assert!(!gate.is_adding("chai"));
}

#[tokio::test]
async fn duplicate_request_while_in_flight_is_ignored() {
    let cart = InMemoryCart::new().with_latency(Duration::from_millis(200));
    let gate = CartAdmissionGate::new(cart, TIMEOUT);
    let product = in_stock();
    let session = signed_in();

    let (first, second) = tokio::join!(gate.request_add(&session, &product, 1), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(gate.is_adding("chai"));
        assert_eq!(gate.state("chai"), GateState::Checking);
        gate.request_add(&session, &product, 1).await
    });

    assert_eq!(first, AdmissionOutcome::Admitted);
    assert_eq!(second, AdmissionOutcome::AlreadyAdding);
    assert!(second.notification(&product).is_none());
    assert_eq!(gate.cart().call_count(), 1);
    assert_eq!(gate.cart().quantity_of("chai"), 1);
    assert!(!gate.is_adding("chai"));
}

#[tokio::test]
async fn different_products_do_not_block_each_other() {
    let cart = InMemoryCart::new().with_latency(Duration::from_millis(50));
    let gate = CartAdmissionGate::new(cart, TIMEOUT);
    let session = signed_in();
    let chai = in_stock();
    let tea = Product::new("tea", "Green Tea", 200.0).with_stock(1);

    let (a, b) = tokio::join!(
        gate.request_add(&session, &chai, 1),
        gate.request_add(&session, &tea, 1)
    );

    assert!(a.is_admitted());
    assert!(b.is_admitted());
    assert_eq!(gate.cart().call_count(), 2);
}

#[tokio::test]
async fn slow_cart_times_out_as_add_failed() {
    let cart = InMemoryCart::new().with_latency(Duration::from_millis(500));
    let gate = CartAdmissionGate::new(cart, Duration::from_millis(20));
    let product = in_stock();

    let outcome = gate.request_add(&signed_in(), &product, 1).await;

    assert_eq!(
        outcome,
        AdmissionOutcome::Rejected(RejectReason::AddFailed {
            detail: Some("timeout".to_owned()),
        })
    );
    assert!(!gate.is_adding("chai"));
    assert_eq!(gate.cart().quantity_of("chai"), 0);
}

#[tokio::test]
async fn zero_quantity_is_sent_as_one_unit() {
    let gate = CartAdmissionGate::new(InMemoryCart::new(), TIMEOUT);

    gate.request_add(&signed_in(), &in_stock(), 0).await;

    assert_eq!(gate.cart().quantity_of("chai"), 1);
}

#[test]
fn from_config_uses_configured_timeout() {
    let config = StorefrontConfig {
        cart_timeout_ms: 1500,
        ..StorefrontConfig::default()
    };
    let gate = CartAdmissionGate::from_config(InMemoryCart::new(), &config);
    assert_eq!(gate.timeout(), Duration::from_millis(1500));
}
