use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::app_config::StorefrontConfig;
use crate::products::Product;

use super::outcome::{AdmissionOutcome, GateState, RejectReason, TIMEOUT_DETAIL};
use super::service::{CartService, Session};

/// Admission gate for one display surface.
///
/// Preconditions are checked in a fixed order: authentication first, then
/// stock. Only when both pass is the cart service called, exactly once, under
/// a timeout. Requests for a product that already has a call in flight on
/// this gate are dropped with [`AdmissionOutcome::AlreadyAdding`].
///
/// The in-flight set is per gate instance. Two gates backed by the same cart
/// service do not coordinate with each other.
pub struct CartAdmissionGate<C> {
    cart: C,
    timeout: Duration,
    in_flight: Mutex<HashSet<String>>,
    last: Mutex<GateState>,
}

impl<C: CartService> CartAdmissionGate<C> {
    #[must_use]
    pub fn new(cart: C, timeout: Duration) -> Self {
        Self {
            cart,
            timeout,
            in_flight: Mutex::new(HashSet::new()),
            last: Mutex::new(GateState::Idle),
        }
    }

    /// Creates a gate using the cart timeout from `config`.
    #[must_use]
    pub fn from_config(cart: C, config: &StorefrontConfig) -> Self {
        Self::new(cart, Duration::from_millis(config.cart_timeout_ms))
    }

    #[must_use]
    pub fn cart(&self) -> &C {
        &self.cart
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` while an add for `product_id` is awaiting the cart
    /// service. Surfaces use it to disable the add button.
    #[must_use]
    pub fn is_adding(&self, product_id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(product_id)
    }

    /// Current state for `product_id`: `Checking` while in flight, else `Idle`.
    #[must_use]
    pub fn state(&self, product_id: &str) -> GateState {
        if self.is_adding(product_id) {
            GateState::Checking
        } else {
            GateState::Idle
        }
    }

    /// Terminal state of the most recently completed request, or `Idle` if
    /// none has completed yet.
    #[must_use]
    pub fn last_outcome(&self) -> GateState {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs one admission request for `quantity` units of `product`.
    ///
    /// A `quantity` of zero is sent as one unit.
    pub async fn request_add(
        &self,
        session: &Session,
        product: &Product,
        quantity: u32,
    ) -> AdmissionOutcome {
        if !session.is_authenticated() {
            tracing::debug!(product_id = %product.id, "add rejected: no authenticated session");
            return self.finish(RejectReason::Unauthenticated.into());
        }

        if !product.in_stock() {
            tracing::debug!(
                product_id = %product.id,
                stock = ?product.stock,
                "add rejected: out of stock"
            );
            return self.finish(RejectReason::OutOfStock.into());
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &product.id) else {
            tracing::debug!(product_id = %product.id, "add ignored: request already in flight");
            return AdmissionOutcome::AlreadyAdding;
        };

        let quantity = quantity.max(1);
        tracing::debug!(product_id = %product.id, quantity, "calling cart service");

        let outcome =
            match tokio::time::timeout(self.timeout, self.cart.add_to_cart(&product.id, quantity))
                .await
            {
                Ok(Ok(())) => AdmissionOutcome::Admitted,
                Ok(Err(err)) => {
                    tracing::warn!(product_id = %product.id, error = %err, "cart service rejected add");
                    RejectReason::AddFailed {
                        detail: err.message,
                    }
                    .into()
                }
                Err(_) => {
                    tracing::warn!(
                        product_id = %product.id,
                        timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                        "cart service timed out"
                    );
                    RejectReason::AddFailed {
                        detail: Some(TIMEOUT_DETAIL.to_owned()),
                    }
                    .into()
                }
            };

        self.finish(outcome)
    }

    fn finish(&self, outcome: AdmissionOutcome) -> AdmissionOutcome {
        let terminal = match &outcome {
            AdmissionOutcome::Admitted => GateState::Admitted,
            AdmissionOutcome::Rejected(reason) => GateState::Rejected(reason.clone()),
            AdmissionOutcome::AlreadyAdding => return outcome,
        };
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = terminal;
        outcome
    }
}

/// Marks a product as in flight; unmarks it on drop, including when the
/// request future is cancelled mid-call.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    product_id: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a Mutex<HashSet<String>>, product_id: &str) -> Option<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id.to_owned());
        inserted.then(|| Self {
            set,
            product_id: product_id.to_owned(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.product_id);
    }
}
