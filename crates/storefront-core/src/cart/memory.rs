use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::service::{CartError, CartService};

/// Message returned when an add would push the cart past its capacity.
pub const CART_FULL: &str = "Cart full";

/// A process-local [`CartService`] holding cart lines in memory.
///
/// Optionally bounded by a total unit capacity, and optionally slowed down by
/// a fixed latency per call.
#[derive(Debug, Default)]
pub struct InMemoryCart {
    lines: Mutex<BTreeMap<String, u32>>,
    capacity: Option<u32>,
    latency: Duration,
    calls: AtomicUsize,
}

impl InMemoryCart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the total number of units across all lines.
    #[must_use]
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Delays every `add_to_cart` call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of times `add_to_cart` has been invoked, successful or not.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Units of `product_id` currently in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(product_id)
            .copied()
            .unwrap_or(0)
    }

    /// Snapshot of all cart lines, ordered by product id.
    #[must_use]
    pub fn lines(&self) -> Vec<(String, u32)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, qty)| (id.clone(), *qty))
            .collect()
    }

    fn insert(&self, product_id: String, quantity: u32) -> Result<(), CartError> {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        let total: u32 = lines.values().fold(0, |acc, q| acc.saturating_add(*q));
        if let Some(capacity) = self.capacity {
            if total.saturating_add(quantity) > capacity {
                return Err(CartError::with_message(CART_FULL));
            }
        }
        let line = lines.entry(product_id).or_insert(0);
        *line = line.saturating_add(quantity);
        Ok(())
    }
}

impl CartService for InMemoryCart {
    fn add_to_cart(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> impl Future<Output = Result<(), CartError>> + Send {
        let product_id = product_id.to_owned();
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.insert(product_id, quantity)
        }
    }
}
