//! Discount and savings computation.
//!
//! [`has_discount`] is the single predicate for "show a strikethrough
//! reference price". It is defined in terms of [`calculate_discount`], so a
//! surface that shows a reference price can never end up showing `0% OFF`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::{format_amount, CurrencyFormat};
use crate::products::{Product, RawPrice};

/// Whole-number discount percentage of `price` against `reference`.
///
/// Returns `0` when either value is missing, non-numeric, zero, or negative.
/// Otherwise returns `((reference - price) / reference) * 100` rounded half
/// up, which may be negative when `price` exceeds `reference`. Gate display
/// behind [`has_discount`].
#[must_use]
pub fn calculate_discount(reference: &RawPrice, price: &RawPrice) -> i64 {
    match (reference.as_decimal(), price.as_decimal()) {
        (Some(reference), Some(price)) => discount_percent(reference, price),
        _ => 0,
    }
}

/// [`calculate_discount`] over already-coerced amounts.
#[must_use]
pub fn discount_percent(reference: Decimal, price: Decimal) -> i64 {
    if reference <= Decimal::ZERO || price <= Decimal::ZERO {
        return 0;
    }
    let percent = (reference - price)
        .checked_div(reference)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    percent.and_then(round_half_up).unwrap_or(0)
}

// Half-way values round toward positive infinity: 33.5 -> 34, -33.5 -> -33.
fn round_half_up(value: Decimal) -> Option<i64> {
    value
        .checked_add(Decimal::new(5, 1))
        .map(|v| v.floor())
        .and_then(|v| v.to_i64())
}

/// Returns `true` when a product should show its reference price struck
/// through along with a discount badge.
#[must_use]
pub fn has_discount(reference: &RawPrice, price: &RawPrice) -> bool {
    calculate_discount(reference, price) > 0
}

/// Absolute savings (`reference - price`), present only when
/// [`has_discount`] holds.
#[must_use]
pub fn savings(reference: &RawPrice, price: &RawPrice) -> Option<Decimal> {
    if !has_discount(reference, price) {
        return None;
    }
    let reference = reference.as_decimal()?;
    let price = price.as_decimal()?;
    reference.checked_sub(price)
}

/// Everything a product card needs to render its discount badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountBadge {
    pub percent: i64,
    pub savings: Decimal,
    /// Formatted reference price, shown struck through.
    pub reference_display: String,
    pub savings_display: String,
}

impl DiscountBadge {
    /// Builds the badge for `product`, or `None` when it has no discount.
    #[must_use]
    pub fn for_product(product: &Product, format: &CurrencyFormat) -> Option<Self> {
        Self::new(&product.reference_price, &product.price, format)
    }

    #[must_use]
    pub fn new(reference: &RawPrice, price: &RawPrice, format: &CurrencyFormat) -> Option<Self> {
        let savings = savings(reference, price)?;
        Some(Self {
            percent: calculate_discount(reference, price),
            savings,
            reference_display: format_amount(reference.as_decimal()?, format),
            savings_display: format_amount(savings, format),
        })
    }

    /// Badge text, e.g. `"20% OFF"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}% OFF", self.percent)
    }
}
