//! Order summary totals for the checkout page.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::discount::has_discount;
use crate::pricing::{format_amount, CurrencyFormat};
use crate::products::Product;

/// One product line in an order.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product: Product,
    pub quantity: u32,
}

impl OrderLine {
    #[must_use]
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Selling price × quantity. An unparseable price contributes zero.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .price_decimal()
            .unwrap_or(Decimal::ZERO)
            .saturating_mul(Decimal::from(self.quantity))
    }

    /// Reference price × quantity when the product is discounted, otherwise
    /// the same as [`OrderLine::line_total`].
    #[must_use]
    pub fn reference_total(&self) -> Decimal {
        if !has_discount(&self.product.reference_price, &self.product.price) {
            return self.line_total();
        }
        self.product
            .reference_decimal()
            .unwrap_or(Decimal::ZERO)
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// Aggregated totals over a set of [`OrderLine`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub line_count: usize,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub reference_subtotal: Decimal,
    pub savings: Decimal,
}

impl OrderSummary {
    /// Totals `lines`, skipping any with zero quantity.
    #[must_use]
    pub fn from_lines(lines: &[OrderLine]) -> Self {
        let mut summary = lines
            .iter()
            .filter(|line| line.quantity > 0)
            .fold(Self::default(), |mut acc, line| {
                acc.line_count += 1;
                acc.item_count += u64::from(line.quantity);
                acc.subtotal = acc.subtotal.saturating_add(line.line_total());
                acc.reference_subtotal =
                    acc.reference_subtotal.saturating_add(line.reference_total());
                acc
            });
        summary.savings = summary.reference_subtotal.saturating_sub(summary.subtotal);
        summary
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    #[must_use]
    pub fn subtotal_display(&self, format: &CurrencyFormat) -> String {
        format_amount(self.subtotal, format)
    }

    #[must_use]
    pub fn reference_subtotal_display(&self, format: &CurrencyFormat) -> String {
        format_amount(self.reference_subtotal, format)
    }

    #[must_use]
    pub fn savings_display(&self, format: &CurrencyFormat) -> String {
        format_amount(self.savings, format)
    }
}
