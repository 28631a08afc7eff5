use anyhow::{bail, Context};
use storefront_core::{CurrencyFormat, DiscountBadge, OrderSummary, Product};

/// One-line product card: name, price, discount badge, stock.
pub(crate) fn render_card(product: &Product, format: &CurrencyFormat) -> String {
    let mut card = product.name.clone();
    if product.is_new {
        card.push_str(" [NEW]");
    }
    if let Some(brand) = product.brand.as_deref().filter(|b| !b.is_empty()) {
        card.push_str(&format!(" by {brand}"));
    }

    card.push_str(" | ");
    card.push_str(&storefront_core::format_price(&product.price, format));

    if let Some(badge) = DiscountBadge::for_product(product, format) {
        card.push_str(&format!(
            " (was {}, {}, save {})",
            badge.reference_display,
            badge.label(),
            badge.savings_display
        ));
    }

    card.push_str(" | ");
    match product.stock {
        Some(n) if product.in_stock() => card.push_str(&format!("in stock ({n})")),
        _ => card.push_str("out of stock"),
    }
    card
}

pub(crate) fn render_summary(summary: &OrderSummary, format: &CurrencyFormat) -> String {
    let mut out = format!(
        "items: {} ({} lines)\nsubtotal: {}",
        summary.item_count,
        summary.line_count,
        summary.subtotal_display(format)
    );
    if summary.savings > rust_decimal::Decimal::ZERO {
        out.push_str(&format!(
            "\nlist price: {}\nyou save: {}",
            summary.reference_subtotal_display(format),
            summary.savings_display(format)
        ));
    }
    out
}

/// Parses an order line argument of the form `ID` or `ID:QTY`.
pub(crate) fn parse_line_spec(spec: &str) -> anyhow::Result<(String, u32)> {
    let (id, qty) = match spec.rsplit_once(':') {
        Some((id, qty)) => (
            id,
            qty.parse::<u32>()
                .with_context(|| format!("invalid quantity in '{spec}'"))?,
        ),
        None => (spec, 1),
    };
    if id.trim().is_empty() {
        bail!("missing product id in '{spec}'");
    }
    Ok((id.to_owned(), qty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chai() -> Product {
        Product::new("chai", "Masala Chai", 400.0)
            .with_reference_price(500.0)
            .with_stock(5)
    }

    #[test]
    fn card_shows_badge_for_discounted_product() {
        let card = render_card(&chai(), &CurrencyFormat::inr());
        assert_eq!(
            card,
            "Masala Chai | ₹400.00 (was ₹500.00, 20% OFF, save ₹100.00) | in stock (5)"
        );
    }

    #[test]
    fn card_hides_badge_when_price_exceeds_reference() {
        let product = Product::new("x", "Marked Up", 500.0)
            .with_reference_price(400.0)
            .with_stock(1);
        let card = render_card(&product, &CurrencyFormat::inr());
        assert!(!card.contains("OFF"), "unexpected badge in: {card}");
        assert!(!card.contains("was"), "unexpected strikethrough in: {card}");
    }

    #[test]
    fn card_marks_missing_stock_as_out_of_stock() {
        let mut product = Product::new("x", "Kettle", "bad-price");
        product.is_new = true;
        let card = render_card(&product, &CurrencyFormat::inr());
        assert_eq!(card, "Kettle [NEW] | ₹0.00 | out of stock");
    }

    #[test]
    fn summary_includes_savings_only_when_present() {
        let inr = CurrencyFormat::inr();
        let discounted = OrderSummary::from_lines(&[storefront_core::OrderLine::new(chai(), 1)]);
        assert!(render_summary(&discounted, &inr).contains("you save: ₹100.00"));

        let plain = OrderSummary::from_lines(&[storefront_core::OrderLine::new(
            Product::new("t", "Tea", 50.0),
            2,
        )]);
        let rendered = render_summary(&plain, &inr);
        assert!(rendered.contains("subtotal: ₹100.00"));
        assert!(!rendered.contains("you save"));
    }

    #[test]
    fn parse_line_spec_defaults_quantity_to_one() {
        assert_eq!(parse_line_spec("chai").unwrap(), ("chai".to_owned(), 1));
        assert_eq!(parse_line_spec("chai:3").unwrap(), ("chai".to_owned(), 3));
    }

    #[test]
    fn parse_line_spec_rejects_bad_input() {
        assert!(parse_line_spec("chai:lots").is_err());
        assert!(parse_line_spec(":2").is_err());
    }
}
