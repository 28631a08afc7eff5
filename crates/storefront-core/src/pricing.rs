//! Price normalization: turns heterogeneous raw prices into the store's
//! canonical currency display string.
//!
//! Every display surface goes through [`format_price`], so malformed input
//! always renders as the zero-currency string (e.g. `"₹0.00"`) instead of
//! surfacing an error.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::products::{PriceError, RawPrice};

/// Digit grouping convention for the integer part of an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Groups of three: `1,234,567`.
    Western,
    /// Last three digits, then groups of two: `12,34,567`.
    Indian,
}

/// Currency and locale display settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    /// ISO 4217 code, e.g. `"INR"`.
    pub code: &'static str,
    /// BCP 47 locale the grouping follows, e.g. `"en-IN"`.
    pub locale: &'static str,
    pub symbol: &'static str,
    pub grouping: Grouping,
}

impl CurrencyFormat {
    /// Indian Rupee, `en-IN` grouping.
    #[must_use]
    pub const fn inr() -> Self {
        Self {
            code: "INR",
            locale: "en-IN",
            symbol: "₹",
            grouping: Grouping::Indian,
        }
    }

    /// US Dollar, `en-US` grouping.
    #[must_use]
    pub const fn usd() -> Self {
        Self {
            code: "USD",
            locale: "en-US",
            symbol: "$",
            grouping: Grouping::Western,
        }
    }

    /// Looks up a supported currency by ISO code (case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "INR" => Some(Self::inr()),
            "USD" => Some(Self::usd()),
            _ => None,
        }
    }

    /// The display string for a zero amount, e.g. `"₹0.00"`.
    #[must_use]
    pub fn zero_display(&self) -> String {
        format!("{}0.00", self.symbol)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::inr()
    }
}

/// Formats a raw price for display.
///
/// Missing and non-numeric input produce [`CurrencyFormat::zero_display`].
/// So do numbers beyond `Decimal::MAX` (about 7.9e28); every amount within
/// that range round-trips to its two-place rounding.
#[must_use]
pub fn format_price(raw: &RawPrice, format: &CurrencyFormat) -> String {
    match raw.to_decimal() {
        Ok(amount) => format_amount(amount, format),
        Err(PriceError::Missing) => format.zero_display(),
        Err(err @ PriceError::OutOfRange(_)) => {
            tracing::warn!(error = %err, "substituting zero price for out-of-range amount");
            format.zero_display()
        }
        Err(err) => {
            tracing::debug!(error = %err, "substituting zero price for invalid input");
            format.zero_display()
        }
    }
}

/// Formats an exact amount with two fractional digits and locale grouping.
///
/// Rounds half away from zero. Negative amounts render as `-₹1,234.50`.
#[must_use]
pub fn format_amount(amount: Decimal, format: &CurrencyFormat) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!(
        "{sign}{}{}.{frac_part}",
        format.symbol,
        group_digits(int_part, format.grouping)
    )
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let size = match grouping {
        Grouping::Western => 3,
        Grouping::Indian => 2,
    };

    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > size {
        let (front, group) = rest.split_at(rest.len() - size);
        groups.push(group);
        rest = front;
    }
    groups.push(rest);
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}
