use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a [`RawPrice`] could not be coerced to a decimal amount.
///
/// No variant is ever shown to a shopper: display code substitutes the
/// zero-currency string instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is missing")]
    Missing,

    #[error("invalid price input: {0:?}")]
    InvalidInput(String),

    #[error("price {0} is outside the representable decimal range")]
    OutOfRange(String),
}

/// A price exactly as the data source supplied it.
///
/// Catalog documents carry prices as JSON numbers, decimal strings
/// (`"12.99"`), `null`, or omit the field entirely. Any other shape (a
/// boolean, object, or array) is kept as `Invalid` so one bad record does not
/// fail the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    Invalid(serde_json::Value),
}

impl RawPrice {
    /// Coerces the raw value to an exact decimal.
    ///
    /// Strings are trimmed and accept plain (`"1299.50"`) or scientific
    /// (`"1.2995e3"`) notation.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Missing`] for an absent value,
    /// [`PriceError::OutOfRange`] for finite numbers beyond `Decimal::MAX`
    /// (about 7.9e28), and [`PriceError::InvalidInput`] for non-finite
    /// numbers, non-numeric strings, or values of any other type.
    pub fn to_decimal(&self) -> Result<Decimal, PriceError> {
        match self {
            RawPrice::Missing => Err(PriceError::Missing),
            RawPrice::Number(n) => {
                if !n.is_finite() {
                    return Err(PriceError::InvalidInput(n.to_string()));
                }
                Decimal::from_f64(*n).ok_or_else(|| PriceError::OutOfRange(n.to_string()))
            }
            RawPrice::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(PriceError::InvalidInput(s.clone()));
                }
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map_err(|_| PriceError::InvalidInput(s.clone()))
            }
            RawPrice::Invalid(value) => Err(PriceError::InvalidInput(value.to_string())),
        }
    }

    /// Infallible form of [`RawPrice::to_decimal`].
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        self.to_decimal().ok()
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, RawPrice::Missing)
    }
}

impl From<f64> for RawPrice {
    fn from(value: f64) -> Self {
        RawPrice::Number(value)
    }
}

impl From<i64> for RawPrice {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        RawPrice::Number(value as f64)
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        RawPrice::Text(value.to_owned())
    }
}

impl From<Decimal> for RawPrice {
    fn from(value: Decimal) -> Self {
        RawPrice::Text(value.to_string())
    }
}

impl<T: Into<RawPrice>> From<Option<T>> for RawPrice {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawPrice::Missing, Into::into)
    }
}

/// A catalog product as supplied by the document store.
///
/// Treated as an immutable snapshot: every rule reads it, none mutates it.
/// The comparison price is stored under one canonical name; the legacy
/// `mrp` / `originalPrice` spellings are accepted when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: RawPrice,
    /// Pre-discount listed price (MRP). Absent, or not above `price`, means
    /// the product carries no discount.
    #[serde(
        default,
        alias = "referencePrice",
        alias = "mrp",
        alias = "originalPrice",
        alias = "original_price"
    )]
    pub reference_price: RawPrice,
    /// Units on hand. `None` or `<= 0` means unavailable.
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "imageUrl", alias = "image")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "isNew")]
    pub is_new: bool,
}

impl Product {
    /// Creates a product with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: impl Into<RawPrice>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            reference_price: RawPrice::Missing,
            stock: None,
            brand: None,
            description: None,
            image_url: None,
            category: None,
            is_new: false,
        }
    }

    #[must_use]
    pub fn with_reference_price(mut self, reference_price: impl Into<RawPrice>) -> Self {
        self.reference_price = reference_price.into();
        self
    }

    #[must_use]
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Returns `true` if at least one unit is available for purchase.
    ///
    /// This is the only stock predicate in the crate; a missing count and a
    /// zero or negative count are all treated as out of stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_some_and(|s| s > 0)
    }

    #[must_use]
    pub fn price_decimal(&self) -> Option<Decimal> {
        self.price.as_decimal()
    }

    #[must_use]
    pub fn reference_decimal(&self) -> Option<Decimal> {
        self.reference_price.as_decimal()
    }
}
