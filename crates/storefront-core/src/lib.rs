pub mod app_config;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod discount;
pub mod pricing;
pub mod products;
pub mod summary;

use thiserror::Error;

pub use app_config::{Environment, StorefrontConfig};
pub use cart::{
    AdmissionOutcome, CartAdmissionGate, CartError, CartService, GateState, InMemoryCart,
    Notification, NotificationKind, RejectReason, Session,
};
pub use catalog::{load_catalog, Catalog, CatalogError};
pub use config::{load_config, load_config_from_env};
pub use discount::{calculate_discount, has_discount, savings, DiscountBadge};
pub use pricing::{format_amount, format_price, CurrencyFormat, Grouping};
pub use products::{PriceError, Product, RawPrice};
pub use summary::{OrderLine, OrderSummary};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
