use std::future::Future;

use thiserror::Error;

/// Failure reported by the cart collaborator.
///
/// The message, when present, is shown to the shopper verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("cart service rejected the request"))]
pub struct CartError {
    pub message: Option<String>,
}

impl CartError {
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A failure with no human-readable detail.
    #[must_use]
    pub fn opaque() -> Self {
        Self { message: None }
    }
}

/// The external cart store that owns cart contents.
///
/// Admission only decides whether to call it; the service has the final say
/// on whether the item is actually added.
pub trait CartService: Send + Sync {
    /// Adds `quantity` units of `product_id` to the shopper's cart.
    fn add_to_cart(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> impl Future<Output = Result<(), CartError>> + Send;
}

/// Authentication context for an admission request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    #[must_use]
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
