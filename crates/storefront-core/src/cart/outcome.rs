use serde::Serialize;

use crate::products::Product;

/// Fallback shown when the cart service fails without a message.
pub const GENERIC_ADD_FAILURE: &str = "Failed to add item to cart";

/// Detail attached to [`RejectReason::AddFailed`] when the cart service does
/// not answer within the configured timeout.
pub const TIMEOUT_DETAIL: &str = "timeout";

/// Why an add-to-cart request did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    Unauthenticated,
    OutOfStock,
    AddFailed { detail: Option<String> },
}

impl RejectReason {
    /// Stable machine tag: `unauthenticated`, `out_of_stock`, or `add_failed`.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            RejectReason::Unauthenticated => "unauthenticated",
            RejectReason::OutOfStock => "out_of_stock",
            RejectReason::AddFailed { .. } => "add_failed",
        }
    }

    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            RejectReason::AddFailed { detail } => detail.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{} ({detail})", self.tag()),
            None => write!(f, "{}", self.tag()),
        }
    }
}

/// Per-product admission state.
///
/// `Checking` lasts exactly as long as the cart service call is in flight;
/// the gate returns to `Idle` once a terminal state has been reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Checking,
    Admitted,
    Rejected(RejectReason),
}

/// Result of one admission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdmissionOutcome {
    Admitted,
    Rejected(RejectReason),
    /// A request for the same product was already in flight on this gate;
    /// this one was dropped without calling the cart service.
    AlreadyAdding,
}

impl AdmissionOutcome {
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionOutcome::Admitted)
    }

    #[must_use]
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            AdmissionOutcome::Rejected(reason) => Some(reason),
            _ => None,
        }
    }

    /// The notification the calling surface should show, if any.
    #[must_use]
    pub fn notification(&self, product: &Product) -> Option<Notification> {
        let notification = match self {
            AdmissionOutcome::Admitted => {
                Notification::success(format!("{} added to cart", product.name))
            }
            AdmissionOutcome::Rejected(RejectReason::Unauthenticated) => {
                Notification::warning("Please sign in to add items to your cart")
            }
            AdmissionOutcome::Rejected(RejectReason::OutOfStock) => {
                Notification::warning(format!("{} is out of stock", product.name))
            }
            AdmissionOutcome::Rejected(RejectReason::AddFailed { detail }) => {
                Notification::error(detail.as_deref().unwrap_or(GENERIC_ADD_FAILURE))
            }
            AdmissionOutcome::AlreadyAdding => return None,
        };
        Some(notification)
    }
}

impl From<RejectReason> for AdmissionOutcome {
    fn from(reason: RejectReason) -> Self {
        AdmissionOutcome::Rejected(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Warning => write!(f, "warning"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// A `(kind, message)` pair for the toast/modal surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new("p1", "Masala Chai", 400.0).with_stock(3)
    }

    #[test]
    fn reason_tags_are_stable() {
        assert_eq!(RejectReason::Unauthenticated.tag(), "unauthenticated");
        assert_eq!(RejectReason::OutOfStock.tag(), "out_of_stock");
        assert_eq!(RejectReason::AddFailed { detail: None }.tag(), "add_failed");
    }

    #[test]
    fn admitted_notifies_success() {
        let n = AdmissionOutcome::Admitted
            .notification(&product())
            .expect("expected notification");
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.message, "Masala Chai added to cart");
    }

    #[test]
    fn unauthenticated_notifies_sign_in_warning() {
        let n = AdmissionOutcome::Rejected(RejectReason::Unauthenticated)
            .notification(&product())
            .expect("expected notification");
        assert_eq!(n.kind, NotificationKind::Warning);
        assert!(n.message.contains("sign in"));
    }

    #[test]
    fn out_of_stock_notifies_stock_warning() {
        let n = AdmissionOutcome::Rejected(RejectReason::OutOfStock)
            .notification(&product())
            .expect("expected notification");
        assert_eq!(n.kind, NotificationKind::Warning);
        assert_eq!(n.message, "Masala Chai is out of stock");
    }

    #[test]
    fn add_failed_uses_detail_or_generic_message() {
        let with_detail = AdmissionOutcome::Rejected(RejectReason::AddFailed {
            detail: Some("Cart full".to_owned()),
        })
        .notification(&product())
        .expect("expected notification");
        assert_eq!(with_detail.kind, NotificationKind::Error);
        assert_eq!(with_detail.message, "Cart full");

        let without = AdmissionOutcome::Rejected(RejectReason::AddFailed { detail: None })
            .notification(&product())
            .expect("expected notification");
        assert_eq!(without.message, GENERIC_ADD_FAILURE);
    }

    #[test]
    fn already_adding_is_silent() {
        assert!(AdmissionOutcome::AlreadyAdding.notification(&product()).is_none());
    }

    #[test]
    fn outcome_serializes_with_reason_tag() {
        let outcome = AdmissionOutcome::Rejected(RejectReason::AddFailed {
            detail: Some("timeout".to_owned()),
        });
        let json = serde_json::to_value(&outcome).expect("serialization failed");
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["reason"], "add_failed");
        assert_eq!(json["detail"], "timeout");
    }
}
