//! Cart admission: decides whether an add-to-cart request may reach the cart
//! collaborator, and classifies the result for the notification surface.

mod gate;
mod memory;
mod outcome;
mod service;

pub use gate::CartAdmissionGate;
pub use memory::InMemoryCart;
pub use outcome::{AdmissionOutcome, GateState, Notification, NotificationKind, RejectReason};
pub use service::{CartError, CartService, Session};
