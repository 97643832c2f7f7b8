//! Shoplist Core Library
//!
//! Item model, local store and the reconciliation engine that keeps the
//! store in step with a remote shopping list.

pub mod engine;
pub mod identity;
pub mod models;
pub mod notify;
pub mod remote;
pub mod store;

pub use engine::{
    InvalidInput, LoadOutcome, MutationKind, MutationReport, Reconciler, RemoteOutcome,
    Settlement,
};
pub use identity::Identified;
pub use models::{Item, Price, PurchaseState, Quantity};
pub use notify::{
    ChannelNotifier, Delivery, LogNotifier, Notification, NotificationKind, Notifier,
};
pub use remote::{Ack, FailureKind, HttpRemote, RemoteFailure, RemoteSync};
pub use store::ItemStore;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
