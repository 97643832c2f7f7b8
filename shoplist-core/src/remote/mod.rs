//! Remote sync client.
//!
//! Each logical operation maps to exactly one outbound request and settles
//! to either a typed success or a [`RemoteFailure`]. There is no retrying and
//! no caching here; resilience is the engine's job.
//!
//! ## Protocol
//!
//! The list service speaks plain HTTP `GET` with query parameters:
//! - `getItems` returns the full list as a JSON array
//! - `addItem?itemNameAdd=&itemQuantity=&itemPrice=`
//! - `updateItem?itemName=&itemNameUpdate=&itemQuantity=&itemPrice=`
//! - `deleteItem?itemNameDelete=`
//!
//! Mutations answer with a short text body, returned as the [`Ack`].

mod error;
mod http;

pub use error::{FailureKind, RemoteFailure};
pub use http::HttpRemote;

use crate::models::{Item, Price, Quantity};

/// A successful mutation, with whatever text the remote sent back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The four operations the list service offers.
///
/// Implementations must not retry: one call, one request, one settlement.
#[allow(async_fn_in_trait)]
pub trait RemoteSync {
    /// Fetch the authoritative list. An empty list is a real answer.
    async fn fetch_all(&self) -> Result<Vec<Item>, RemoteFailure>;

    async fn create(
        &self,
        name: &str,
        quantity: Quantity,
        price: Price,
    ) -> Result<Ack, RemoteFailure>;

    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        quantity: Quantity,
        price: Price,
    ) -> Result<Ack, RemoteFailure>;

    async fn delete(&self, name: &str) -> Result<Ack, RemoteFailure>;
}
