//! Remote item payloads.
//!
//! The list service is loose about its item shape: the name may arrive as
//! `name` or `itemName`, amounts may be numbers, numeric strings or null,
//! and the purchase flag may be missing. Everything is normalized here, once,
//! so the rest of the crate only ever sees canonical [`Item`]s.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{Item, Price, PurchaseState, Quantity};

/// An item exactly as the remote sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WireItem {
    pub name: Option<String>,
    #[serde(rename = "itemName")]
    pub item_name: Option<String>,
    #[serde(rename = "nameUpdate")]
    pub name_update: Option<String>,
    pub quantity: Option<Value>,
    pub price: Option<Value>,
    #[serde(rename = "isPurchased")]
    pub is_purchased: Option<Value>,
    pub purchased: Option<Value>,
}

impl WireItem {
    /// Normalize into a canonical item.
    ///
    /// A payload with neither `name` nor `itemName` yields an empty name;
    /// [`decode_items`] drops those.
    pub fn into_item(self) -> Item {
        let name = non_empty(self.name)
            .or_else(|| non_empty(self.item_name))
            .unwrap_or_default();

        Item {
            name,
            pending_name: non_empty(self.name_update),
            quantity: quantity_from(self.quantity.as_ref()),
            price: price_from(self.price.as_ref()),
            purchased: purchase_state_from(self.is_purchased.as_ref().or(self.purchased.as_ref())),
        }
    }
}

impl From<WireItem> for Item {
    fn from(wire: WireItem) -> Self {
        wire.into_item()
    }
}

/// Decode a `getItems` response body into canonical items.
///
/// Entries without a usable name are skipped.
pub fn decode_items(body: &str) -> Result<Vec<Item>, serde_json::Error> {
    let wire: Vec<WireItem> = serde_json::from_str(body)?;
    let total = wire.len();
    let items: Vec<Item> = wire
        .into_iter()
        .map(WireItem::into_item)
        .filter(|item| !item.name.is_empty())
        .collect();
    if items.len() < total {
        warn!("Skipped {} remote item(s) without a name", total - items.len());
    }
    Ok(items)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn quantity_from(value: Option<&Value>) -> Quantity {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(Quantity::from_f64).unwrap_or_default(),
        Some(Value::String(s)) => Quantity::coerce(s),
        _ => Quantity::ONE,
    }
}

fn price_from(value: Option<&Value>) -> Price {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(Price::from).unwrap_or_default(),
        Some(Value::String(s)) => Price::coerce(s),
        _ => Price::ZERO,
    }
}

fn purchase_state_from(value: Option<&Value>) -> PurchaseState {
    match value {
        Some(Value::Bool(b)) => PurchaseState::from(Some(*b)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => PurchaseState::Purchased,
            "false" => PurchaseState::NotPurchased,
            _ => PurchaseState::Unknown,
        },
        _ => PurchaseState::Unknown,
    }
}
