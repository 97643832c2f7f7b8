//! Shopping list entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Price, Quantity};
use crate::identity::{self, Identified};

/// Whether an item has been bought. The remote may not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum PurchaseState {
    #[default]
    Unknown,
    Purchased,
    NotPurchased,
}

impl From<Option<bool>> for PurchaseState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => PurchaseState::Unknown,
            Some(true) => PurchaseState::Purchased,
            Some(false) => PurchaseState::NotPurchased,
        }
    }
}

impl From<PurchaseState> for Option<bool> {
    fn from(value: PurchaseState) -> Self {
        match value {
            PurchaseState::Unknown => None,
            PurchaseState::Purchased => Some(true),
            PurchaseState::NotPurchased => Some(false),
        }
    }
}

/// One entry on the shopping list.
///
/// `name` is the identity key and is compared case-insensitively.
/// `pending_name` holds a rename that has been staged but not yet applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_name: Option<String>,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub purchased: PurchaseState,
}

impl Item {
    /// Create an item with unknown purchase state.
    pub fn new(name: impl Into<String>, quantity: impl Into<Quantity>, price: impl Into<Price>) -> Self {
        Self {
            name: name.into(),
            pending_name: None,
            quantity: quantity.into(),
            price: price.into(),
            purchased: PurchaseState::Unknown,
        }
    }

    /// Create an item with quantity 1 and price 0.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Quantity::ONE, Price::ZERO)
    }

    /// Returns true if both items share an identity.
    pub fn matches(&self, other: &impl Identified) -> bool {
        identity::matches(self, other)
    }

    /// Stage a rename. The current name stays the identity key until
    /// [`Item::apply_rename`] runs.
    pub fn stage_rename(&mut self, new_name: impl Into<String>) {
        self.pending_name = Some(new_name.into());
    }

    /// Apply a staged rename. Returns false if nothing was staged.
    pub fn apply_rename(&mut self) -> bool {
        match self.pending_name.take() {
            Some(name) => {
                self.name = name;
                true
            }
            None => false,
        }
    }

    /// Price for the whole line (unit price times quantity).
    pub fn line_total(&self) -> f64 {
        self.price.get() * f64::from(self.quantity.get())
    }
}

impl Identified for Item {
    fn identity_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = match self.purchased {
            PurchaseState::Purchased => "[x]",
            PurchaseState::NotPurchased => "[ ]",
            PurchaseState::Unknown => "[?]",
        };
        write!(
            f,
            "{} {:<20} {} x {} = {:.2}",
            check,
            self.name,
            self.quantity,
            self.price,
            self.line_total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_new_defaults() {
        let item = Item::named("Milk");
        assert_eq!(item.name, "Milk");
        assert_eq!(item.quantity, Quantity::ONE);
        assert_eq!(item.price, Price::ZERO);
        assert_eq!(item.purchased, PurchaseState::Unknown);
        assert!(item.pending_name.is_none());
    }

    #[test]
    fn test_item_new_coerces_amounts() {
        let item = Item::new("Eggs", 0, -3.0);
        assert_eq!(item.quantity.get(), 1);
        assert_eq!(item.price.get(), 0.0);
    }

    #[test]
    fn test_stage_and_apply_rename() {
        let mut item = Item::named("Milk");
        item.stage_rename("Oat milk");
        assert_eq!(item.name, "Milk");
        assert!(item.matches(&"MILK"));

        assert!(item.apply_rename());
        assert_eq!(item.name, "Oat milk");
        assert!(item.pending_name.is_none());
        assert!(!item.apply_rename());
    }

    #[test]
    fn test_line_total() {
        let item = Item::new("Bread", 3, 2.5);
        assert_eq!(item.line_total(), 7.5);
    }

    #[test]
    fn test_display() {
        let item = Item::new("Bread", 2, 5.0);
        assert_eq!(item.to_string(), "[?] Bread                2 x 5.00 = 10.00");
    }

    #[test]
    fn test_json_shape() {
        let mut item = Item::new("Milk", 2, 3.5);
        item.purchased = PurchaseState::Purchased;
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Milk",
                "quantity": 2,
                "price": 3.5,
                "purchased": true
            })
        );

        let parsed: Item = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, item);
    }
}
