//! Local item store.
//!
//! An ordered, in-memory list of items: the only state the UI renders from.
//! The store is owned by the reconciliation engine, which is its only
//! writer; everyone else reads through [`ItemStore::snapshot`].

use tracing::warn;

use crate::identity::{self, Identified};
use crate::models::{Item, Price, Quantity};

/// What an optimistic upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Ordered collection of items, unique by identity.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the current contents and install `items` verbatim.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        if has_duplicates(&items) {
            warn!("authoritative item list contains names that differ only by case");
        }
        self.items = items;
    }

    /// Update the matching item's fields in place, or append a new item.
    ///
    /// The existing item keeps its spelling of the name.
    pub fn upsert_optimistic(&mut self, item: Item) -> Upsert {
        match self.find_mut(&item) {
            Some(existing) => {
                existing.quantity = item.quantity;
                existing.price = item.price;
                Upsert::Updated
            }
            None => {
                self.items.push(item);
                Upsert::Inserted
            }
        }
    }

    /// Remove the first item matching `key`. Absent keys are a no-op.
    pub fn remove_by_identity(&mut self, key: &(impl Identified + ?Sized)) -> Option<Item> {
        let index = self.position(key)?;
        Some(self.items.remove(index))
    }

    /// Overwrite the amounts of the item matching `old_name` and stage a
    /// rename to `new_name`. Returns false when nothing matches.
    pub fn stage_update(
        &mut self,
        old_name: &str,
        new_name: &str,
        quantity: Quantity,
        price: Price,
    ) -> bool {
        match self.find_mut(old_name) {
            Some(item) => {
                item.stage_rename(new_name);
                item.quantity = quantity;
                item.price = price;
                true
            }
            None => false,
        }
    }

    /// Apply the rename staged on the item matching `key`.
    ///
    /// If another item already holds the new name, it is dropped so names
    /// stay unique. Returns false when nothing matches or nothing is staged.
    pub fn apply_rename(&mut self, key: &str) -> bool {
        let Some(mut index) = self.position(key) else {
            return false;
        };
        let Some(new_name) = self.items[index].pending_name.clone() else {
            return false;
        };

        let clash = self
            .items
            .iter()
            .enumerate()
            .find(|(i, item)| *i != index && identity::matches(*item, &new_name))
            .map(|(i, _)| i);
        if let Some(other) = clash {
            self.items.remove(other);
            if other < index {
                index -= 1;
            }
        }

        self.items[index].apply_rename()
    }

    /// The current ordered contents.
    pub fn snapshot(&self) -> &[Item] {
        &self.items
    }

    /// Find an item by identity.
    pub fn find(&self, key: &(impl Identified + ?Sized)) -> Option<&Item> {
        self.items.iter().find(|item| identity::matches(*item, key))
    }

    fn find_mut(&mut self, key: &(impl Identified + ?Sized)) -> Option<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| identity::matches(&**item, key))
    }

    fn position(&self, key: &(impl Identified + ?Sized)) -> Option<usize> {
        self.items
            .iter()
            .position(|item| identity::matches(item, key))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line totals.
    pub fn total(&self) -> f64 {
        self.items.iter().map(Item::line_total).sum()
    }
}

fn has_duplicates(items: &[Item]) -> bool {
    let mut seen = std::collections::HashSet::new();
    items.iter().any(|item| !seen.insert(item.identity_key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(store: &ItemStore) -> Vec<&str> {
        store.snapshot().iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_upsert_appends_then_updates() {
        let mut store = ItemStore::new();
        assert_eq!(store.upsert_optimistic(Item::new("Milk", 1, 2.0)), Upsert::Inserted);
        assert_eq!(store.upsert_optimistic(Item::new("Bread", 1, 5.0)), Upsert::Inserted);
        assert_eq!(store.upsert_optimistic(Item::new("MILK", 3, 2.5)), Upsert::Updated);

        assert_eq!(names(&store), vec!["Milk", "Bread"]);
        let milk = store.find("milk").unwrap();
        assert_eq!(milk.quantity.get(), 3);
        assert_eq!(milk.price.get(), 2.5);
    }

    #[test]
    fn test_replace_all_is_verbatim() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::named("Local only"));

        let authoritative = vec![Item::new("Eggs", 12, 0.3), Item::named("Apples")];
        store.replace_all(authoritative.clone());
        assert_eq!(store.snapshot(), authoritative.as_slice());

        store.replace_all(Vec::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_by_identity() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::named("Milk"));
        store.upsert_optimistic(Item::named("Bread"));

        let removed = store.remove_by_identity("BREAD").unwrap();
        assert_eq!(removed.name, "Bread");
        assert_eq!(names(&store), vec!["Milk"]);

        // Second removal is a no-op
        assert!(store.remove_by_identity("bread").is_none());
        assert_eq!(store.len(), 1);
    }

    fn rename(store: &mut ItemStore, old: &str, new: &str, quantity: u32, price: f64) -> bool {
        store.stage_update(old, new, Quantity::from(quantity), Price::from(price))
            && store.apply_rename(old)
    }

    #[test]
    fn test_stage_update_keeps_identity_until_applied() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::named("Milk"));

        assert!(store.stage_update("milk", "Oat milk", Quantity::from(2), Price::from(4.0)));
        let staged = store.find("Milk").unwrap();
        assert_eq!(staged.pending_name.as_deref(), Some("Oat milk"));
        assert_eq!(staged.quantity.get(), 2);
        assert!(store.find("Oat milk").is_none());

        assert!(store.apply_rename("milk"));
        assert!(store.find("Milk").is_none());
        assert!(store.find("OAT MILK").unwrap().pending_name.is_none());
    }

    #[test]
    fn test_rename_updates_in_place() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::named("Milk"));
        store.upsert_optimistic(Item::named("Bread"));

        assert!(rename(&mut store, "milk", "Oat milk", 2, 4.0));
        assert_eq!(names(&store), vec!["Oat milk", "Bread"]);
        assert_eq!(store.find("oat milk").unwrap().price.get(), 4.0);
    }

    #[test]
    fn test_rename_case_only() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::named("milk"));

        assert!(rename(&mut store, "milk", "Milk", 1, 0.0));
        assert_eq!(names(&store), vec!["Milk"]);
    }

    #[test]
    fn test_rename_onto_existing_name_merges() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::named("Bread"));
        store.upsert_optimistic(Item::named("Milk"));
        store.upsert_optimistic(Item::named("Eggs"));

        assert!(rename(&mut store, "Eggs", "bread", 6, 0.0));
        assert_eq!(names(&store), vec!["Milk", "bread"]);
        assert_eq!(store.find("BREAD").unwrap().quantity.get(), 6);
    }

    #[test]
    fn test_rename_missing_is_noop() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::named("Milk"));
        assert!(!store.stage_update("Bread", "Rolls", Quantity::ONE, Price::ZERO));
        assert!(!store.apply_rename("Bread"));
        assert!(!store.apply_rename("Milk"));
        assert_eq!(names(&store), vec!["Milk"]);
    }

    #[test]
    fn test_total() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::new("Milk", 2, 3.5));
        store.upsert_optimistic(Item::new("Bread", 1, 5.0));
        assert_eq!(store.total(), 12.0);
    }
}
