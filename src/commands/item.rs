//! One-shot item commands.
//!
//! Each invocation loads the list first, applies at most one change, and
//! prints the resulting list.

use clap::{Args, Subcommand};
use shoplist_core::{InvalidInput, MutationReport};

use super::{connect, flush_notifications, Engine};
use crate::config::Config;
use crate::render::{print_items, OutputFormat};

#[derive(Args)]
pub struct ItemCommand {
    #[command(subcommand)]
    pub command: ItemSubcommand,
}

#[derive(Subcommand)]
pub enum ItemSubcommand {
    /// Show the shopping list
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an item (or update the amounts of one with the same name)
    Add {
        /// Item name
        name: String,

        /// Quantity
        #[arg(long, short, default_value = "1")]
        qty: String,

        /// Unit price
        #[arg(long, short, default_value = "0")]
        price: String,
    },

    /// Rename an item or change its amounts
    Update {
        /// Current item name
        name: String,

        /// New name (defaults to the current one)
        #[arg(long, short)]
        rename: Option<String>,

        /// New quantity (defaults to the current one)
        #[arg(long, short)]
        qty: Option<String>,

        /// New unit price (defaults to the current one)
        #[arg(long, short)]
        price: Option<String>,
    },

    /// Remove an item
    Remove {
        /// Item name
        name: String,
    },
}

impl ItemCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (mut engine, mut rx) = connect(config)?;
        engine.load().await;

        let format = match &self.command {
            ItemSubcommand::List { format } => *format,
            ItemSubcommand::Add { name, qty, price } => {
                engine.add(name, qty.as_str(), price.as_str()).await?;
                OutputFormat::Text
            }
            ItemSubcommand::Update {
                name,
                rename,
                qty,
                price,
            } => {
                update_item(
                    &mut engine,
                    name,
                    rename.as_deref(),
                    qty.as_deref(),
                    price.as_deref(),
                )
                .await?;
                OutputFormat::Text
            }
            ItemSubcommand::Remove { name } => {
                engine.delete(name).await?;
                OutputFormat::Text
            }
        };

        flush_notifications(&mut rx, config);
        print_items(engine.snapshot(), format)
    }
}

/// Update `name`, defaulting unset fields to the item's current values.
///
/// An item missing from the local list (for instance because the server
/// could not be read) is still sent to the server, with unset amounts
/// defaulting to a quantity of 1 and a price of 0.
async fn update_item(
    engine: &mut Engine,
    name: &str,
    rename: Option<&str>,
    qty: Option<&str>,
    price: Option<&str>,
) -> Result<MutationReport, InvalidInput> {
    let current = match engine.begin_edit(name) {
        Ok(item) => Some(item.clone()),
        Err(InvalidInput::UnknownItem(_)) => None,
        Err(e) => return Err(e),
    };

    match current {
        Some(current) => {
            let new_name = rename.unwrap_or(&current.name);
            let quantity = qty.map_or(current.quantity, Into::into);
            let unit_price = price.map_or(current.price, Into::into);
            engine.commit_edit(new_name, quantity, unit_price).await
        }
        None => {
            engine
                .update(
                    name,
                    rename.unwrap_or(name),
                    qty.unwrap_or("1"),
                    price.unwrap_or("0"),
                )
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoplist_core::{
        ChannelNotifier, Delivery, HttpRemote, Item, ItemStore, Notification, Reconciler,
        Settlement,
    };
    use tokio::sync::mpsc::UnboundedReceiver;

    /// An engine pointed at a port nothing listens on.
    async fn offline(store: ItemStore) -> (Engine, UnboundedReceiver<Notification>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (notifier, rx) = ChannelNotifier::channel();
        let remote = HttpRemote::new(format!("http://{}", addr));
        (Reconciler::with_store(store, remote, notifier), rx)
    }

    #[tokio::test]
    async fn test_update_unknown_item_while_offline_saves_locally() {
        let (mut engine, mut rx) = offline(ItemStore::new()).await;

        let report = update_item(&mut engine, "Milk", None, Some("3"), None)
            .await
            .unwrap();

        assert_eq!(report.remote.settlement(), Settlement::Unreachable);
        let note = rx.try_recv().unwrap();
        assert_eq!(note.message, "Item updated");
        assert_eq!(note.delivery, Delivery::LocalOnly);
    }

    #[tokio::test]
    async fn test_update_known_item_keeps_unset_fields() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::new("Milk", 2, 1.5));
        let (mut engine, _rx) = offline(store).await;

        update_item(&mut engine, "milk", None, Some("3"), None)
            .await
            .unwrap();

        assert_eq!(engine.snapshot(), &[Item::new("Milk", 3, 1.5)]);
        assert!(engine.edit_target().is_none());
    }

    #[tokio::test]
    async fn test_update_with_rename() {
        let mut store = ItemStore::new();
        store.upsert_optimistic(Item::new("Milk", 2, 1.5));
        let (mut engine, _rx) = offline(store).await;

        update_item(&mut engine, "Milk", Some("Oat milk"), None, Some("2,25"))
            .await
            .unwrap();

        assert_eq!(engine.snapshot(), &[Item::new("Oat milk", 2, 2.25)]);
    }

    #[tokio::test]
    async fn test_update_blank_name_is_refused() {
        let (mut engine, _rx) = offline(ItemStore::new()).await;

        let err = update_item(&mut engine, "  ", None, None, None)
            .await
            .unwrap_err();

        assert_eq!(err, InvalidInput::EmptyName);
    }
}
