//! Reconciliation engine.
//!
//! Every user mutation follows the same protocol:
//!
//! 1. apply the change optimistically to the local store
//! 2. ask the remote to confirm it
//! 3. converge: keep the local change whatever the remote said, notify,
//!    and reload the authoritative list
//!
//! Step 3 is a single code path for success, `Unreachable` and `Rejected`
//! alike. The user's intent always survives locally; only the next
//! successful load can correct it. A failed load leaves the store as it is,
//! so the list stays usable with stale or empty data while the remote is
//! down.
//!
//! The engine owns the store and is its only writer. All methods take
//! `&mut self`, so mutations are applied one settled continuation at a time.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Item, Price, Quantity};
use crate::notify::{Delivery, Notification, NotificationKind, Notifier};
use crate::remote::{Ack, FailureKind, RemoteFailure, RemoteSync};
use crate::store::ItemStore;

/// Input refused before any remote call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("Item name cannot be empty")]
    EmptyName,

    #[error("No item selected for editing")]
    NoSelection,

    #[error("No item named '{0}' on the list")]
    UnknownItem(String),
}

/// The three user mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Add,
    Update,
    Delete,
}

impl MutationKind {
    fn notification(self) -> NotificationKind {
        match self {
            MutationKind::Add => NotificationKind::Added,
            MutationKind::Update => NotificationKind::Updated,
            MutationKind::Delete => NotificationKind::Removed,
        }
    }
}

/// How the remote call of a mutation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Success,
    Unreachable,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    OptimisticApplied,
    RemoteSettled(Settlement),
    Reconciled,
}

/// The remote half of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Confirmed(Ack),
    Failed(RemoteFailure),
}

impl RemoteOutcome {
    pub fn settlement(&self) -> Settlement {
        match self {
            RemoteOutcome::Confirmed(_) => Settlement::Success,
            RemoteOutcome::Failed(f) => match f.kind() {
                FailureKind::Unreachable => Settlement::Unreachable,
                FailureKind::Rejected => Settlement::Rejected,
            },
        }
    }

    pub fn delivery(&self) -> Delivery {
        match self {
            RemoteOutcome::Confirmed(_) => Delivery::Confirmed,
            RemoteOutcome::Failed(_) => Delivery::LocalOnly,
        }
    }
}

impl From<Result<Ack, RemoteFailure>> for RemoteOutcome {
    fn from(result: Result<Ack, RemoteFailure>) -> Self {
        match result {
            Ok(ack) => RemoteOutcome::Confirmed(ack),
            Err(failure) => RemoteOutcome::Failed(failure),
        }
    }
}

/// Result of loading the authoritative list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store now holds exactly what the remote returned.
    Refreshed { count: usize },
    /// The remote could not be read; the store was left untouched.
    KeptLocal { failure: RemoteFailure },
}

impl LoadOutcome {
    pub fn is_refreshed(&self) -> bool {
        matches!(self, LoadOutcome::Refreshed { .. })
    }
}

/// How a mutation settled, end to end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport {
    pub kind: MutationKind,
    pub remote: RemoteOutcome,
    pub refresh: LoadOutcome,
}

/// Keeps a local item store consistent with a remote list.
pub struct Reconciler<R, N> {
    store: ItemStore,
    remote: R,
    notifier: N,
    /// Name of the item an open edit targets.
    editing: Option<String>,
}

impl<R: RemoteSync, N: Notifier> Reconciler<R, N> {
    /// Creates an engine with an empty store.
    pub fn new(remote: R, notifier: N) -> Self {
        Self::with_store(ItemStore::new(), remote, notifier)
    }

    /// Creates an engine over existing local state.
    pub fn with_store(store: ItemStore, remote: R, notifier: N) -> Self {
        Self {
            store,
            remote,
            notifier,
            editing: None,
        }
    }

    /// Current items, in display order.
    pub fn snapshot(&self) -> &[Item] {
        self.store.snapshot()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Replace local state with the remote's list, or keep it if the remote
    /// cannot be read.
    pub async fn load(&mut self) -> LoadOutcome {
        match self.remote.fetch_all().await {
            Ok(items) => {
                let count = items.len();
                self.store.replace_all(items);
                info!("Loaded {} item(s) from remote", count);
                LoadOutcome::Refreshed { count }
            }
            Err(failure) => {
                warn!("Using local items: {}", failure);
                LoadOutcome::KeptLocal { failure }
            }
        }
    }

    /// Add an item, or update the amounts of an item with the same name.
    pub async fn add(
        &mut self,
        name: &str,
        quantity: impl Into<Quantity>,
        price: impl Into<Price>,
    ) -> Result<MutationReport, InvalidInput> {
        let name = required_name(name)?;
        let item = Item::new(name, quantity, price);

        let kind = MutationKind::Add;
        trace_phase(kind, Phase::Idle);
        self.store.upsert_optimistic(item.clone());
        trace_phase(kind, Phase::OptimisticApplied);

        let result = self
            .remote
            .create(&item.name, item.quantity, item.price)
            .await;

        Ok(self.converge(kind, result, |_| {}).await)
    }

    /// Rename an item and overwrite its amounts.
    pub async fn update(
        &mut self,
        old_name: &str,
        new_name: &str,
        quantity: impl Into<Quantity>,
        price: impl Into<Price>,
    ) -> Result<MutationReport, InvalidInput> {
        required_name(old_name)?;
        let new_name = required_name(new_name)?;
        let (quantity, price) = (quantity.into(), price.into());

        let kind = MutationKind::Update;
        trace_phase(kind, Phase::Idle);
        if !self.store.stage_update(old_name, new_name, quantity, price) {
            debug!("'{}' is not on the local list; update goes to remote only", old_name);
        }
        trace_phase(kind, Phase::OptimisticApplied);

        let result = self
            .remote
            .update(old_name, new_name, quantity, price)
            .await;

        Ok(self
            .converge(kind, result, |store| {
                store.apply_rename(old_name);
            })
            .await)
    }

    /// Remove an item. Removing a name that is not on the list is a no-op.
    pub async fn delete(&mut self, name: &str) -> Result<MutationReport, InvalidInput> {
        required_name(name)?;

        let kind = MutationKind::Delete;
        trace_phase(kind, Phase::Idle);
        self.store.remove_by_identity(name);
        trace_phase(kind, Phase::OptimisticApplied);

        let result = self.remote.delete(name).await;

        Ok(self.converge(kind, result, |_| {}).await)
    }

    /// Open an edit on the item matching `target`.
    pub fn begin_edit(&mut self, target: &str) -> Result<&Item, InvalidInput> {
        let item = self
            .store
            .find(target)
            .ok_or_else(|| InvalidInput::UnknownItem(target.to_string()))?;
        self.editing = Some(item.name.clone());
        Ok(item)
    }

    /// The item the open edit targets, if it is still on the list.
    pub fn editing(&self) -> Option<&Item> {
        self.editing
            .as_deref()
            .and_then(|name| self.store.find(name))
    }

    /// Name the open edit targets.
    pub fn edit_target(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Commit the open edit as an update and close it.
    ///
    /// An empty new name keeps the edit open so the caller can re-prompt.
    pub async fn commit_edit(
        &mut self,
        new_name: &str,
        quantity: impl Into<Quantity>,
        price: impl Into<Price>,
    ) -> Result<MutationReport, InvalidInput> {
        let target = self.editing.clone().ok_or(InvalidInput::NoSelection)?;
        required_name(new_name)?;

        self.editing = None;
        self.update(&target, new_name, quantity, price).await
    }

    /// Delete the item the open edit targets and close it.
    pub async fn delete_selected(&mut self) -> Result<MutationReport, InvalidInput> {
        let target = self.editing.take().ok_or(InvalidInput::NoSelection)?;
        self.delete(&target).await
    }

    /// Shared tail of every mutation, whatever the remote said.
    async fn converge(
        &mut self,
        kind: MutationKind,
        result: Result<Ack, RemoteFailure>,
        finish: impl FnOnce(&mut ItemStore),
    ) -> MutationReport {
        let remote = RemoteOutcome::from(result);
        trace_phase(kind, Phase::RemoteSettled(remote.settlement()));
        if let RemoteOutcome::Failed(failure) = &remote {
            warn!("{:?} kept locally: {}", kind, failure);
        }

        finish(&mut self.store);
        self.notifier
            .notify(Notification::new(kind.notification(), remote.delivery()));

        let refresh = self.load().await;
        trace_phase(kind, Phase::Reconciled);
        trace_phase(kind, Phase::Idle);

        MutationReport {
            kind,
            remote,
            refresh,
        }
    }
}

fn required_name(name: &str) -> Result<&str, InvalidInput> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(InvalidInput::EmptyName)
    } else {
        Ok(trimmed)
    }
}

fn trace_phase(kind: MutationKind, phase: Phase) {
    debug!(mutation = ?kind, phase = ?phase, "mutation phase");
}
