//! The session facade — the surface the UI consumes.
//!
//! Wraps a [`Store`] and a spawned [`Coordinator`] behind intent methods
//! and selector reads. Each mutating method mints the request id, dispatches
//! the matching intent, and returns the id so callers can correlate the
//! eventual resolution. `remove_category` is the one saga step: the item
//! slice is re-filed (or stripped) *before* the category leaves the slice,
//! so derived views never render a dangling reference.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use opp_store::{
    select, AppState, Category, CategoryAction, CategoryId, CategoryItems, Item, ItemAction,
    ItemId, RequestId, SecretPhrase, Store,
};

use crate::backend::Backend;
use crate::effects::Coordinator;

/// A live editing session against one backend.
#[derive(Debug)]
pub struct Session {
    store: Store,
    coordinator: JoinHandle<()>,
}

impl Session {
    /// Wire `store` and `backend` together and start the effect loop.
    #[must_use]
    pub fn new(store: Store, backend: Arc<dyn Backend>) -> Self {
        let coordinator = Coordinator::new(store.clone(), backend).spawn();
        Self { store, coordinator }
    }

    /// A handle to the underlying store.
    #[must_use]
    pub fn store(&self) -> Store {
        self.store.clone()
    }

    // ── intents ─────────────────────────────────────────────────────────

    /// Start a full reload of categories and items.
    pub fn load(&self) -> RequestId {
        let request = RequestId::new();
        self.store.dispatch(CategoryAction::Load { request });
        request
    }

    /// Change the decryption passphrase; the effect layer updates the
    /// backend header and triggers a full reload.
    pub fn change_secret_phrase(&self, phrase: SecretPhrase) {
        self.store
            .dispatch(CategoryAction::SecretPhraseChange(phrase));
    }

    /// Create a category optimistically.
    pub fn add_category(&self, name: impl Into<String>) -> RequestId {
        let request = RequestId::new();
        self.store.dispatch(CategoryAction::Add {
            request,
            name: name.into(),
        });
        request
    }

    /// Rename a category optimistically. The current name is captured as
    /// the rollback value. Returns `None` when no such category exists.
    pub fn rename_category(&self, id: CategoryId, name: impl Into<String>) -> Option<RequestId> {
        let state = self.store.state();
        let initial_name = state
            .categories
            .categories
            .iter()
            .find(|c| c.id == Some(id))
            .map(|c| c.name.clone())?;

        let request = RequestId::new();
        self.store.dispatch(CategoryAction::Edit {
            request,
            id,
            name: name.into(),
            initial_name,
        });
        Some(request)
    }

    /// Remove a category. With `cascade` its items go too; without, they
    /// are re-filed as unfiled first. Returns `None` when no such category
    /// exists.
    pub fn remove_category(&self, id: CategoryId, cascade: bool) -> Option<RequestId> {
        let state = self.store.state();
        let category = state
            .categories
            .categories
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()?;

        // Saga prelude: resolve the items' fate before the category
        // disappears from derived views.
        if cascade {
            self.store
                .dispatch(ItemAction::RemoveFromCategory { category: id });
        } else {
            self.store
                .dispatch(ItemAction::SetCategory { from: id, to: None });
        }

        let request = RequestId::new();
        self.store.dispatch(CategoryAction::Remove {
            request,
            category,
            cascade,
        });
        Some(request)
    }

    /// Create an item optimistically. Any id on the draft is discarded —
    /// the backend assigns one.
    pub fn add_item(&self, draft: Item) -> RequestId {
        let request = RequestId::new();
        self.store.dispatch(ItemAction::Add {
            request,
            item: Item {
                id: None,
                request: Some(request),
                ..draft
            },
        });
        request
    }

    /// Replace an item wholesale, optimistically. The stored value is
    /// captured as the rollback payload. Returns `None` when no item with
    /// the given id exists.
    pub fn update_item(&self, item: Item) -> Option<RequestId> {
        let state = self.store.state();
        let previous = state
            .items
            .items
            .iter()
            .find(|i| i.id.is_some() && i.id == item.id)
            .cloned()?;

        let request = RequestId::new();
        self.store.dispatch(ItemAction::Update {
            request,
            item,
            previous,
        });
        Some(request)
    }

    /// Remove an item. Returns `None` when no such item exists.
    pub fn remove_item(&self, id: ItemId) -> Option<RequestId> {
        let state = self.store.state();
        let item = state
            .items
            .items
            .iter()
            .find(|i| i.id == Some(id))
            .cloned()?;

        let request = RequestId::new();
        self.store.dispatch(ItemAction::Remove { request, item });
        Some(request)
    }

    // ── reads ───────────────────────────────────────────────────────────

    /// Snapshot of the full state.
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.store.state()
    }

    /// Denormalized category/item tree.
    #[must_use]
    pub fn category_items(&self) -> Vec<CategoryItems> {
        select::category_items(&self.store.state())
    }

    /// Items not filed under any category.
    #[must_use]
    pub fn unfiled_items(&self) -> Vec<Item> {
        select::items_without_category(&self.store.state())
    }

    /// The normalized category list.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.store.state().categories.categories
    }

    /// Aggregate readiness signal.
    #[must_use]
    pub fn loading(&self) -> bool {
        select::loading(&self.store.state())
    }

    /// Subscribe to state updates.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<AppState> {
        self.store.watch()
    }

    /// Wait until every pending mutation in both slices has resolved.
    pub async fn settled(&self) {
        let mut rx = self.store.watch();
        loop {
            if rx.borrow_and_update().is_settled() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.coordinator.abort();
    }
}
