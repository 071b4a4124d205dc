//! The effect coordinator.
//!
//! The only place where dispatched intents meet the backend. The
//! coordinator consumes the store's action stream on its own task; each
//! intent fans out to exactly one backend call (spawned, so independent
//! operations run concurrently) and resolves to exactly one success or
//! failure action carrying the originating request id. No retries, no
//! backoff — a rejected mutation is reported once and rolled back, and the
//! caller must re-issue the intent. Result actions and the local bulk item
//! actions trigger no effect.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use opp_store::{Action, Category, CategoryAction, ItemAction, RequestId, Store};

use crate::backend::Backend;

/// Bridges the action stream to the backend collaborator.
pub struct Coordinator {
    store: Store,
    backend: Arc<dyn Backend>,
    actions: tokio::sync::broadcast::Receiver<Action>,
}

impl Coordinator {
    /// Subscribe to `store`'s action stream.
    ///
    /// Intents dispatched after this call are observed even if
    /// [`spawn`](Self::spawn) runs later.
    #[must_use]
    pub fn new(store: Store, backend: Arc<dyn Backend>) -> Self {
        let actions = store.actions();
        Self {
            store,
            backend,
            actions,
        }
    }

    /// Run the coordinator on its own task.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        loop {
            match self.actions.recv().await {
                Ok(action) => self.handle(action),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "action stream lagged; some intents may never resolve");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn handle(&self, action: Action) {
        match action {
            Action::Category(action) => self.handle_category(action),
            Action::Item(action) => self.handle_item(action),
        }
    }

    fn handle_category(&self, action: CategoryAction) {
        match action {
            CategoryAction::Load { request } => {
                let (store, backend) = (self.store.clone(), Arc::clone(&self.backend));
                tokio::spawn(async move {
                    load_all(&store, &*backend, request).await;
                });
            }

            CategoryAction::SecretPhraseChange(phrase) => {
                let (store, backend) = (self.store.clone(), Arc::clone(&self.backend));
                tokio::spawn(async move {
                    backend.set_secret_phrase(phrase).await;
                    info!("secret phrase changed; reloading");
                    store.dispatch(CategoryAction::Load {
                        request: RequestId::new(),
                    });
                });
            }

            CategoryAction::Add { request, name } => {
                let (store, backend) = (self.store.clone(), Arc::clone(&self.backend));
                tokio::spawn(async move {
                    match backend.add_category(&name).await {
                        Ok(category) => {
                            store.dispatch(CategoryAction::AddSuccess { request, category });
                        }
                        Err(error) => {
                            warn!(%request, %error, "add category rejected");
                            store.dispatch(CategoryAction::AddFail { request });
                        }
                    }
                });
            }

            CategoryAction::Edit {
                request,
                id,
                name,
                initial_name,
            } => {
                let (store, backend) = (self.store.clone(), Arc::clone(&self.backend));
                tokio::spawn(async move {
                    let category = Category::persisted(id, name.clone());
                    match backend.update_category(&category).await {
                        Ok(()) => store.dispatch(CategoryAction::EditSuccess { request }),
                        Err(error) => {
                            warn!(%request, %error, "edit category rejected");
                            store.dispatch(CategoryAction::EditFail {
                                request,
                                id,
                                name,
                                initial_name,
                            });
                        }
                    }
                });
            }

            CategoryAction::Remove {
                request,
                category,
                cascade,
            } => {
                let Some(id) = category.id else {
                    warn!(%request, "remove dispatched for an unconfirmed category");
                    self.store
                        .dispatch(CategoryAction::RemoveFail { request, category });
                    return;
                };
                let (store, backend) = (self.store.clone(), Arc::clone(&self.backend));
                tokio::spawn(async move {
                    match backend.remove_category(id, cascade).await {
                        Ok(()) => store.dispatch(CategoryAction::RemoveSuccess { request }),
                        Err(error) => {
                            warn!(%request, %error, "remove category rejected");
                            store.dispatch(CategoryAction::RemoveFail { request, category });
                        }
                    }
                });
            }

            // Results of our own dispatches — nothing to do.
            CategoryAction::LoadSuccess { .. }
            | CategoryAction::AddSuccess { .. }
            | CategoryAction::AddFail { .. }
            | CategoryAction::EditSuccess { .. }
            | CategoryAction::EditFail { .. }
            | CategoryAction::RemoveSuccess { .. }
            | CategoryAction::RemoveFail { .. } => {}
        }
    }

    fn handle_item(&self, action: ItemAction) {
        match action {
            ItemAction::Add { request, item } => {
                let (store, backend) = (self.store.clone(), Arc::clone(&self.backend));
                tokio::spawn(async move {
                    match backend.add_item(&item).await {
                        Ok(item) => store.dispatch(ItemAction::AddSuccess { request, item }),
                        Err(error) => {
                            warn!(%request, %error, "add item rejected");
                            store.dispatch(ItemAction::AddFail { request });
                        }
                    }
                });
            }

            ItemAction::Update {
                request,
                item,
                previous,
            } => {
                let (store, backend) = (self.store.clone(), Arc::clone(&self.backend));
                tokio::spawn(async move {
                    match backend.update_item(&item).await {
                        Ok(()) => store.dispatch(ItemAction::UpdateSuccess { request }),
                        Err(error) => {
                            warn!(%request, %error, "update item rejected");
                            store.dispatch(ItemAction::UpdateFail { request, previous });
                        }
                    }
                });
            }

            ItemAction::Remove { request, item } => {
                let Some(id) = item.id else {
                    warn!(%request, "remove dispatched for an unconfirmed item");
                    self.store.dispatch(ItemAction::RemoveFail { request, item });
                    return;
                };
                let (store, backend) = (self.store.clone(), Arc::clone(&self.backend));
                tokio::spawn(async move {
                    match backend.remove_item(id).await {
                        Ok(()) => store.dispatch(ItemAction::RemoveSuccess { request }),
                        Err(error) => {
                            warn!(%request, %error, "remove item rejected");
                            store.dispatch(ItemAction::RemoveFail { request, item });
                        }
                    }
                });
            }

            // Results and local bulk transforms — nothing to do.
            ItemAction::LoadSuccess { .. }
            | ItemAction::AddSuccess { .. }
            | ItemAction::AddFail { .. }
            | ItemAction::UpdateSuccess { .. }
            | ItemAction::UpdateFail { .. }
            | ItemAction::RemoveSuccess { .. }
            | ItemAction::RemoveFail { .. }
            | ItemAction::RemoveFromCategory { .. }
            | ItemAction::SetCategory { .. } => {}
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator").finish_non_exhaustive()
    }
}

/// One combined fetch whose snapshot fans out into both slice updates.
///
/// A failed fetch resolves as an empty snapshot so the pending marker
/// clears and the UI settles instead of spinning forever.
async fn load_all(store: &Store, backend: &dyn Backend, request: RequestId) {
    let snapshot = match backend.fetch_all().await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            warn!(%request, %error, "full fetch failed; resolving with an empty snapshot");
            crate::backend::Snapshot::default()
        }
    };
    store.dispatch(CategoryAction::LoadSuccess {
        request,
        categories: snapshot.categories,
    });
    store.dispatch(ItemAction::LoadSuccess {
        items: snapshot.items,
    });
}
