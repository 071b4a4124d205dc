//! In-memory backend for testing and offline development.
//!
//! Mirrors the server's observable contract: id assignment on create,
//! cascade semantics on category removal, and phrase retention. Not
//! persistent — all data is lost when the process exits. Failure injection
//! makes every fallible call return an error, which is how the rollback
//! paths are exercised in tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use opp_store::{Category, CategoryId, Item, ItemId, SecretPhrase};

use crate::backend::{Backend, Snapshot};
use crate::error::ClientError;

#[derive(Debug, Default)]
struct MemoryState {
    next_category_id: CategoryId,
    next_item_id: ItemId,
    categories: BTreeMap<CategoryId, String>,
    items: BTreeMap<ItemId, Item>,
    phrase: Option<SecretPhrase>,
    failing: bool,
}

/// An in-memory [`Backend`].
///
/// Thread-safe and async-compatible; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When `failing` is true every fallible call returns an error until
    /// switched back.
    pub async fn set_failing(&self, failing: bool) {
        self.state.write().await.failing = failing;
    }

    /// The phrase most recently set through [`Backend::set_secret_phrase`].
    pub async fn phrase(&self) -> Option<SecretPhrase> {
        self.state.read().await.phrase.clone()
    }

    /// Number of stored items, for test assertions.
    pub async fn item_count(&self) -> usize {
        self.state.read().await.items.len()
    }
}

fn rejected() -> ClientError {
    ClientError::Api {
        message: "injected failure".to_owned(),
    }
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn fetch_all(&self) -> Result<Snapshot, ClientError> {
        let state = self.state.read().await;
        if state.failing {
            return Err(rejected());
        }
        Ok(Snapshot {
            categories: state
                .categories
                .iter()
                .map(|(id, name)| Category::persisted(*id, name.clone()))
                .collect(),
            items: state.items.values().cloned().collect(),
        })
    }

    async fn add_category(&self, name: &str) -> Result<Category, ClientError> {
        let mut state = self.state.write().await;
        if state.failing {
            return Err(rejected());
        }
        state.next_category_id += 1;
        let id = state.next_category_id;
        state.categories.insert(id, name.to_owned());
        Ok(Category::persisted(id, name))
    }

    async fn update_category(&self, category: &Category) -> Result<(), ClientError> {
        let mut state = self.state.write().await;
        if state.failing {
            return Err(rejected());
        }
        let id = category.id.ok_or_else(|| ClientError::Api {
            message: "missing category id".to_owned(),
        })?;
        match state.categories.get_mut(&id) {
            Some(name) => {
                category.name.clone_into(name);
                Ok(())
            }
            None => Err(ClientError::Api {
                message: format!("unknown category {id}"),
            }),
        }
    }

    async fn remove_category(&self, id: CategoryId, cascade: bool) -> Result<(), ClientError> {
        let mut state = self.state.write().await;
        if state.failing {
            return Err(rejected());
        }
        if state.categories.remove(&id).is_none() {
            return Err(ClientError::Api {
                message: format!("unknown category {id}"),
            });
        }
        if cascade {
            state.items.retain(|_, item| item.category_id != Some(id));
        } else {
            for item in state.items.values_mut() {
                if item.category_id == Some(id) {
                    item.category_id = None;
                }
            }
        }
        Ok(())
    }

    async fn add_item(&self, item: &Item) -> Result<Item, ClientError> {
        let mut state = self.state.write().await;
        if state.failing {
            return Err(rejected());
        }
        state.next_item_id += 1;
        let id = state.next_item_id;
        let stored = Item {
            id: Some(id),
            request: None,
            ..item.clone()
        };
        state.items.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_item(&self, item: &Item) -> Result<(), ClientError> {
        let mut state = self.state.write().await;
        if state.failing {
            return Err(rejected());
        }
        let id = item.id.ok_or_else(|| ClientError::Api {
            message: "missing item id".to_owned(),
        })?;
        if !state.items.contains_key(&id) {
            return Err(ClientError::Api {
                message: format!("unknown item {id}"),
            });
        }
        state.items.insert(
            id,
            Item {
                request: None,
                ..item.clone()
            },
        );
        Ok(())
    }

    async fn remove_item(&self, id: ItemId) -> Result<(), ClientError> {
        let mut state = self.state.write().await;
        if state.failing {
            return Err(rejected());
        }
        if state.items.remove(&id).is_none() {
            return Err(ClientError::Api {
                message: format!("unknown item {id}"),
            });
        }
        Ok(())
    }

    async fn set_secret_phrase(&self, phrase: SecretPhrase) {
        self.state.write().await.phrase = Some(phrase);
    }
}
