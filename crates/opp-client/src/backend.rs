//! The backend collaborator seam.
//!
//! [`Backend`] is the only surface through which the effect layer touches
//! the outside world. Two implementations ship with the crate:
//!
//! - [`HttpBackend`](crate::http::HttpBackend) — the real OpenPassPhrase
//!   JSON API over reqwest
//! - [`MemoryBackend`](crate::memory::MemoryBackend) — in-memory, for
//!   testing and offline development
//!
//! Failure is opaque at this boundary: the core only ever learns "mutation
//! rejected", never why.

use opp_store::{Category, CategoryId, Item, ItemId, SecretPhrase};

use crate::error::ClientError;

/// One atomic snapshot of everything the user can see, split into the two
/// normalized slices by the load effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
}

/// Remote persistence for categories and items.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Fetch every category and item in one call.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the fetch fails; the load effect resolves
    /// such a failure as an empty snapshot.
    async fn fetch_all(&self) -> Result<Snapshot, ClientError>;

    /// Create a category; the returned value carries the assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the backend rejects the mutation.
    async fn add_category(&self, name: &str) -> Result<Category, ClientError>;

    /// Rename an existing category.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the backend rejects the mutation.
    async fn update_category(&self, category: &Category) -> Result<(), ClientError>;

    /// Remove a category; `cascade` controls whether its items are deleted
    /// with it or left behind unfiled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the backend rejects the mutation.
    async fn remove_category(&self, id: CategoryId, cascade: bool) -> Result<(), ClientError>;

    /// Create an item; the returned value carries the assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the backend rejects the mutation.
    async fn add_item(&self, item: &Item) -> Result<Item, ClientError>;

    /// Replace an existing item wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the backend rejects the mutation.
    async fn update_item(&self, item: &Item) -> Result<(), ClientError>;

    /// Remove an item.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the backend rejects the mutation.
    async fn remove_item(&self, id: ItemId) -> Result<(), ClientError>;

    /// Replace the secret phrase sent with subsequent requests.
    ///
    /// Infallible: the phrase is held client-side and only validated by the
    /// server when the next call decrypts with it.
    async fn set_secret_phrase(&self, phrase: SecretPhrase);
}
