//! Domain model for the OpenPassPhrase client.
//!
//! Entities mirror what the backend stores: categories and the secret items
//! filed under them. Entries created locally carry a [`RequestId`] until the
//! backend confirms them — that marker is client-side bookkeeping and never
//! crosses the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::ZeroizeOnDrop;

/// Backend-assigned category identifier.
pub type CategoryId = i64;

/// Backend-assigned item identifier.
pub type ItemId = i64;

/// Correlation id for one in-flight mutation.
///
/// Generated client-side at dispatch time and echoed by the matching
/// success/failure action, so two concurrent mutations with identical
/// payloads still resolve independently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh correlation id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The per-session secret passphrase used by the backend to decrypt data.
///
/// Not part of slice state — it travels in a `SecretPhraseChange` action and
/// ends up as an outgoing request header. Redacted in `Debug` output and
/// zeroized on drop.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct SecretPhrase(String);

impl SecretPhrase {
    #[must_use]
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    /// The raw phrase, for building the outgoing header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretPhrase(***)")
    }
}

/// A category grouping secret items.
///
/// `id` is `None` from optimistic creation until the backend assigns a
/// persistent identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
    /// Correlation id of the in-flight create that produced this entry;
    /// `None` once the backend has confirmed it.
    #[serde(skip)]
    pub request: Option<RequestId>,
}

impl Category {
    /// A persisted category as returned by the backend.
    #[must_use]
    pub fn persisted(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            request: None,
        }
    }

    /// An optimistic local entry awaiting backend confirmation.
    #[must_use]
    pub fn local(request: RequestId, name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            request: Some(request),
        }
    }
}

/// A secret item: name, url, account, password, and a free-text blob.
///
/// `category_id: None` means the item is unfiled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<ItemId>,
    pub name: String,
    pub url: String,
    pub account: String,
    pub password: String,
    pub blob: String,
    pub category_id: Option<CategoryId>,
    /// See [`Category::request`].
    #[serde(skip)]
    pub request: Option<RequestId>,
}

/// Denormalized read view: a category together with the items filed under it.
///
/// Always recomputed from the two normalized slices, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItems {
    pub id: Option<CategoryId>,
    pub name: String,
    pub items: Vec<Item>,
}
