//! Backend collaborator and effect layer for the OpenPassPhrase client.
//!
//! Everything with side effects lives here: the [`Backend`] seam and its
//! HTTP and in-memory implementations, the JWT auth gate, the secret-phrase
//! header channel, the [`Coordinator`] that resolves dispatched intents
//! against the backend, and the [`Session`] facade the UI consumes. The
//! pure state engine lives in `opp-store` and knows nothing about any of
//! this.

pub mod auth;
pub mod backend;
pub mod config;
pub mod effects;
pub mod error;
pub mod http;
pub mod memory;
pub mod session;

pub use auth::SessionToken;
pub use backend::{Backend, Snapshot};
pub use config::ClientConfig;
pub use effects::Coordinator;
pub use error::ClientError;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use session::Session;
