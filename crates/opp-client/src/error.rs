//! Error types for `opp-client`.
//!
//! The core never sees this taxonomy — the effect layer collapses every
//! failure into the corresponding `*Fail` action. The richer variants exist
//! for the auth gate and for callers of the backend directly (the CLI).
//! Messages never include passwords or the secret phrase.

/// All errors that can occur when talking to the OpenPassPhrase backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or invalid client configuration.
    #[error("opp config error: {0}")]
    Config(String),

    /// Not logged in, token expired, or credentials rejected.
    #[error("opp auth error: {0}")]
    Auth(String),

    /// The API reported a failure — either an HTTP error status or a
    /// `result: "error"` envelope inside a 200 response.
    #[error("opp API error: {message}")]
    Api { message: String },

    /// Network or HTTP client error (includes request timeouts).
    #[error("opp network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("opp json error: {0}")]
    Json(#[from] serde_json::Error),
}
