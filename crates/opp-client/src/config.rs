//! Client configuration.
//!
//! Loads from environment variables with sensible defaults. All settings
//! can be overridden via `OPP_*` environment variables.

use std::time::Duration;

use opp_store::SecretPhrase;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`HttpBackend`](crate::http::HttpBackend).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL. Default: `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Per-request timeout. A request that never settles resolves as a
    /// failure once this elapses, so the optimistic state rolls back
    /// instead of hanging forever. Default: 10 seconds.
    pub timeout: Duration,
    /// Initial secret phrase, if already known at construction.
    pub phrase: Option<SecretPhrase>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            phrase: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `OPP_URL` — API base URL (default: `http://127.0.0.1:5000`)
    /// - `OPP_TIMEOUT_SECS` — per-request timeout in seconds (default: `10`)
    /// - `OPP_PHRASE` — initial secret phrase (optional)
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPP_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let timeout = std::env::var("OPP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        let phrase = std::env::var("OPP_PHRASE").ok().map(SecretPhrase::new);

        Self {
            base_url,
            timeout,
            phrase,
        }
    }
}
