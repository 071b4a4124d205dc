//! HTTP implementation of the backend collaborator.
//!
//! Talks to the OpenPassPhrase JSON API. Every authenticated call carries
//! the session JWT in `x-opp-jwt`; calls that decrypt data additionally
//! carry the current secret phrase in `x-opp-phrase` (deletes do not — the
//! server never decrypts on delete). The API wraps every response in a
//! `{result, message}` envelope and reports most failures inside an HTTP
//! 200, so success is decided by the envelope, not the status line.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use opp_store::{Category, CategoryId, Item, ItemId, SecretPhrase};

use crate::auth::SessionToken;
use crate::backend::{Backend, Snapshot};
use crate::config::ClientConfig;
use crate::error::ClientError;

const JWT_HEADER: &str = "x-opp-jwt";
const PHRASE_HEADER: &str = "x-opp-phrase";

/// Backend collaborator backed by the OpenPassPhrase REST API.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SessionToken>>,
    phrase: RwLock<Option<SecretPhrase>>,
}

impl HttpBackend {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the base URL is empty and
    /// [`ClientError::Network`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(ClientError::Config(
                "missing base URL — set OPP_URL or pass one in the config".to_owned(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("opp-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
            phrase: RwLock::new(config.phrase),
        })
    }

    /// Authenticate and retain the session token for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] when the credentials are rejected or
    /// the response carries no token.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/v1/auth", self.base_url))
            .json(&AuthRequest { username, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Auth(format!(
                "login rejected ({})",
                response.status()
            )));
        }

        let body: AuthResponse = response.json().await?;
        let Some(raw) = body.access_token else {
            return Err(ClientError::Auth("login response carried no token".to_owned()));
        };

        debug!(user = username, "logged in");
        *self.token.write().await = Some(SessionToken::parse(raw));
        Ok(())
    }

    /// Drop the session token.
    pub async fn logout(&self) {
        *self.token.write().await = None;
    }

    /// True while a login token is retained and unexpired.
    pub async fn logged_in(&self) -> bool {
        self.token.read().await.as_ref().is_some_and(SessionToken::is_valid)
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        with_phrase: bool,
    ) -> Result<Envelope, ClientError> {
        debug!(%method, path, "api call");

        let mut request = self.http.request(method, format!("{}{path}", self.base_url));

        if let Some(token) = self.token.read().await.as_ref() {
            request = request.header(JWT_HEADER, token.raw());
        }
        if with_phrase {
            if let Some(phrase) = self.phrase.read().await.as_ref() {
                request = request.header(PHRASE_HEADER, phrase.expose());
            }
        }
        if let Some(body) = body {
            request = request.json(&body);
        } else {
            // The server enforces a JSON content type on every route.
            request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Auth(format!("request rejected ({status})")));
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                message: format!("unexpected status {status}"),
            });
        }

        let envelope: Envelope = response.json().await?;
        if envelope.result != "success" {
            return Err(ClientError::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| "backend reported an unspecified error".to_owned()),
            });
        }
        Ok(envelope)
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn fetch_all(&self) -> Result<Snapshot, ClientError> {
        let envelope = self.call(Method::GET, "/v1/fetchall", None, true).await?;
        Ok(Snapshot {
            categories: envelope
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(Category::from)
                .collect(),
            items: envelope
                .items
                .unwrap_or_default()
                .into_iter()
                .map(Item::from)
                .collect(),
        })
    }

    async fn add_category(&self, name: &str) -> Result<Category, ClientError> {
        let body = serde_json::json!({ "category_names": [name] });
        let envelope = self
            .call(Method::PUT, "/v1/categories", Some(body), true)
            .await?;
        envelope
            .categories
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Category::from)
            .ok_or_else(|| ClientError::Api {
                message: "create returned no category".to_owned(),
            })
    }

    async fn update_category(&self, category: &Category) -> Result<(), ClientError> {
        let id = category.id.ok_or_else(|| ClientError::Api {
            message: "cannot update a category the backend has not confirmed".to_owned(),
        })?;
        let body = serde_json::json!({
            "categories": [WireCategory { id: Some(id), name: category.name.clone() }]
        });
        self.call(Method::POST, "/v1/categories", Some(body), true)
            .await?;
        Ok(())
    }

    async fn remove_category(&self, id: CategoryId, cascade: bool) -> Result<(), ClientError> {
        let body = serde_json::json!({ "ids": [id], "cascade": cascade });
        self.call(Method::DELETE, "/v1/categories", Some(body), false)
            .await?;
        Ok(())
    }

    async fn add_item(&self, item: &Item) -> Result<Item, ClientError> {
        let body = serde_json::json!({ "items": [WireItem::from(item)] });
        let envelope = self.call(Method::PUT, "/v1/items", Some(body), true).await?;
        envelope
            .items
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Item::from)
            .ok_or_else(|| ClientError::Api {
                message: "create returned no item".to_owned(),
            })
    }

    async fn update_item(&self, item: &Item) -> Result<(), ClientError> {
        if item.id.is_none() {
            return Err(ClientError::Api {
                message: "cannot update an item the backend has not confirmed".to_owned(),
            });
        }
        let body = serde_json::json!({ "items": [WireItem::from(item)] });
        self.call(Method::POST, "/v1/items", Some(body), true).await?;
        Ok(())
    }

    async fn remove_item(&self, id: ItemId) -> Result<(), ClientError> {
        let body = serde_json::json!({ "ids": [id] });
        self.call(Method::DELETE, "/v1/items", Some(body), false)
            .await?;
        Ok(())
    }

    async fn set_secret_phrase(&self, phrase: SecretPhrase) {
        *self.phrase.write().await = Some(phrase);
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// ── wire types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: Option<String>,
}

/// The `{result, message}` envelope every API response is wrapped in.
#[derive(Debug, Deserialize)]
struct Envelope {
    result: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    categories: Option<Vec<WireCategory>>,
    #[serde(default)]
    items: Option<Vec<WireItem>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<CategoryId>,
    name: String,
}

impl From<WireCategory> for Category {
    fn from(wire: WireCategory) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            request: None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<ItemId>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    account: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    blob: String,
    #[serde(default)]
    category_id: Option<CategoryId>,
}

impl From<WireItem> for Item {
    fn from(wire: WireItem) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            url: wire.url,
            account: wire.account,
            password: wire.password,
            blob: wire.blob,
            category_id: wire.category_id,
            request: None,
        }
    }
}

impl From<&Item> for WireItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            url: item.url.clone(),
            account: item.account.clone(),
            password: item.password.clone(),
            blob: item.blob.clone(),
            category_id: item.category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_parses_both_slices() {
        let envelope: Envelope = serde_json::from_str(
            r#"{
                "result": "success",
                "categories": [{"id": 1, "name": "Email"}],
                "items": [{"id": 10, "name": "mail", "category_id": 1}]
            }"#,
        )
        .unwrap();
        assert_eq!(envelope.result, "success");
        assert_eq!(envelope.categories.unwrap().len(), 1);
        let items = envelope.items.unwrap();
        assert_eq!(items[0].category_id, Some(1));
        // Fields the server omitted default to empty.
        assert_eq!(items[0].password, "");
    }

    #[test]
    fn error_envelope_carries_the_message() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"result": "error", "message": "Passphrase header missing!"}"#,
        )
        .unwrap();
        assert_eq!(envelope.result, "error");
        assert_eq!(envelope.message.as_deref(), Some("Passphrase header missing!"));
    }

    #[test]
    fn draft_item_serializes_without_id() {
        let item = Item {
            name: "wifi".to_owned(),
            ..Item::default()
        };
        let json = serde_json::to_value(WireItem::from(&item)).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["name"], "wifi");
        assert_eq!(json["category_id"], serde_json::Value::Null);
    }

    #[test]
    fn unfiled_wire_item_maps_to_unfiled_model() {
        let wire: WireItem = serde_json::from_str(r#"{"id": 3, "name": "wifi"}"#).unwrap();
        let item = Item::from(wire);
        assert_eq!(item.category_id, None);
        assert_eq!(item.request, None);
    }

    #[test]
    fn backend_construction_rejects_empty_url() {
        let config = ClientConfig {
            base_url: String::new(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpBackend::new(config),
            Err(ClientError::Config(_))
        ));
    }
}
