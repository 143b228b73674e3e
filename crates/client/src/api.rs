//! REST API client for the resman `/resources` endpoints.
//!
//! Wraps each store operation in one method using [`reqwest`]. Every
//! failure, whether the request never completed or the server answered
//! with a non-2xx status, comes back as a single [`RequestError`].

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use resman_core::resource::ResourceFilter;
use resman_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::models::{NewResource, Resource, ResourcePatch};

/// Errors from the resman REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request failed before a usable response arrived (network, DNS,
    /// TLS, timeout, or an undecodable success body).
    #[error("Failed to {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The server returned a non-2xx status code.
    #[error("Failed to {operation}: {message}")]
    Api {
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Server-supplied `message`, or the status text if the body had none.
        message: String,
    },
}

impl RequestError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            RequestError::Api { status, .. } => Some(*status),
        }
    }

    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Error body produced by the server: `{ "message": ..., "code": ... }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// The store operations the list controller depends on.
///
/// Implemented by [`ResourceApi`]; tests substitute an in-memory double.
#[async_trait]
pub trait ResourceService: Send + Sync {
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, RequestError>;
    async fn get(&self, id: DbId) -> Result<Resource, RequestError>;
    async fn create(&self, input: &NewResource) -> Result<Resource, RequestError>;
    async fn update(&self, id: DbId, patch: &ResourcePatch) -> Result<Resource, RequestError>;
    async fn delete(&self, id: DbId) -> Result<(), RequestError>;
}

/// HTTP client for a resman server.
#[derive(Debug, Clone)]
pub struct ResourceApi {
    client: reqwest::Client,
    base_url: String,
}

impl ResourceApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build a client honouring the configured base URL and request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// `GET /resources`, passing only the non-empty filter fields.
    pub async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, RequestError> {
        const OP: &str = "fetch resources";
        let request = self.client.get(self.collection_url()).query(filter);
        let response = Self::send(OP, request).await?;
        Self::decode(OP, response).await
    }

    /// `GET /resources/{id}`.
    pub async fn get(&self, id: DbId) -> Result<Resource, RequestError> {
        const OP: &str = "fetch resource";
        let response = Self::send(OP, self.client.get(self.item_url(id))).await?;
        Self::decode(OP, response).await
    }

    /// `POST /resources`.
    pub async fn create(&self, input: &NewResource) -> Result<Resource, RequestError> {
        const OP: &str = "create resource";
        let request = self.client.post(self.collection_url()).json(input);
        let response = Self::send(OP, request).await?;
        Self::decode(OP, response).await
    }

    /// `PUT /resources/{id}`.
    pub async fn update(&self, id: DbId, patch: &ResourcePatch) -> Result<Resource, RequestError> {
        const OP: &str = "update resource";
        let request = self.client.put(self.item_url(id)).json(patch);
        let response = Self::send(OP, request).await?;
        Self::decode(OP, response).await
    }

    /// `DELETE /resources/{id}`. The 204 response carries no body.
    pub async fn delete(&self, id: DbId) -> Result<(), RequestError> {
        Self::send("delete resource", self.client.delete(self.item_url(id))).await?;
        Ok(())
    }

    // ---- private helpers ----

    fn collection_url(&self) -> String {
        format!("{}/resources", self.base_url)
    }

    fn item_url(&self, id: DbId) -> String {
        format!("{}/resources/{id}", self.base_url)
    }

    /// Send the request and ensure a success status.
    ///
    /// Non-2xx responses become [`RequestError::Api`] with the server's
    /// `message`, falling back to the canonical status text when the body
    /// is missing or not the expected JSON.
    async fn send(
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, RequestError> {
        let response = request
            .send()
            .await
            .map_err(|source| RequestError::Transport { operation, source })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string())
            });

        tracing::debug!(operation, status = status.as_u16(), %message, "Request rejected");

        Err(RequestError::Api {
            operation,
            status: status.as_u16(),
            message,
        })
    }

    /// Decode a successful JSON response body into the expected type.
    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T, RequestError> {
        response
            .json::<T>()
            .await
            .map_err(|source| RequestError::Transport { operation, source })
    }
}

#[async_trait]
impl ResourceService for ResourceApi {
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, RequestError> {
        ResourceApi::list(self, filter).await
    }

    async fn get(&self, id: DbId) -> Result<Resource, RequestError> {
        ResourceApi::get(self, id).await
    }

    async fn create(&self, input: &NewResource) -> Result<Resource, RequestError> {
        ResourceApi::create(self, input).await
    }

    async fn update(&self, id: DbId, patch: &ResourcePatch) -> Result<Resource, RequestError> {
        ResourceApi::update(self, id, patch).await
    }

    async fn delete(&self, id: DbId) -> Result<(), RequestError> {
        ResourceApi::delete(self, id).await
    }
}
