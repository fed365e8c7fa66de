//! # Request Client Module
//!
//! Client for the request store, the write sink for purchase and live-agent
//! requests and the source of pending requests for the admin flow. Reads
//! follow the catalog client's empty-on-failure contract; writes surface a
//! [`StoreError`] so the caller can render a submission failure distinctly
//! from an empty read.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A purchase or live-agent request as stored by the request store.
/// `is_responded` is flipped by the store when an admin answers; the bot
/// never mutates a stored request directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub additional_text: Option<String>,
    #[serde(default)]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub is_responded: bool,
}

/// Payload for creating a new request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequest {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
}

/// An admin reply logged against a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub id: i64,
    pub request_id: i64,
    pub sender_id: i64,
    pub content: String,
}

/// Errors from request store write operations
#[derive(Debug, Clone)]
pub enum StoreError {
    /// The store answered with a non-success status
    Status(u16),
    /// The request never reached the store
    Transport(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Status(code) => write!(f, "Store error: status {code}"),
            StoreError::Transport(msg) => write!(f, "Transport error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Interface to the request store
#[async_trait]
pub trait RequestStoreApi: Send + Sync {
    async fn create_request(&self, new: NewRequest) -> Result<Request, StoreError>;
    async fn create_message(
        &self,
        request_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<RequestMessage, StoreError>;
    async fn list_requests(&self) -> Vec<Request>;
    async fn get_request(&self, request_id: i64) -> Option<Request>;
}

/// HTTP implementation of [`RequestStoreApi`]
pub struct RequestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RequestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run one write and decode the created record, mapping failures to
    /// [`StoreError`].
    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.url(path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Request store rejected write");
            return Err(StoreError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))
    }
}

#[async_trait]
impl RequestStoreApi for RequestClient {
    async fn create_request(&self, new: NewRequest) -> Result<Request, StoreError> {
        self.post("/requests/", &new).await
    }

    async fn create_message(
        &self,
        request_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<RequestMessage, StoreError> {
        let body = serde_json::json!({
            "sender_id": sender_id,
            "content": content,
        });
        self.post(&format!("/requests/{}/messages/", request_id), &body)
            .await
    }

    async fn list_requests(&self) -> Vec<Request> {
        let url = self.url("/requests/");
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<Vec<Request>>().await {
                    Ok(requests) => requests,
                    Err(e) => {
                        warn!(url = %url, error = %e, "Failed to decode request list");
                        Vec::new()
                    }
                }
            }
            Ok(response) => {
                warn!(url = %url, status = %response.status(), "Request store returned non-success status");
                Vec::new()
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Request list fetch failed");
                Vec::new()
            }
        }
    }

    async fn get_request(&self, request_id: i64) -> Option<Request> {
        let url = self.url(&format!("/requests/{}/", request_id));
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<Request>().await {
                    Ok(request) => Some(request),
                    Err(e) => {
                        warn!(url = %url, error = %e, "Failed to decode request");
                        None
                    }
                }
            }
            Ok(response) => {
                warn!(url = %url, status = %response.status(), "Request lookup returned non-success status");
                None
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Request lookup failed");
                None
            }
        }
    }
}
