//! HTTP client for the fanclub API.

pub mod chat;
pub mod clubs;
pub mod users;

use async_trait::async_trait;
use serde_json::Value;

use fanclub_core::fetch::{self, Fetcher};

use crate::error::{ClientError, Result};

/// HTTP client for the fanclub API.
#[derive(Debug, Clone)]
pub struct FanclubClient {
    client: reqwest::Client,
    base_url: String,
}

impl FanclubClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment (FANCLUB_URL or default).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FANCLUB_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and return the body as untyped JSON.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let response = self.client.get(self.url(path)).send().await?;
        self.handle_response(path, response).await
    }

    /// Handle error responses.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(ClientError::from)
        } else {
            Err(error_for(path, status.as_u16(), response).await)
        }
    }

    /// Handle delete responses (no body expected).
    async fn handle_delete_response(&self, path: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_for(path, status.as_u16(), response).await)
        }
    }
}

async fn error_for(path: &str, status: u16, response: reqwest::Response) -> ClientError {
    if status == 404 {
        return ClientError::NotFound {
            resource: path.to_string(),
        };
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ClientError::ServerError { status, message }
}

/// The network side of the cache-aside layer.
#[async_trait]
impl Fetcher for FanclubClient {
    async fn fetch(&self, resource_path: &str) -> fetch::Result<Value> {
        tracing::debug!(path = resource_path, "Fetching from API");
        self.get_json(resource_path).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = FanclubClient::new("http://localhost:3000/");

        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/api/clubs"), "http://localhost:3000/api/clubs");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_request_error() {
        // Port 9 (discard) is not expected to serve HTTP.
        let client = FanclubClient::new("http://127.0.0.1:9");

        let result = client.fetch("/api/clubs").await;

        assert!(matches!(result, Err(fetch::FetchError::Request(_))));
    }
}
