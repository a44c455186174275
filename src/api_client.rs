//! Review API client
//!
//! One authenticated GET per poll cycle. The client makes no attempt to retry:
//! a failed request fails the cycle, and the poll loop tries again after its
//! regular pause.

use crate::error::{Error, Result};
use crate::types::Timestamp;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Source of homework status snapshots
///
/// Implementations return the decoded response body as-is; shape checks are
/// left to [`crate::validator::validate`].
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch every homework change since `since`
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] when the server cannot be reached
    /// - [`Error::Protocol`] on a non-success status or an undecodable body
    async fn fetch(&self, since: Timestamp) -> Result<Value>;
}

/// HTTP client for the homework status endpoint
pub struct PracticumClient {
    /// HTTP client with the request timeout applied
    http_client: reqwest::Client,

    /// Endpoint URL
    endpoint: String,

    /// Value of the `Authorization` header
    auth_header: String,
}

impl PracticumClient {
    /// Create a new review API client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(endpoint: impl Into<String>, token: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("homework-status-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            auth_header: format!("OAuth {}", token),
        })
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, since: Timestamp) -> Result<Value> {
        debug!(endpoint = %self.endpoint, from_date = since, "requesting homework statuses");

        let response = self
            .http_client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .query(&[("from_date", since)])
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        // Check HTTP status before trying to parse the response body
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Protocol(format!(
                "endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await?;
        let value = serde_json::from_slice::<Value>(&body)
            .map_err(|e| Error::Protocol(format!("response is not valid JSON: {}", e)))?;

        debug!("received response from the review API");
        Ok(value)
    }
}
