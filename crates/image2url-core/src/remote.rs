//! Outbound HTTP access to remote images
//!
//! The resolver and the info handler only see [`RemoteImageClient`], so tests can
//! swap the network for an in-process fake.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use crate::constants::{REMOTE_TIMEOUT_SECS, USER_AGENT};
use crate::error::ToolResult;

/// Status, headers and body of a remote response
#[derive(Debug, Clone, Default)]
pub struct RemoteResponse {
    pub status: u16,
    pub reason: String,
    /// Header names are lowercased
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[async_trait]
pub trait RemoteImageClient: Send + Sync {
    /// GET the URL and read the full body.
    async fn get(&self, url: &str) -> ToolResult<RemoteResponse>;

    /// HEAD the URL; the returned body is always empty.
    async fn head(&self, url: &str) -> ToolResult<RemoteResponse>;
}

/// `reqwest`-backed client sending the fixed identifying user agent
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
}

impl HttpRemoteClient {
    /// Every request is bounded by a `REMOTE_TIMEOUT_SECS` (60 s) timeout.
    pub fn new() -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REMOTE_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    fn collect_headers(response: &reqwest::Response) -> HashMap<String, String> {
        response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl RemoteImageClient for HttpRemoteClient {
    async fn get(&self, url: &str) -> ToolResult<RemoteResponse> {
        let start = std::time::Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, url = %url, "Failed to download from URL"))?;

        let status = response.status();
        let headers = Self::collect_headers(&response);
        let body = response.bytes().await?;

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            size_bytes = body.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remote GET completed"
        );

        Ok(RemoteResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
        })
    }

    async fn head(&self, url: &str) -> ToolResult<RemoteResponse> {
        let response = self.client.head(url).send().await?;
        let status = response.status();

        Ok(RemoteResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            headers: Self::collect_headers(&response),
            body: Bytes::new(),
        })
    }
}
