//! HTTP transport with the fixed header set.

use super::error::FetchError;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::Client;
use shared::config::{ApiConfig, HeaderConfig};
use std::time::Duration;
use tracing::debug;

/// Status line and body of a finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// A single blocking-in-sequence GET
///
/// Calls are awaited one at a time; implementations never retry.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport sending `api.headers` with every request
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .default_headers(default_headers(&api.headers)?)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

fn default_headers(headers: &HeaderConfig) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    let pairs = [
        (HeaderName::from_static("authority"), &headers.authority),
        (ACCEPT, &headers.accept),
        (CONTENT_TYPE, &headers.content_type),
        (REFERER, &headers.referer),
        (USER_AGENT, &headers.user_agent),
    ];

    for (name, value) in pairs {
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header {}", name))?;
        map.insert(name, value);
    }

    Ok(map)
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        debug!(url = %url, "Making API request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(Box::new(e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(Box::new(e)))?;

        debug!(url = %url, status = status, bytes = body.len(), "Response received");
        Ok(RawResponse { status, body })
    }
}
