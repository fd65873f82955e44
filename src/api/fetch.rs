//! HTTP access to the PokeAPI service
//!
//! The [`Fetch`] trait is the seam between resource resolution and the
//! network, so the resolver can run against a stub in tests.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when fetching a resource body
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connection error, timeout, ...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status} for url ({url})")]
    Status { url: String, status: u16 },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Something that can GET a URL and return its JSON body
pub trait Fetch {
    fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Blocking HTTP fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokewrap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Create a fetcher with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()?
            .error_for_status()
            .map_err(|e| match e.status() {
                Some(status) => FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                },
                None => FetchError::RequestFailed(e),
            })?;

        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}
