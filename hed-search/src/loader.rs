//! Fetching and parsing of per-source indices.
//!
//! [`IndexFetcher`] abstracts the transport so the aggregator can be driven
//! by an in-memory fetcher in tests. [`HttpFetcher`] is the production
//! implementation.

use std::future::Future;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http::build_client;
use crate::index::SourceIndex;
use crate::types::SearchSource;

/// Retrieves the raw text of a source's `searchindex.js`.
///
/// All implementations must be `Send + Sync` for concurrent source loads.
pub trait IndexFetcher: Send + Sync {
    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Fetch`] on transport failure or a non-success
    /// HTTP status.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// [`IndexFetcher`] over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the timeout and User-Agent from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
        })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl IndexFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Fetch(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Fetch(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SearchError::Fetch(format!("failed to read response body: {e}")))
    }
}

/// Fetch and parse one source's index.
///
/// # Errors
///
/// Returns [`SearchError::Fetch`] or [`SearchError::Format`] from the
/// fetch and parse steps respectively.
pub async fn load_source<F: IndexFetcher>(
    fetcher: &F,
    source: &SearchSource,
) -> Result<SourceIndex> {
    let body = fetcher.fetch(&source.search_index).await?;
    SourceIndex::from_script(&body)
}

/// Compose the user-facing failure message for a source.
pub fn describe_failure(source: &SearchSource, err: &SearchError) -> String {
    format!(
        "Failed to load search index for \"{}\" from \"{}\". \
         This may be due to network issues, server unavailability, or invalid index format. \
         Original error: {err}",
        source.name, source.search_index
    )
}
