//! Listing page fetcher
//!
//! This module handles the HTTP side of pagination:
//! - Building the HTTP client from configuration
//! - The `PageSource` seam the pager fetches through
//! - A reqwest-backed source used outside of tests

use crate::config::HttpConfig;
use crate::{BusterError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use pagebuster::config::HttpConfig;
/// use pagebuster::pager::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Something that can return the markup of a listing page
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Fetches the page body at `url`
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Page source backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageSource for HttpPageSource {
    /// GETs the page and returns its body
    ///
    /// A non-2xx status is logged but the body is still returned: an error
    /// page without a "next" link ends pagination like any last page.
    /// Transport and body errors are returned as `BusterError::Http`.
    async fn fetch(&self, url: &Url) -> Result<String> {
        let to_error = |source| BusterError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url.clone()).send().await.map_err(to_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", url, status.as_u16());
        } else {
            tracing::debug!("Fetched {} ({})", url, status.as_u16());
        }

        response.text().await.map_err(to_error)
    }
}
