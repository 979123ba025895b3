//! Remote query endpoint client
//!
//! The endpoint receives one JSON document per list container:
//!
//! ```json
//! {"collections": "articles", "query": {"color": ["red"]}, "count": 25, "offset": 0}
//! ```
//!
//! and answers with a JSON array of records, rendered through the template.

use crate::attributes::FilterState;
use crate::dom::NodeId;
use crate::{BusterError, Result};
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

/// Body of one remote query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPayload {
    pub collections: String,
    pub query: FilterState,
    pub count: u32,
    pub offset: u32,
}

/// An issued query awaiting its response
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub container: NodeId,
    pub generation: u64,
    pub payload: QueryPayload,
}

/// HTTP client for the remote query endpoint
#[derive(Debug, Clone)]
pub struct RemoteSearch {
    client: Client,
    endpoint: Url,
}

impl RemoteSearch {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Parses the endpoint from configuration
    pub fn from_endpoint(client: Client, endpoint: &str) -> Result<Self> {
        Ok(Self::new(client, Url::parse(endpoint)?))
    }

    /// Posts the payload and returns the records of the response
    ///
    /// Transport failures, non-2xx statuses and bodies that are not a JSON
    /// array are all errors.
    pub async fn query(&self, payload: &QueryPayload) -> Result<Vec<Value>> {
        tracing::debug!(
            "Querying {} for collection {} (count {}, offset {})",
            self.endpoint,
            payload.collections,
            payload.count,
            payload.offset
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| BusterError::Http {
                url: self.endpoint.to_string(),
                source,
            })?;

        let records = response
            .json::<Vec<Value>>()
            .await
            .map_err(|source| BusterError::Http {
                url: self.endpoint.to_string(),
                source,
            })?;

        Ok(records)
    }
}

/// Result offset taken from the `page=<n>` parameter of the document URL
///
/// Defaults to 0 when the URL is absent or carries no page number.
pub fn page_offset(url: Option<&Url>) -> u32 {
    static PAGE: OnceLock<Regex> = OnceLock::new();
    let pattern = PAGE.get_or_init(|| Regex::new(r"page=(\d+)").expect("valid page regex"));

    url.and_then(Url::query)
        .and_then(|query| pattern.captures(query))
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}
