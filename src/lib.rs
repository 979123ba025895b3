//! pagebuster: paginated listing aggregation and faceted filtering
//!
//! This crate gathers every page of a paginated listing into one document,
//! then filters the aggregated items by faceted attributes declared in the
//! markup, either locally or through a remote query endpoint whose results
//! are rendered from an HTML template.

pub mod attributes;
pub mod config;
pub mod dom;
pub mod filter;
pub mod pager;
pub mod storage;
pub mod template;

use thiserror::Error;

/// Main error type for pagebuster operations
#[derive(Debug, Error)]
pub enum BusterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Selector error: {0}")]
    Selector(#[from] dom::SelectorError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document has no URL to resolve pagination links against")]
    MissingDocumentUrl,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for pagebuster operations
pub type Result<T> = std::result::Result<T, BusterError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use attributes::FilterState;
pub use config::Config;
pub use dom::{Document, NodeId, Selector};
pub use filter::{FilterEngine, FilterReport};
pub use pager::{Pager, PagerReport};
pub use template::Template;
