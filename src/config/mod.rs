//! Configuration module for pagebuster
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional, so an empty file yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use pagebuster::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagebuster.toml")).unwrap();
//! println!("Pages fetched per batch: {}", config.pager.chunk_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AttributeNames, Config, FilterConfig, FilterMode, HttpConfig, PagerConfig, RemoteConfig,
    StorageConfig, TemplateMarkers,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
