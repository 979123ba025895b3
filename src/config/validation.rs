use crate::config::types::{
    AttributeNames, Config, FilterConfig, FilterMode, HttpConfig, PagerConfig, RemoteConfig,
    StorageConfig, TemplateMarkers,
};
use crate::dom::parse_selector;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_pager_config(&config.pager)?;
    validate_filter_config(&config.filter)?;
    validate_template_markers(&config.template)?;
    validate_remote_config(&config.remote, config.filter.mode)?;
    validate_http_config(&config.http)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates pager configuration
fn validate_pager_config(config: &PagerConfig) -> Result<(), ConfigError> {
    validate_selector("next-page-selector", &config.next_page_selector)?;
    validate_selector("item-selector", &config.item_selector)?;

    if config.chunk_size < 1 || config.chunk_size > 100 {
        return Err(ConfigError::Validation(format!(
            "chunk-size must be between 1 and 100, got {}",
            config.chunk_size
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    parse_selector(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("{}: {}", field, e)))
}

/// Validates filter engine configuration
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.storage_key.is_empty() {
        return Err(ConfigError::Validation(
            "storage-key cannot be empty".to_string(),
        ));
    }

    if config.loading_class.is_empty() || config.loading_class.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "loading-class must be a single class name, got '{}'",
            config.loading_class
        )));
    }

    if config.default_collection.is_empty() {
        return Err(ConfigError::Validation(
            "default-collection cannot be empty".to_string(),
        ));
    }

    if config.default_count < 1 {
        return Err(ConfigError::Validation(format!(
            "default-count must be >= 1, got {}",
            config.default_count
        )));
    }

    validate_attribute_names(&config.attributes)
}

fn validate_attribute_names(names: &AttributeNames) -> Result<(), ConfigError> {
    for (field, name) in names.all() {
        validate_attribute_name(field, name)?;
    }
    Ok(())
}

fn validate_template_markers(markers: &TemplateMarkers) -> Result<(), ConfigError> {
    for (field, name) in markers.all() {
        validate_attribute_name(field, name)?;
    }
    Ok(())
}

/// Attribute names must be non-empty, lowercase, and free of selector syntax
fn validate_attribute_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(format!(
            "attribute name for '{}' cannot be empty",
            field
        )));
    }

    let valid = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(ConfigError::Validation(format!(
            "attribute name for '{}' must contain only lowercase letters, digits, hyphens and underscores, got '{}'",
            field, name
        )));
    }

    Ok(())
}

/// Validates the remote endpoint, which is mandatory in remote mode
fn validate_remote_config(config: &RemoteConfig, mode: FilterMode) -> Result<(), ConfigError> {
    match (&config.endpoint, mode) {
        (None, FilterMode::Remote) => Err(ConfigError::Validation(
            "remote mode requires [remote] endpoint".to_string(),
        )),
        (None, FilterMode::Local) => Ok(()),
        (Some(endpoint), _) => {
            let url = Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", endpoint, e))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::InvalidUrl(format!(
                    "Endpoint '{}' must use HTTP or HTTPS",
                    endpoint
                )));
            }
            Ok(())
        }
    }
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
