use serde::Deserialize;

/// Main configuration structure for pagebuster
///
/// Every section is optional; omitted sections use their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pager: PagerConfig,
    pub filter: FilterConfig,
    pub template: TemplateMarkers,
    pub remote: RemoteConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

/// Pagination aggregation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Selector of the "next page" link
    #[serde(rename = "next-page-selector")]
    pub next_page_selector: String,

    /// Selector of listing items on every page
    #[serde(rename = "item-selector")]
    pub item_selector: String,

    /// Number of pages fetched concurrently per batch
    #[serde(rename = "chunk-size")]
    pub chunk_size: u32,

    /// Highest page number the pager may request
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            next_page_selector: ".w-pagination-next".to_string(),
            item_selector: "[data-filter-list] [data-filter-item]".to_string(),
            chunk_size: 10,
            max_pages: None,
        }
    }
}

/// How filter state is matched against listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Toggle visibility of items already in the document
    #[default]
    Local,
    /// Send the state to the remote query endpoint and render the results
    Remote,
}

/// Filter engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub mode: FilterMode,

    /// Key under which the filter state is persisted
    #[serde(rename = "storage-key")]
    pub storage_key: String,

    /// Class set on a list container while its query is outstanding
    #[serde(rename = "loading-class")]
    pub loading_class: String,

    /// Collection queried when a container does not name one
    #[serde(rename = "default-collection")]
    pub default_collection: String,

    /// Result count requested when a container does not name one
    #[serde(rename = "default-count")]
    pub default_count: u32,

    pub attributes: AttributeNames,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            mode: FilterMode::Local,
            storage_key: "kidadl-filters".to_string(),
            loading_class: "is-loading".to_string(),
            default_collection: "articles".to_string(),
            default_count: 25,
            attributes: AttributeNames::default(),
        }
    }
}

/// Data attributes the host document uses to declare filters and listings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    /// Filterable list container
    pub list: String,
    /// Listing item
    pub item: String,
    /// Per-item JSON data blob
    pub data: String,
    /// Filter input control
    pub input: String,
    /// Facet name declaration
    pub name: String,
    /// Facet value declaration
    pub value: String,
    /// Marks a control as active regardless of its checked state
    #[serde(rename = "always-active")]
    pub always_active: String,
    /// Marks a control whose facet requires all selected values
    #[serde(rename = "and-marker")]
    pub and_marker: String,
    /// "Clear filters" trigger
    pub clear: String,
    /// Collection name on a list container
    pub collection: String,
    /// Result count on a list container
    pub count: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            list: "data-filter-list".to_string(),
            item: "data-filter-item".to_string(),
            data: "data-global-filter".to_string(),
            input: "data-filter-input".to_string(),
            name: "data-filter-name".to_string(),
            value: "data-filter-value".to_string(),
            always_active: "data-filter-always".to_string(),
            and_marker: "data-filter-and".to_string(),
            clear: "data-clear-filters".to_string(),
            collection: "data-filter-collection".to_string(),
            count: "data-filter-count".to_string(),
        }
    }
}

impl AttributeNames {
    pub(crate) fn all(&self) -> [(&'static str, &str); 11] {
        [
            ("list", self.list.as_str()),
            ("item", self.item.as_str()),
            ("data", self.data.as_str()),
            ("input", self.input.as_str()),
            ("name", self.name.as_str()),
            ("value", self.value.as_str()),
            ("always-active", self.always_active.as_str()),
            ("and-marker", self.and_marker.as_str()),
            ("clear", self.clear.as_str()),
            ("collection", self.collection.as_str()),
            ("count", self.count.as_str()),
        ]
    }
}

/// Placeholder attributes consumed by the template renderer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateMarkers {
    pub text: String,
    pub src: String,
    pub html: String,
    pub href: String,
    pub attrs: String,
}

impl Default for TemplateMarkers {
    fn default() -> Self {
        Self {
            text: "data-tp-text".to_string(),
            src: "data-tp-src".to_string(),
            html: "data-tp-html".to_string(),
            href: "data-tp-href".to_string(),
            attrs: "data-tp-attrs".to_string(),
        }
    }
}

impl TemplateMarkers {
    pub(crate) fn all(&self) -> [(&'static str, &str); 5] {
        [
            ("text", self.text.as_str()),
            ("src", self.src.as_str()),
            ("html", self.html.as_str()),
            ("href", self.href.as_str()),
            ("attrs", self.attrs.as_str()),
        ]
    }
}

/// Remote query endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// URL receiving the JSON query via POST; required in remote mode
    pub endpoint: Option<String>,
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("pagebuster/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Persistent filter state storage
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "pagebuster.db".to_string(),
        }
    }
}
