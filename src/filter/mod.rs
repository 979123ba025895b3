//! Faceted filtering of aggregated listings
//!
//! The engine derives filter state from the checked controls of the
//! document and applies it in one of two modes:
//!
//! - **Local**: every listing item is shown or hidden depending on whether
//!   its embedded data matches the state.
//! - **Remote**: every list container queries the remote endpoint and its
//!   children are replaced by records rendered through the template. An
//!   empty state restores the original children instead.
//!
//! Each run persists the state under a fixed key so that a later session
//! can restore the selection through [`FilterEngine::init`].

mod matching;
mod remote;

pub use matching::item_matches;
pub use remote::{page_offset, PendingQuery, QueryPayload, RemoteSearch};

use crate::attributes::{
    active_controls, extract_filter_state, find_declaration, parse_item_data, split_facet_key,
    FilterState,
};
use crate::config::{AttributeNames, Config, FilterConfig, FilterMode, TemplateMarkers};
use crate::dom::{Document, NodeId};
use crate::storage::KeyValueStore;
use crate::template::Template;
use crate::{ConfigError, Result};
use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;

/// How the engine applies filter state
#[derive(Debug, Clone)]
pub enum MatchMode {
    Local,
    Remote(RemoteSearch),
}

/// Outcome of one filter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReport {
    /// Items shown and hidden by local matching
    Local { visible: usize, hidden: usize },
    /// Containers returned to their original children
    Restored { containers: usize },
    /// Per-container outcomes of the remote queries
    Remote {
        rendered: usize,
        unchanged: usize,
        failed: usize,
        stale: usize,
    },
}

/// How a single remote query settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Children replaced by this many rendered records
    Rendered(usize),
    /// Empty result set, children left as they were
    Empty,
    /// Request or rendering failed, children left as they were
    Failed,
    /// A newer query for the container was issued; response discarded
    Stale,
}

/// Original children of a list container
#[derive(Debug, Clone)]
struct ListSnapshot {
    container: NodeId,
    children: Vec<NodeId>,
}

/// Filter engine bound to one document's attribute vocabulary
pub struct FilterEngine {
    names: AttributeNames,
    markers: TemplateMarkers,
    storage_key: String,
    loading_class: String,
    default_collection: String,
    default_count: u32,
    store: Box<dyn KeyValueStore>,
    mode: MatchMode,
    template: Option<Template>,
    snapshots: Vec<ListSnapshot>,
    generations: HashMap<NodeId, u64>,
    clearing: bool,
}

impl FilterEngine {
    /// Creates a local-mode engine persisting through `store`
    pub fn new(
        config: &FilterConfig,
        markers: &TemplateMarkers,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            names: config.attributes.clone(),
            markers: markers.clone(),
            storage_key: config.storage_key.clone(),
            loading_class: config.loading_class.clone(),
            default_collection: config.default_collection.clone(),
            default_count: config.default_count,
            store,
            mode: MatchMode::Local,
            template: None,
            snapshots: Vec::new(),
            generations: HashMap::new(),
            clearing: false,
        }
    }

    /// Creates an engine in the mode named by the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(FilterEngine)` - Engine ready for [`FilterEngine::init`]
    /// * `Err(BusterError)` - Remote mode without a usable endpoint
    pub fn from_config(
        config: &Config,
        client: Client,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self> {
        let engine = Self::new(&config.filter, &config.template, store);

        match config.filter.mode {
            FilterMode::Local => Ok(engine),
            FilterMode::Remote => {
                let endpoint = config.remote.endpoint.as_deref().ok_or_else(|| {
                    ConfigError::Validation("remote mode requires remote.endpoint".to_string())
                })?;
                Ok(engine.with_remote(RemoteSearch::from_endpoint(client, endpoint)?))
            }
        }
    }

    /// Switches the engine to remote mode
    pub fn with_remote(mut self, remote: RemoteSearch) -> Self {
        self.mode = MatchMode::Remote(remote);
        self
    }

    /// Uses `template` instead of capturing one from the first item
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    pub fn mode(&self) -> &MatchMode {
        &self.mode
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Prepares the engine for a document
    ///
    /// Captures the template from the first listing item (unless one was
    /// provided), snapshots the children of every list container and
    /// restores the persisted selection onto the filter inputs.
    ///
    /// Returns the number of inputs checked by the restore.
    pub fn init(&mut self, doc: &mut Document) -> usize {
        if self.template.is_none() {
            self.template = doc
                .first_with_attr(doc.root(), &self.names.item)
                .and_then(|item| Template::capture(doc, item));
        }

        self.snapshots = doc
            .with_attr(doc.root(), &self.names.list)
            .into_iter()
            .map(|container| ListSnapshot {
                container,
                children: doc.children(container),
            })
            .collect();

        tracing::debug!(
            "Captured {} list container(s), template {}",
            self.snapshots.len(),
            if self.template.is_some() { "present" } else { "absent" }
        );

        self.restore_selection(doc)
    }

    fn restore_selection(&self, doc: &mut Document) -> usize {
        let raw = match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0,
            Err(e) => {
                tracing::warn!("Could not read stored filters: {}", e);
                return 0;
            }
        };

        let state = match FilterState::from_json(&raw) {
            Ok(Some(state)) => state,
            Ok(None) => return 0,
            Err(e) => {
                tracing::warn!("Ignoring malformed stored filters {}: {}", raw, e);
                return 0;
            }
        };

        let mut checked = 0;
        for (key, values) in state.iter() {
            let (name, all) = split_facet_key(key);
            for value in values {
                checked += self.select_facet(doc, name, value, all);
            }
        }

        if checked > 0 {
            tracing::info!("Restored {} stored filter selection(s)", checked);
        }
        checked
    }

    /// Checks the inputs declaring `name`/`value`
    ///
    /// Inputs are searched in the grand-parent scope of every matching
    /// declaration; only inputs whose own declaration is that facet and
    /// whose AND marker equals `all` are checked. Inputs are never
    /// unchecked. Returns the number of inputs newly checked.
    pub fn select_facet(&self, doc: &mut Document, name: &str, value: &str, all: bool) -> usize {
        let names = &self.names;
        let declares = |doc: &Document, node: NodeId| {
            doc.attr(node, &names.name) == Some(name) && doc.attr(node, &names.value) == Some(value)
        };

        let declarations: Vec<NodeId> = doc
            .with_attr(doc.root(), &names.name)
            .into_iter()
            .filter(|node| declares(&*doc, *node))
            .collect();

        let mut checked = 0;
        for declaration in declarations {
            let Some(scope) = doc.parent(declaration).and_then(|parent| doc.parent(parent)) else {
                continue;
            };

            for input in doc.with_attr(scope, &names.input) {
                if doc.has_attr(input, &names.and_marker) != all || doc.is_checked(input) {
                    continue;
                }
                let owned = find_declaration(doc, input, names)
                    .is_some_and(|own| declares(&*doc, own));
                if owned {
                    doc.set_checked(input, true);
                    checked += 1;
                }
            }
        }

        if checked == 0 {
            tracing::debug!("No input found for filter {}={}", name, value);
        }
        checked
    }

    /// Current filter state of the document
    pub fn compute_state(&self, doc: &Document) -> FilterState {
        let controls = active_controls(doc, &self.names);
        extract_filter_state(doc, &controls, &self.names)
    }

    /// Persists the current state and applies it to the listings
    pub async fn filter(&mut self, doc: &mut Document) -> FilterReport {
        let state = self.compute_state(doc);
        self.persist(&state);

        let report = if matches!(self.mode, MatchMode::Local) {
            let (visible, hidden) = self.apply_local(doc, &state);
            FilterReport::Local { visible, hidden }
        } else if state.is_empty() {
            FilterReport::Restored {
                containers: self.restore_snapshots(doc),
            }
        } else {
            self.query_remote(doc, &state).await
        };

        tracing::info!("Filter applied ({} active key(s)): {:?}", state.len(), report);
        report
    }

    fn persist(&mut self, state: &FilterState) {
        let raw = match state.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Could not serialize filter state: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(&self.storage_key, &raw) {
            tracing::warn!("Could not persist filter state: {}", e);
        }
    }

    /// Shows matching items and hides the rest
    ///
    /// Returns the `(visible, hidden)` counts.
    pub fn apply_local(&self, doc: &mut Document, state: &FilterState) -> (usize, usize) {
        let items = doc.with_attr(doc.root(), &self.names.item);
        let mut visible = 0;

        for &item in &items {
            let data = parse_item_data(doc, item, &self.names);
            let show = item_matches(&data, state);
            doc.set_visible(item, show);
            if show {
                visible += 1;
            }
        }

        (visible, items.len() - visible)
    }

    /// Returns every list container to its original children
    ///
    /// Outstanding remote queries for those containers become stale.
    pub fn restore_snapshots(&mut self, doc: &mut Document) -> usize {
        for snapshot in &self.snapshots {
            *self.generations.entry(snapshot.container).or_default() += 1;

            doc.replace_children(snapshot.container, &snapshot.children);
            for item in doc.with_attr(snapshot.container, &self.names.item) {
                doc.set_visible(item, true);
            }
            doc.remove_class(snapshot.container, &self.loading_class);
        }
        self.snapshots.len()
    }

    async fn query_remote(&mut self, doc: &mut Document, state: &FilterState) -> FilterReport {
        let MatchMode::Remote(remote) = &self.mode else {
            return FilterReport::Remote {
                rendered: 0,
                unchanged: 0,
                failed: 0,
                stale: 0,
            };
        };
        let remote = remote.clone();

        let pending: Vec<PendingQuery> = doc
            .with_attr(doc.root(), &self.names.list)
            .into_iter()
            .map(|container| self.begin_query(doc, container, state))
            .collect();

        let responses = join_all(pending.iter().map(|query| remote.query(&query.payload))).await;

        let (mut rendered, mut unchanged, mut failed, mut stale) = (0, 0, 0, 0);
        for (query, response) in pending.iter().zip(responses) {
            match self.complete_query(doc, query, response) {
                QueryOutcome::Rendered(_) => rendered += 1,
                QueryOutcome::Empty => unchanged += 1,
                QueryOutcome::Failed => failed += 1,
                QueryOutcome::Stale => stale += 1,
            }
        }

        FilterReport::Remote {
            rendered,
            unchanged,
            failed,
            stale,
        }
    }

    /// Issues a query for one container
    ///
    /// Marks the container as loading and makes every earlier query for it
    /// stale.
    pub fn begin_query(
        &mut self,
        doc: &mut Document,
        container: NodeId,
        state: &FilterState,
    ) -> PendingQuery {
        let generation = self.generations.entry(container).or_default();
        *generation += 1;
        let generation = *generation;

        doc.add_class(container, &self.loading_class);

        let collections = doc
            .attr(container, &self.names.collection)
            .map(str::trim)
            .filter(|collection| !collection.is_empty())
            .unwrap_or(self.default_collection.as_str())
            .to_string();

        let count = doc
            .attr(container, &self.names.count)
            .and_then(|count| count.trim().parse::<u32>().ok())
            .unwrap_or(self.default_count);

        PendingQuery {
            container,
            generation,
            payload: QueryPayload {
                collections,
                query: state.clone(),
                count,
                offset: page_offset(doc.url()),
            },
        }
    }

    /// Settles a query with its response
    ///
    /// Only the container's latest query may touch it: a stale response is
    /// dropped without clearing the loading class.
    pub fn complete_query(
        &mut self,
        doc: &mut Document,
        query: &PendingQuery,
        response: Result<Vec<Value>>,
    ) -> QueryOutcome {
        let latest = self.generations.get(&query.container).copied().unwrap_or(0);
        if query.generation != latest {
            tracing::debug!(
                "Discarding stale response (generation {} < {})",
                query.generation,
                latest
            );
            return QueryOutcome::Stale;
        }

        doc.remove_class(query.container, &self.loading_class);

        let records = match response {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Remote query for {} failed: {}", query.payload.collections, e);
                return QueryOutcome::Failed;
            }
        };

        if records.is_empty() {
            tracing::info!("No results for {}, leaving list unchanged", query.payload.collections);
            return QueryOutcome::Empty;
        }

        let Some(template) = &self.template else {
            tracing::warn!("No template captured, cannot render remote results");
            return QueryOutcome::Failed;
        };

        let nodes: Vec<NodeId> = records
            .iter()
            .filter_map(|record| {
                template.render(doc, record, &query.payload.collections, &self.markers)
            })
            .collect();

        doc.replace_children(query.container, &nodes);
        for &node in &nodes {
            doc.set_visible(node, true);
        }

        QueryOutcome::Rendered(nodes.len())
    }

    /// Reacts to a filter input changing; suppressed while clearing
    pub async fn on_input_change(&mut self, doc: &mut Document) -> Option<FilterReport> {
        if self.clearing {
            return None;
        }
        Some(self.filter(doc).await)
    }

    /// Flips an input's checked state and re-filters
    pub async fn toggle_input(&mut self, doc: &mut Document, input: NodeId) -> Option<FilterReport> {
        let checked = doc.is_checked(input);
        doc.set_checked(input, !checked);
        self.on_input_change(doc).await
    }

    /// Unchecks every filter input, then filters once
    pub async fn clear_filters(&mut self, doc: &mut Document) -> FilterReport {
        self.clearing = true;
        for input in doc.with_attr(doc.root(), &self.names.input) {
            if doc.is_checked(input) {
                doc.set_checked(input, false);
                self.on_input_change(doc).await;
            }
        }
        self.clearing = false;

        self.filter(doc).await
    }

    /// Elements the document marks as clear-filter triggers
    pub fn clear_triggers(&self, doc: &Document) -> Vec<NodeId> {
        doc.with_attr(doc.root(), &self.names.clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError, StorageResult};
    use crate::BusterError;
    use serde_json::json;

    const PAGE: &str = r#"
        <form>
            <label><input type="checkbox" data-filter-input><span data-filter-name="color" data-filter-value="red">Red</span></label>
            <label><input type="checkbox" data-filter-input><span data-filter-name="color" data-filter-value="blue">Blue</span></label>
            <label><input type="checkbox" data-filter-input data-filter-and><span data-filter-name="size" data-filter-value="m">M</span></label>
            <button data-clear-filters>Clear</button>
        </form>
        <div data-filter-list data-filter-collection="guides" data-filter-count="10">
            <div data-filter-item id="one" data-global-filter='{"color":["red"]}'><h3 data-tp-text="name">One</h3></div>
            <div data-filter-item id="two" data-global-filter='{"color":["blue","red"]}'><h3 data-tp-text="name">Two</h3></div>
            <div data-filter-item id="three" data-global-filter='{"size":["m"]}'><h3 data-tp-text="name">Three</h3></div>
        </div>
    "#;

    fn engine_with(store: MemoryStore) -> FilterEngine {
        FilterEngine::new(
            &FilterConfig::default(),
            &TemplateMarkers::default(),
            Box::new(store),
        )
    }

    fn engine() -> FilterEngine {
        engine_with(MemoryStore::new())
    }

    fn input_for(doc: &Document, value: &str) -> NodeId {
        let names = AttributeNames::default();
        doc.with_attr(doc.root(), &names.input)
            .into_iter()
            .find(|input| {
                find_declaration(doc, *input, &names)
                    .and_then(|d| doc.attr(d, &names.value))
                    == Some(value)
            })
            .unwrap()
    }

    fn item(doc: &Document, id: &str) -> NodeId {
        doc.descendants(doc.root())
            .into_iter()
            .find(|node| doc.attr(*node, "id") == Some(id))
            .unwrap()
    }

    fn container(doc: &Document) -> NodeId {
        doc.first_with_attr(doc.root(), "data-filter-list").unwrap()
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Database("unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Database("read-only".to_string()))
        }

        fn remove(&mut self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_local_filter_shows_matching_items() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);

        let blue = input_for(&doc, "blue");
        let report = engine.toggle_input(&mut doc, blue).await;

        assert_eq!(report, Some(FilterReport::Local { visible: 1, hidden: 2 }));
        assert!(!doc.is_visible(item(&doc, "one")));
        assert!(doc.is_visible(item(&doc, "two")));
        assert!(!doc.is_visible(item(&doc, "three")));
    }

    #[tokio::test]
    async fn test_empty_state_shows_everything() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);

        let report = engine.filter(&mut doc).await;

        assert_eq!(report, FilterReport::Local { visible: 3, hidden: 0 });
    }

    #[tokio::test]
    async fn test_filtering_twice_gives_same_visibility() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);
        doc.set_checked(input_for(&doc, "red"), true);

        let visibility = |doc: &Document| -> Vec<bool> {
            ["one", "two", "three"]
                .iter()
                .map(|id| doc.is_visible(item(doc, id)))
                .collect()
        };

        let first = engine.filter(&mut doc).await;
        let after_first = visibility(&doc);
        let second = engine.filter(&mut doc).await;

        assert_eq!(first, FilterReport::Local { visible: 2, hidden: 1 });
        assert_eq!(second, first);
        assert_eq!(visibility(&doc), after_first);
        assert_eq!(after_first, vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_filter_persists_state() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);

        let red = input_for(&doc, "red");
        engine.toggle_input(&mut doc, red).await;

        let stored = engine.store().get("kidadl-filters").unwrap();
        assert_eq!(stored.as_deref(), Some(r#"{"color":["red"]}"#));
    }

    #[tokio::test]
    async fn test_init_restores_persisted_selection() {
        let mut store = MemoryStore::new();
        store
            .set("kidadl-filters", r#"{"color":["blue"],"size__and":["m"]}"#)
            .unwrap();

        let mut doc = Document::parse(PAGE);
        let mut engine = engine_with(store);
        let restored = engine.init(&mut doc);

        assert_eq!(restored, 2);
        assert!(doc.is_checked(input_for(&doc, "blue")));
        assert!(doc.is_checked(input_for(&doc, "m")));
        assert!(!doc.is_checked(input_for(&doc, "red")));
    }

    #[test]
    fn test_restore_ignores_malformed_storage() {
        let mut store = MemoryStore::new();
        store.set("kidadl-filters", "{not json").unwrap();

        let mut doc = Document::parse(PAGE);
        let mut engine = engine_with(store);

        assert_eq!(engine.init(&mut doc), 0);
    }

    #[tokio::test]
    async fn test_store_failure_does_not_block_filtering() {
        let mut doc = Document::parse(PAGE);
        let mut engine = FilterEngine::new(
            &FilterConfig::default(),
            &TemplateMarkers::default(),
            Box::new(FailingStore),
        );
        assert_eq!(engine.init(&mut doc), 0);

        let red = input_for(&doc, "red");
        let report = engine.toggle_input(&mut doc, red).await;

        assert_eq!(report, Some(FilterReport::Local { visible: 2, hidden: 1 }));
    }

    #[test]
    fn test_select_facet_respects_and_marker() {
        let mut doc = Document::parse(PAGE);
        let engine = engine();

        assert_eq!(engine.select_facet(&mut doc, "size", "m", false), 0);
        assert_eq!(engine.select_facet(&mut doc, "size", "m", true), 1);
        // already checked
        assert_eq!(engine.select_facet(&mut doc, "size", "m", true), 0);
        assert!(doc.is_checked(input_for(&doc, "m")));
    }

    #[tokio::test]
    async fn test_clear_filters_filters_once() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);
        engine.select_facet(&mut doc, "color", "red", false);
        engine.select_facet(&mut doc, "color", "blue", false);

        let report = engine.clear_filters(&mut doc).await;

        assert_eq!(report, FilterReport::Local { visible: 3, hidden: 0 });
        assert!(!doc.is_checked(input_for(&doc, "red")));
        assert!(!doc.is_checked(input_for(&doc, "blue")));
        assert_eq!(
            engine.store().get("kidadl-filters").unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(engine.clear_triggers(&doc).len(), 1);
    }

    #[test]
    fn test_begin_query_payload() {
        let mut doc = Document::parse(PAGE);
        doc.set_url(url::Url::parse("https://example.com/list?x_page=3").unwrap());
        let mut engine = engine();
        engine.init(&mut doc);
        let list = container(&doc);
        let state: FilterState = vec![("color".to_string(), "red".to_string())]
            .into_iter()
            .collect();

        let query = engine.begin_query(&mut doc, list, &state);

        assert!(doc.has_class(list, "is-loading"));
        assert_eq!(query.generation, 1);
        assert_eq!(query.payload.collections, "guides");
        assert_eq!(query.payload.count, 10);
        assert_eq!(query.payload.offset, 3);
        assert_eq!(query.payload.query, state);
    }

    #[test]
    fn test_begin_query_defaults() {
        let mut doc = Document::parse(
            r#"<ul data-filter-list data-filter-count="lots"><li data-filter-item>a</li></ul>"#,
        );
        let mut engine = engine();
        let list = container(&doc);

        let query = engine.begin_query(&mut doc, list, &FilterState::new());

        assert_eq!(query.payload.collections, "articles");
        assert_eq!(query.payload.count, 25);
        assert_eq!(query.payload.offset, 0);
    }

    #[test]
    fn test_complete_query_renders_records() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);
        let list = container(&doc);

        let query = engine.begin_query(&mut doc, list, &FilterState::new());
        let outcome = engine.complete_query(
            &mut doc,
            &query,
            Ok(vec![json!({"name": "Zoo Trip"}), json!({"name": "Farm Day"})]),
        );

        assert_eq!(outcome, QueryOutcome::Rendered(2));
        assert!(!doc.has_class(list, "is-loading"));
        let items = doc.with_attr(list, "data-filter-item");
        assert_eq!(items.len(), 2);
        assert_eq!(doc.text_content(items[0]), "Zoo Trip");
        assert_eq!(doc.text_content(items[1]), "Farm Day");
        assert!(items.iter().all(|item| doc.is_visible(*item)));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);
        let list = container(&doc);

        let first = engine.begin_query(&mut doc, list, &FilterState::new());
        let second = engine.begin_query(&mut doc, list, &FilterState::new());

        let outcome = engine.complete_query(&mut doc, &first, Ok(vec![json!({"name": "Old"})]));
        assert_eq!(outcome, QueryOutcome::Stale);
        assert!(doc.has_class(list, "is-loading"));
        assert_eq!(doc.with_attr(list, "data-filter-item").len(), 3);

        let outcome = engine.complete_query(&mut doc, &second, Ok(vec![json!({"name": "New"})]));
        assert_eq!(outcome, QueryOutcome::Rendered(1));
        assert!(!doc.has_class(list, "is-loading"));
    }

    #[test]
    fn test_failed_and_empty_responses_leave_list_unchanged() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);
        let list = container(&doc);
        let before = doc.inner_html(list);

        let query = engine.begin_query(&mut doc, list, &FilterState::new());
        let outcome = engine.complete_query(&mut doc, &query, Err(BusterError::MissingDocumentUrl));
        assert_eq!(outcome, QueryOutcome::Failed);
        assert!(!doc.has_class(list, "is-loading"));

        let query = engine.begin_query(&mut doc, list, &FilterState::new());
        let outcome = engine.complete_query(&mut doc, &query, Ok(Vec::new()));
        assert_eq!(outcome, QueryOutcome::Empty);

        assert_eq!(doc.inner_html(list), before);
    }

    #[test]
    fn test_restore_snapshots_after_render() {
        let mut doc = Document::parse(PAGE);
        let mut engine = engine();
        engine.init(&mut doc);
        let list = container(&doc);
        let before = doc.with_attr(list, "data-filter-item");
        for &node in &before {
            doc.set_visible(node, false);
        }

        let query = engine.begin_query(&mut doc, list, &FilterState::new());
        engine.complete_query(&mut doc, &query, Ok(vec![json!({"name": "Zoo Trip"})]));
        let pending = engine.begin_query(&mut doc, list, &FilterState::new());

        assert_eq!(engine.restore_snapshots(&mut doc), 1);

        assert_eq!(doc.with_attr(list, "data-filter-item"), before);
        assert!(before.iter().all(|node| doc.is_visible(*node)));
        assert!(!doc.has_class(list, "is-loading"));
        assert_eq!(
            engine.complete_query(&mut doc, &pending, Ok(vec![json!({"name": "Late"})])),
            QueryOutcome::Stale
        );
    }

    #[test]
    fn test_from_config_requires_endpoint_in_remote_mode() {
        let mut config = Config::default();
        config.filter.mode = FilterMode::Remote;

        let result = FilterEngine::from_config(&config, Client::new(), Box::new(MemoryStore::new()));
        assert!(result.is_err());

        config.remote.endpoint = Some("https://search.example.com/query".to_string());
        let engine =
            FilterEngine::from_config(&config, Client::new(), Box::new(MemoryStore::new())).unwrap();
        assert!(matches!(engine.mode(), MatchMode::Remote(_)));
    }
}
