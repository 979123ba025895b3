//! Filtering against a mock query endpoint and persistent storage

use pagebuster::config::{FilterConfig, TemplateMarkers};
use pagebuster::filter::RemoteSearch;
use pagebuster::storage::{KeyValueStore, MemoryStore, SqliteStore};
use pagebuster::{Document, FilterEngine, FilterReport, NodeId};
use serde_json::json;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"<html><body>
<form>
    <label><input type="checkbox" data-filter-input><span data-filter-name="category" data-filter-value="zoo">Zoo</span></label>
    <label><input type="checkbox" data-filter-input><span data-filter-name="category" data-filter-value="farm">Farm</span></label>
</form>
<div data-filter-list data-filter-collection="activities" data-filter-count="5">
    <div data-filter-item data-global-filter='{"category":["zoo"]}'><a data-tp-href="slug" href="/activities/lions"><h3 data-tp-text="Name">Lions</h3></a></div>
    <div data-filter-item data-global-filter='{"category":["farm"]}'><a data-tp-href="slug" href="/activities/cows"><h3 data-tp-text="Name">Cows</h3></a></div>
</div>
</body></html>"#;

fn listing() -> Document {
    Document::parse_with_url(
        LISTING,
        Url::parse("https://kids.example.com/activities?3f9a_page=1").expect("valid URL"),
    )
}

fn local_engine(store: Box<dyn KeyValueStore>) -> FilterEngine {
    FilterEngine::new(&FilterConfig::default(), &TemplateMarkers::default(), store)
}

fn remote_engine(server: &MockServer) -> FilterEngine {
    let endpoint = Url::parse(&format!("{}/query", server.uri())).expect("valid endpoint");
    local_engine(Box::new(MemoryStore::new()))
        .with_remote(RemoteSearch::new(reqwest::Client::new(), endpoint))
}

fn list(doc: &Document) -> NodeId {
    doc.first_with_attr(doc.root(), "data-filter-list")
        .expect("listing has a list container")
}

fn item_texts(doc: &Document) -> Vec<String> {
    doc.with_attr(list(doc), "data-filter-item")
        .into_iter()
        .map(|item| doc.text_content(item))
        .collect()
}

#[tokio::test]
async fn test_remote_filter_renders_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({
            "collections": "activities",
            "query": {"category": ["zoo"]},
            "count": 5,
            "offset": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Name": "Zoo Trip", "Slug": "zoo-trip"},
            {"Name": "Safari Park", "Slug": "safari-park"},
            {"Name": "Aquarium", "Slug": "aquarium"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut doc = listing();
    let mut engine = remote_engine(&server);
    engine.init(&mut doc);
    engine.select_facet(&mut doc, "category", "zoo", false);

    let report = engine.filter(&mut doc).await;

    assert_eq!(
        report,
        FilterReport::Remote {
            rendered: 1,
            unchanged: 0,
            failed: 0,
            stale: 0
        }
    );
    assert_eq!(item_texts(&doc), vec!["Zoo Trip", "Safari Park", "Aquarium"]);

    let links = doc.with_attr(list(&doc), "data-tp-href");
    assert_eq!(doc.attr(links[0], "href"), Some("/activities/zoo-trip"));
    assert!(!doc.has_class(list(&doc), "is-loading"));
}

#[tokio::test]
async fn test_empty_state_restores_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut doc = listing();
    let mut engine = remote_engine(&server);
    engine.init(&mut doc);

    let report = engine.filter(&mut doc).await;

    assert_eq!(report, FilterReport::Restored { containers: 1 });
    assert_eq!(item_texts(&doc), vec!["Lions", "Cows"]);
}

#[tokio::test]
async fn test_remote_failure_leaves_list_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut doc = listing();
    let mut engine = remote_engine(&server);
    engine.init(&mut doc);
    engine.select_facet(&mut doc, "category", "farm", false);
    let before = doc.inner_html(list(&doc));

    let report = engine.filter(&mut doc).await;

    assert_eq!(
        report,
        FilterReport::Remote {
            rendered: 0,
            unchanged: 0,
            failed: 1,
            stale: 0
        }
    );
    assert_eq!(doc.inner_html(list(&doc)), before);
    assert!(!doc.has_class(list(&doc), "is-loading"));
}

#[tokio::test]
async fn test_empty_remote_result_leaves_list_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut doc = listing();
    let mut engine = remote_engine(&server);
    engine.init(&mut doc);
    engine.select_facet(&mut doc, "category", "zoo", false);

    let report = engine.filter(&mut doc).await;

    assert!(matches!(report, FilterReport::Remote { unchanged: 1, .. }));
    assert_eq!(item_texts(&doc), vec!["Lions", "Cows"]);
}

#[tokio::test]
async fn test_selection_persists_across_sessions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("filters.db");

    {
        let store = SqliteStore::new(&db_path).expect("Failed to open store");
        let mut doc = listing();
        let mut engine = local_engine(Box::new(store));
        assert_eq!(engine.init(&mut doc), 0);

        engine.select_facet(&mut doc, "category", "farm", false);
        let report = engine.filter(&mut doc).await;
        assert_eq!(report, FilterReport::Local { visible: 1, hidden: 1 });
    }

    let store = SqliteStore::new(&db_path).expect("Failed to reopen store");
    let mut doc = listing();
    let mut engine = local_engine(Box::new(store));

    assert_eq!(engine.init(&mut doc), 1);
    let report = engine.filter(&mut doc).await;
    assert_eq!(report, FilterReport::Local { visible: 1, hidden: 1 });

    let items = doc.with_attr(list(&doc), "data-filter-item");
    assert!(!doc.is_visible(items[0]));
    assert!(doc.is_visible(items[1]));
}
