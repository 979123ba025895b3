//! Pagination against a mock HTTP server

use pagebuster::config::{HttpConfig, PagerConfig};
use pagebuster::pager::{build_http_client, HttpPageSource, PageSource};
use pagebuster::{Document, Pager};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Markup of listing page `number` out of `last`
fn listing_page(number: u32, last: u32) -> String {
    let next = if number < last {
        format!(
            r#"<a class="w-pagination-next" href="?3f9a_page={}">Next</a>"#,
            number + 1
        )
    } else {
        String::new()
    };

    format!(
        r#"<html><body>
        <div class="w-dyn-list" data-filter-list>
            <div data-filter-item data-global-filter='{{"page":["{number}"]}}'>Item {number}.1</div>
            <div data-filter-item data-global-filter='{{"page":["{number}"]}}'>Item {number}.2</div>
        </div>
        {next}
        </body></html>"#
    )
}

/// Mounts pages `1..=last` and 404s for `last+1..=last+overshoot`
async fn mount_listing(server: &MockServer, last: u32, overshoot: u32) {
    for number in 1..=last {
        Mock::given(method("GET"))
            .and(path("/activities"))
            .and(query_param("3f9a_page", number.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(listing_page(number, last))
                    .insert_header("content-type", "text/html"),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    for number in last + 1..=last + overshoot {
        Mock::given(method("GET"))
            .and(path("/activities"))
            .and(query_param("3f9a_page", number.to_string()))
            .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not found</h1>"))
            .expect(1)
            .mount(server)
            .await;
    }
}

async fn load_first_page(server: &MockServer) -> (HttpPageSource, Document) {
    let client = build_http_client(&HttpConfig::default()).expect("Failed to build client");
    let source = HttpPageSource::new(client);
    let url = Url::parse(&format!("{}/activities?3f9a_page=1", server.uri()))
        .expect("Failed to parse listing URL");

    let body = source.fetch(&url).await.expect("Failed to fetch first page");
    (source, Document::parse_with_url(&body, url))
}

fn pager_config(chunk_size: u32) -> PagerConfig {
    PagerConfig {
        chunk_size,
        ..PagerConfig::default()
    }
}

fn item_texts(doc: &Document) -> Vec<String> {
    doc.with_attr(doc.root(), "data-filter-item")
        .into_iter()
        .map(|item| doc.text_content(item))
        .collect()
}

#[tokio::test]
async fn test_aggregates_all_pages_in_order() {
    let server = MockServer::start().await;
    mount_listing(&server, 5, 0).await;

    let (source, mut doc) = load_first_page(&server).await;
    let pager = Pager::new(source, &pager_config(2)).expect("Failed to build pager");

    let report = pager.run(&mut doc).await.expect("Pager run failed");

    assert_eq!(report.pages_fetched, 4);
    assert_eq!(report.items_collected, 10);
    assert_eq!(report.last_page, 5);

    let expected: Vec<String> = (1..=5)
        .flat_map(|n| [format!("Item {n}.1"), format!("Item {n}.2")])
        .collect();
    assert_eq!(item_texts(&doc), expected);

    // every item sits hidden in the single list container
    let lists = doc.with_attr(doc.root(), "data-filter-list");
    assert_eq!(lists.len(), 1);
    let items = doc.with_attr(lists[0], "data-filter-item");
    assert_eq!(items.len(), 10);
    assert!(items.iter().all(|item| !doc.is_visible(*item)));
}

#[tokio::test]
async fn test_overshoot_pages_end_the_run() {
    let server = MockServer::start().await;
    // chunk of 4 from page 2 requests 2..=5 while the listing ends at 3
    mount_listing(&server, 3, 2).await;

    let (source, mut doc) = load_first_page(&server).await;
    let pager = Pager::new(source, &pager_config(4)).expect("Failed to build pager");

    let report = pager.run(&mut doc).await.expect("Overshoot must not fail the run");

    assert_eq!(report.pages_fetched, 4);
    assert_eq!(report.items_collected, 6);
    assert_eq!(item_texts(&doc).last().map(String::as_str), Some("Item 3.2"));
}

#[tokio::test]
async fn test_single_page_listing_fetches_nothing_else() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 0).await;

    let (source, mut doc) = load_first_page(&server).await;
    let pager = Pager::new(source, &pager_config(10)).expect("Failed to build pager");

    let report = pager.run(&mut doc).await.expect("Pager run failed");

    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.items_collected, 2);
}

#[tokio::test]
async fn test_unreachable_page_aborts_run() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 0).await;

    let (_, mut doc) = load_first_page(&server).await;
    // pretend the listing continues on a host that refuses connections
    let closed = Url::parse("http://127.0.0.1:9/activities?3f9a_page=1").expect("valid URL");
    doc.set_url(closed);
    let next = doc.create_element("a");
    doc.set_attr(next, "class", "w-pagination-next");
    doc.set_attr(next, "href", "?3f9a_page=2");
    let root = doc.root();
    doc.append_child(root, next);

    let client = build_http_client(&HttpConfig {
        connect_timeout_secs: 2,
        timeout_secs: 5,
        ..HttpConfig::default()
    })
    .expect("Failed to build client");
    let pager = Pager::new(HttpPageSource::new(client), &pager_config(2))
        .expect("Failed to build pager");
    let before = doc.to_html();

    assert!(pager.run(&mut doc).await.is_err());
    assert_eq!(doc.to_html(), before);
}
