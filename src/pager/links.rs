//! Pagination link handling
//!
//! Paginated listings expose a "next page" link whose query string ends in
//! the page number (`?3f9a_page=2`). Stripping the trailing digits yields a
//! prefix to which any page number can be appended.

use crate::dom::{Document, Selector};
use crate::Result;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Base used to read the query of a link when the document has no URL
const FALLBACK_BASE: &str = "http://localhost/";

/// Query string (`?…`) of the document's "next page" link
///
/// Returns `None` when no element matches the selector, when it has no
/// `href`, or when the link carries no query.
///
/// # Example
///
/// ```
/// use pagebuster::dom::{parse_selector, Document};
/// use pagebuster::pager::next_page_query;
///
/// let doc = Document::parse(r#"<a class="w-pagination-next" href="/list?page=2">Next</a>"#);
/// let selector = parse_selector(".w-pagination-next").unwrap();
/// assert_eq!(next_page_query(&doc, &selector), Some("?page=2".to_string()));
/// ```
pub fn next_page_query(doc: &Document, selector: &Selector) -> Option<String> {
    let link = doc.select_first(doc.root(), selector)?;
    let href = doc.attr(link, "href")?;

    let resolved = match doc.url() {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(FALLBACK_BASE).ok()?.join(href).ok()?,
    };

    resolved
        .query()
        .filter(|query| !query.is_empty())
        .map(|query| format!("?{query}"))
}

/// Strips the trailing page number of a query string, keeping the `=`
///
/// A query without trailing digits is returned unchanged.
pub fn next_page_prefix(query: &str) -> String {
    static TRAILING_NUMBER: OnceLock<Regex> = OnceLock::new();
    let pattern = TRAILING_NUMBER.get_or_init(|| Regex::new(r"=\d+$").expect("valid page regex"));

    pattern.replace(query, "=").into_owned()
}

/// URL of page `number`, relative to the listing's own URL
pub fn page_url(base: &Url, prefix: &str, number: u32) -> Result<Url> {
    Ok(base.join(&format!("{prefix}{number}"))?)
}
