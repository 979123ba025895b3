//! Pager module for aggregating paginated listings
//!
//! This module contains the pagination logic, including:
//! - HTTP fetching of subsequent listing pages
//! - Next-page link discovery and page URL derivation
//! - Batched concurrent fetching until the last page is seen
//! - Moving every collected item, hidden, into the host list

mod fetcher;
mod links;

pub use fetcher::{build_http_client, HttpPageSource, PageSource};
pub use links::{next_page_prefix, next_page_query, page_url};

use crate::config::PagerConfig;
use crate::dom::{parse_selector, Document, NodeId, Selector};
use crate::{BusterError, Result};
use futures::future::try_join_all;

/// Summary of a pager run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagerReport {
    /// Pages fetched beyond the first
    pub pages_fetched: usize,
    /// Items appended to the host list, first-page items included
    pub items_collected: usize,
    /// Highest page number processed; 0 when the run was a no-op
    pub last_page: u32,
}

/// Aggregates every page of a listing into the first page's document
pub struct Pager<S> {
    source: S,
    item_selector: Selector,
    next_page_selector: Selector,
    chunk_size: u32,
    max_pages: Option<u32>,
}

impl<S: PageSource> Pager<S> {
    /// Creates a pager fetching through `source`
    ///
    /// # Returns
    ///
    /// * `Ok(Pager)` - Pager ready to run
    /// * `Err(BusterError)` - A configured selector failed to parse
    pub fn new(source: S, config: &PagerConfig) -> Result<Self> {
        Ok(Self {
            source,
            item_selector: parse_selector(&config.item_selector)?,
            next_page_selector: parse_selector(&config.next_page_selector)?,
            chunk_size: config.chunk_size.max(1),
            max_pages: config.max_pages,
        })
    }

    /// Runs the aggregation against `doc`, the already-loaded first page
    ///
    /// # Run Flow
    ///
    /// 1. Collect the first page's items; none means nothing to do
    /// 2. Read the next-page link; none means the listing has one page
    /// 3. Fetch batches of `chunk_size` consecutive pages from page 2 on,
    ///    concurrently, processing each batch in page order
    /// 4. Stop after a batch in which some page had no next-page link
    /// 5. Append every collected item, hidden, to the first item's parent
    ///
    /// A failed fetch aborts the run and leaves `doc` untouched.
    pub async fn run(&self, doc: &mut Document) -> Result<PagerReport> {
        let first_items = doc.select(doc.root(), &self.item_selector);
        let Some(list_parent) = first_items.first().and_then(|item| doc.parent(*item)) else {
            tracing::info!("No listing items on the first page, nothing to aggregate");
            return Ok(PagerReport::default());
        };

        let mut report = PagerReport {
            last_page: 1,
            ..PagerReport::default()
        };
        let mut collected: Vec<NodeId> = first_items;

        if let Some(query) = next_page_query(doc, &self.next_page_selector) {
            let base = doc.url().cloned().ok_or(BusterError::MissingDocumentUrl)?;
            let prefix = next_page_prefix(&query);
            tracing::debug!("Paginating {} with prefix {}", base, prefix);

            let mut page_number: u32 = 2;
            let mut last_page_reached = false;

            while !last_page_reached {
                let mut batch = Vec::new();
                for _ in 0..self.chunk_size {
                    if self.max_pages.is_some_and(|max| page_number > max) {
                        break;
                    }
                    batch.push((page_number, page_url(&base, &prefix, page_number)?));
                    page_number += 1;
                }

                if batch.is_empty() {
                    tracing::warn!(
                        "Reached page limit {} before the last page",
                        self.max_pages.unwrap_or_default()
                    );
                    break;
                }

                let bodies = try_join_all(batch.iter().map(|(_, url)| self.source.fetch(url))).await?;

                for ((number, url), body) in batch.into_iter().zip(bodies) {
                    let page = Document::parse_with_url(&body, url);
                    let items = page.select(page.root(), &self.item_selector);
                    tracing::debug!("Page {}: {} item(s)", number, items.len());

                    collected.extend(
                        items
                            .into_iter()
                            .filter_map(|item| doc.import_subtree(&page, item)),
                    );

                    if next_page_query(&page, &self.next_page_selector).is_none() {
                        last_page_reached = true;
                    }

                    report.pages_fetched += 1;
                    report.last_page = number;
                }
            }
        }

        for &item in &collected {
            doc.set_visible(item, false);
            doc.append_child(list_parent, item);
        }
        report.items_collected = collected.len();

        tracing::info!(
            "Aggregated {} item(s) from {} page(s)",
            report.items_collected,
            report.last_page
        );

        Ok(report)
    }
}
