//! CSS selector queries
//!
//! Selectors are parsed and matched by `scraper`, so combinators,
//! attribute operators and structural pseudo-classes such as `:not()` or
//! `:first-child` all work. Matching sees the full ancestry of a node, as
//! `querySelectorAll` does.

use super::{Document, NodeId};
use scraper::ElementRef;
use thiserror::Error;

pub use scraper::Selector;

/// A selector scraper refused to parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid selector '{selector}': {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// Parses a selector group
///
/// # Example
///
/// ```
/// use pagebuster::dom::parse_selector;
///
/// assert!(parse_selector(".w-pagination-next:not(.w--disabled)").is_ok());
/// assert!(parse_selector("[data-filter-list] >").is_err());
/// ```
pub fn parse_selector(source: &str) -> Result<Selector, SelectorError> {
    Selector::parse(source).map_err(|e| SelectorError {
        selector: source.to_string(),
        message: e.to_string(),
    })
}

impl Document {
    fn element_ref(&self, id: NodeId) -> Option<ElementRef<'_>> {
        ElementRef::wrap(self.html.tree.get(id)?)
    }

    /// Whether the element matches the selector
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.element_ref(id)
            .is_some_and(|element| selector.matches(&element))
    }

    /// Descendant elements of `scope` matching the selector, in document order
    pub fn select(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.matches(*id, selector))
            .collect()
    }

    pub fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.matches(*id, selector))
    }
}
