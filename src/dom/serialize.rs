//! HTML serialization through html5ever
//!
//! Serialization runs with scripting enabled, matching how pages are
//! parsed, so `<noscript>` content is written back as raw text.

use super::{Document, NodeId};
use html5ever::serialize::{serialize, Serialize, SerializeOpts, TraversalScope};
use scraper::ElementRef;

fn to_markup<T: Serialize>(node: &T, traversal_scope: TraversalScope) -> String {
    let opts = SerializeOpts {
        traversal_scope,
        ..SerializeOpts::default()
    };
    let mut buf = Vec::new();
    if let Err(e) = serialize(&mut buf, node, opts) {
        tracing::warn!("Failed to serialize markup: {}", e);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

impl Document {
    /// Serializes the whole document
    pub fn to_html(&self) -> String {
        to_markup(&self.html, TraversalScope::ChildrenOnly(None))
    }

    /// Markup of an element and its subtree; other nodes yield their text
    pub fn outer_html(&self, id: NodeId) -> String {
        match self.html.tree.get(id).and_then(ElementRef::wrap) {
            Some(element) => to_markup(&element, TraversalScope::IncludeNode),
            None => self.text_content(id),
        }
    }

    /// Markup of the node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        match self.html.tree.get(id).and_then(ElementRef::wrap) {
            Some(element) => to_markup(&element, TraversalScope::ChildrenOnly(None)),
            None => self
                .children(id)
                .into_iter()
                .map(|child| self.outer_html(child))
                .collect(),
        }
    }
}
