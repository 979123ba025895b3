//! Template rendering of remote records
//!
//! A template is the markup of one listing item, captured once. Rendering
//! clones it into the target document and projects record fields into the
//! elements that carry placeholder markers:
//!
//! | Marker | Effect |
//! |--------|--------|
//! | text   | text content set to the field |
//! | src    | `src` set to the field, `srcset` removed |
//! | html   | inner markup set to the field, unsanitized |
//! | href   | `href` set to the field; `slug` builds `/<collection>/<Slug>` |
//! | attrs  | `key=path, key=path` pairs set as attributes |
//!
//! A path that resolves to nothing leaves the element untouched.

mod path;

pub use path::{display_value, resolve_path};

use crate::config::TemplateMarkers;
use crate::dom::{Document, NodeId};
use serde_json::Value;

/// Record field used to build slug links
const SLUG_FIELD: &str = "Slug";

/// An immutable stencil for rendering records
#[derive(Debug, Clone)]
pub struct Template {
    document: Document,
    root: NodeId,
}

impl Template {
    /// Captures the subtree at `node` as a template
    pub fn capture(doc: &Document, node: NodeId) -> Option<Self> {
        let mut document = Document::new();
        let root = document.import_subtree(doc, node)?;
        Some(Self { document, root })
    }

    /// Builds a template from markup, using its first element
    pub fn from_html(html: &str) -> Option<Self> {
        let mut document = Document::new();
        let root = document
            .parse_fragment(html)
            .into_iter()
            .find(|node| document.is_element(*node))?;
        Some(Self { document, root })
    }

    /// Markup of the captured stencil
    pub fn html(&self) -> String {
        self.document.outer_html(self.root)
    }

    /// Renders one record into a new detached node of `target`
    pub fn render(
        &self,
        target: &mut Document,
        record: &Value,
        collection: &str,
        markers: &TemplateMarkers,
    ) -> Option<NodeId> {
        let node = target.import_subtree(&self.document, self.root)?;

        let mut elements = vec![node];
        elements.extend(target.descendants(node));
        for element in elements {
            project(target, element, record, collection, markers);
        }

        Some(node)
    }
}

fn project(
    doc: &mut Document,
    element: NodeId,
    record: &Value,
    collection: &str,
    markers: &TemplateMarkers,
) {
    if let Some(value) = marked_value(doc, element, &markers.text, record) {
        doc.set_text_content(element, &value);
    }

    if let Some(value) = marked_value(doc, element, &markers.src, record) {
        doc.set_attr(element, "src", &value);
        doc.remove_attr(element, "srcset");
    }

    if let Some(value) = marked_value(doc, element, &markers.html, record) {
        doc.set_inner_html(element, &value);
    }

    if let Some(path) = doc.attr(element, &markers.href).map(str::to_owned) {
        if let Some(href) = link_target(record, &path, collection) {
            doc.set_attr(element, "href", &href);
        }
    }

    if let Some(pairs) = doc.attr(element, &markers.attrs).map(str::to_owned) {
        for (key, value) in attribute_pairs(&pairs, record) {
            doc.set_attr(element, &key, &value);
        }
    }
}

/// Resolved text of the field named by `marker` on `element`
fn marked_value(doc: &Document, element: NodeId, marker: &str, record: &Value) -> Option<String> {
    let path = doc.attr(element, marker)?;
    resolve_path(record, path).map(display_value)
}

fn link_target(record: &Value, path: &str, collection: &str) -> Option<String> {
    if path.trim().eq_ignore_ascii_case("slug") {
        let slug = resolve_path(record, SLUG_FIELD)?;
        return Some(format!("/{}/{}", collection, display_value(slug)));
    }
    resolve_path(record, path).map(display_value)
}

/// Parses `key=path` pairs, keeping those whose path resolves
fn attribute_pairs(pairs: &str, record: &Value) -> Vec<(String, String)> {
    pairs
        .split(',')
        .filter_map(|pair| {
            let (key, path) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = resolve_path(record, path.trim())?;
            Some((key.to_string(), display_value(value)))
        })
        .collect()
}
