//! HTML parsing
//!
//! Parsing is delegated to `scraper` (html5ever). Fragments are parsed in a
//! `<body>` context and their nodes imported into the target document.

use super::{Document, NodeId};
use scraper::Html;

impl Document {
    /// Parses a full HTML document
    ///
    /// # Example
    ///
    /// ```
    /// use pagebuster::dom::Document;
    ///
    /// let doc = Document::parse("<p>Hello</p>");
    /// assert_eq!(doc.text_content(doc.root()), "Hello");
    /// ```
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            url: None,
        }
    }

    /// Parses an HTML fragment into detached nodes owned by this document
    pub fn parse_fragment(&mut self, html: &str) -> Vec<NodeId> {
        let parsed = Html::parse_fragment(html);
        let root = parsed.tree.root();

        // html5ever wraps fragment content in a synthetic <html> element
        let top = root
            .children()
            .find(|child| child.value().is_element())
            .unwrap_or(root);

        top.children().map(|child| self.copy_subtree(child)).collect()
    }

    /// Replaces the children of `id` with the parsed fragment, verbatim
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        let nodes = self.parse_fragment(html);
        self.replace_children(id, &nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_keeps_attributes() {
        let doc = Document::parse(r#"<div data-filter-item data-x="1">Item</div>"#);
        let div = doc.first_with_attr(doc.root(), "data-filter-item").unwrap();
        assert_eq!(doc.tag_name(div), Some("div"));
        assert_eq!(doc.attr(div, "data-x"), Some("1"));
        assert_eq!(doc.attr(div, "data-filter-item"), Some(""));
    }

    #[test]
    fn test_parse_fragment_returns_detached_nodes() {
        let mut doc = Document::new();
        let nodes = doc.parse_fragment("<b>bold</b> tail");
        assert_eq!(nodes.len(), 2);
        assert_eq!(doc.tag_name(nodes[0]), Some("b"));
        assert_eq!(doc.text_content(nodes[1]), " tail");
        assert!(nodes.iter().all(|node| doc.parent(*node).is_none()));
    }

    #[test]
    fn test_set_inner_html() {
        let mut doc = Document::parse(r#"<div id="target"><span>old</span></div>"#);
        let target = doc.first_with_attr(doc.root(), "id").unwrap();
        doc.set_inner_html(target, "<em>new</em> content");
        assert_eq!(doc.text_content(target), "new content");
        assert_eq!(doc.tag_name(doc.children(target)[0]), Some("em"));
    }

    #[test]
    fn test_comments_do_not_contribute_text() {
        let doc = Document::parse("<p>a<!-- hidden -->b</p>");
        assert_eq!(doc.text_content(doc.root()), "ab");
    }
}
