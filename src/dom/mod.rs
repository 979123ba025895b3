//! Mutable HTML document model
//!
//! This module provides the document scope every other component works
//! against. A `Document` owns a `scraper::Html` tree and addresses its
//! nodes by `NodeId`:
//! - HTML is parsed by html5ever through `scraper`
//! - Nodes can be moved, detached and imported across documents by editing
//!   the underlying `ego_tree` tree
//! - Queries use `scraper::Selector`, so any selector scraper accepts works
//! - Serialization goes through the html5ever serializer
//!
//! Detached nodes stay in the tree, so a captured list of children can be
//! re-attached later without re-parsing.

mod parse;
mod selector;
mod serialize;

pub use ego_tree::NodeId;
pub use selector::{parse_selector, Selector, SelectorError};

use ego_tree::NodeRef;
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{Html, Node};
use url::Url;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// An owned, mutable HTML document
///
/// `NodeId`s are only meaningful for the document that created them.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
    url: Option<Url>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only the root node
    pub fn new() -> Self {
        Self {
            html: Html::new_document(),
            url: None,
        }
    }

    /// Parses a full HTML document and records the URL it was loaded from
    pub fn parse_with_url(html: &str, url: Url) -> Self {
        let mut document = Self::parse(html);
        document.url = Some(url);
        document
    }

    pub fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    /// The location the document was loaded from, if known
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    fn node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    // ===== Node creation =====

    /// Creates a detached element with no attributes
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let name = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(name.to_ascii_lowercase()),
        );
        self.html
            .tree
            .orphan(Node::Element(Element::new(name, Vec::new())))
            .id()
    }

    /// Creates a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.html
            .tree
            .orphan(Node::Text(Text {
                text: StrTendril::from(text),
            }))
            .id()
    }

    // ===== Element access =====

    fn element(&self, id: NodeId) -> Option<&Element> {
        self.html.tree.get(id)?.value().as_element()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Iterates over an element's attributes in source order
    pub fn attrs(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.element(id).into_iter().flat_map(Element::attrs)
    }

    /// Sets an attribute, replacing any existing value
    ///
    /// Has no effect on non-element nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        self.edit_attributes(id, |attributes| {
            match attributes.iter_mut().find(|attr| &*attr.name.local == name) {
                Some(existing) => existing.value = StrTendril::from(value),
                None => attributes.push(Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                    value: StrTendril::from(value),
                }),
            }
        });
    }

    /// Removes an attribute, returning its previous value
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let previous = self.attr(id, name)?.to_string();
        self.edit_attributes(id, |attributes| {
            attributes.retain(|attr| &*attr.name.local != name);
        });
        Some(previous)
    }

    /// Rebuilds an element with edited attributes
    ///
    /// scraper caches the id and class list inside `Element`, so the value
    /// is replaced rather than edited in place.
    fn edit_attributes(&mut self, id: NodeId, edit: impl FnOnce(&mut Vec<Attribute>)) {
        let Some(element) = self.element(id) else {
            return;
        };
        let name = element.name.clone();
        let mut attributes: Vec<Attribute> = element
            .attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();

        edit(&mut attributes);

        if let Some(mut node) = self.html.tree.get_mut(id) {
            *node.value() = Node::Element(Element::new(name, attributes));
        }
    }

    // ===== Tree navigation =====

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent().map(|parent| parent.id())
    }

    /// Child nodes of `id`, text and comments included
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| node.children().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    /// All descendant elements of `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| {
                node.descendants()
                    .skip(1)
                    .filter(|descendant| descendant.value().is_element())
                    .map(|descendant| descendant.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Descendant elements of `scope` carrying the attribute `name`
    pub fn with_attr(&self, scope: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.has_attr(*id, name))
            .collect()
    }

    /// First descendant element of `scope` carrying the attribute `name`
    pub fn first_with_attr(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.has_attr(*id, name))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    // ===== Tree mutation =====

    /// Removes a node from its parent; the node stays usable
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Appends `child` as the last child of `parent`, moving it if attached
    ///
    /// Appending a node into its own subtree is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(child).is_none() {
            return;
        }
        if self.is_ancestor_or_self(child, parent) {
            tracing::debug!("Ignoring append of a node into its own subtree");
            return;
        }
        if let Some(mut node) = self.html.tree.get_mut(parent) {
            node.append_id(child);
        }
    }

    /// Replaces every child of `parent` with `children`, in order
    pub fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) {
        for previous in self.children(parent) {
            self.detach(previous);
        }
        for &child in children {
            self.append_child(parent, child);
        }
    }

    /// Copies a subtree of another document into this one, detached
    ///
    /// Returns `None` when `id` does not belong to `source`.
    pub fn import_subtree(&mut self, source: &Document, id: NodeId) -> Option<NodeId> {
        source.node(id).map(|node| self.copy_subtree(node))
    }

    fn copy_subtree(&mut self, node: NodeRef<'_, Node>) -> NodeId {
        let copy = self.html.tree.orphan(node.value().clone()).id();
        for child in node.children() {
            let child_copy = self.copy_subtree(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // ===== Content =====

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.node(id)
            .map(|node| {
                node.descendants()
                    .filter_map(|descendant| descendant.value().as_text())
                    .map(|text| &**text)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Replaces all children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            if let Node::Text(existing) = node.value() {
                existing.text = StrTendril::from(text);
                return;
            }
        }
        if text.is_empty() {
            self.replace_children(id, &[]);
        } else {
            let node = self.create_text(text);
            self.replace_children(id, &[node]);
        }
    }

    // ===== Form state, classes and visibility =====

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.has_attr(id, "checked")
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        if checked {
            self.set_attr(id, "checked", "");
        } else {
            self.remove_attr(id, "checked");
        }
    }

    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    pub fn add_class(&mut self, id: NodeId, class_name: &str) {
        if self.has_class(id, class_name) || !self.is_element(id) {
            return;
        }
        let classes = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class_name)
            }
            _ => class_name.to_string(),
        };
        self.set_attr(id, "class", &classes);
    }

    pub fn remove_class(&mut self, id: NodeId, class_name: &str) {
        let Some(existing) = self.attr(id, "class") else {
            return;
        };
        let remaining: Vec<&str> = existing
            .split_whitespace()
            .filter(|c| *c != class_name)
            .collect();
        let remaining = remaining.join(" ");
        self.set_attr(id, "class", &remaining);
    }

    /// Whether the inline style leaves the element displayed
    pub fn is_visible(&self, id: NodeId) -> bool {
        style_declarations(self.attr(id, "style"))
            .iter()
            .rev()
            .find(|(property, _)| property == "display")
            .map_or(true, |(_, value)| value != "none")
    }

    /// Shows (`display: block`) or hides (`display: none`) an element
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if !self.is_element(id) {
            return;
        }
        let mut declarations: Vec<(String, String)> = style_declarations(self.attr(id, "style"))
            .into_iter()
            .filter(|(property, _)| property != "display")
            .collect();
        let display = if visible { "block" } else { "none" };
        declarations.push(("display".to_string(), display.to_string()));
        let style = declarations
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr(id, "style", &style);
    }
}

fn style_declarations(style: Option<&str>) -> Vec<(String, String)> {
    style
        .unwrap_or_default()
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            if property.is_empty() {
                return None;
            }
            Some((property, value.trim().to_string()))
        })
        .collect()
}
