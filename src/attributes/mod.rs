//! Filter attribute extraction
//!
//! Reads the declarative data attributes of the host document and turns
//! them into structured filter state:
//! - which controls are active (checked, or marked always active)
//! - which facet name/value each control declares
//! - the JSON data blob embedded in each listing item

mod state;

pub use state::{facet_key, split_facet_key, FilterState, AND_SUFFIX};

use crate::config::AttributeNames;
use crate::dom::{Document, NodeId};
use serde_json::{Map, Value};

/// Searchable attributes of one listing item
pub type ItemData = Map<String, Value>;

/// Controls that currently contribute to the filter state, in document order
///
/// A control is active when it is a checked filter input or carries the
/// always-active marker.
pub fn active_controls(doc: &Document, names: &AttributeNames) -> Vec<NodeId> {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|id| {
            (doc.has_attr(*id, &names.input) && doc.is_checked(*id))
                || doc.has_attr(*id, &names.always_active)
        })
        .collect()
}

/// Finds the facet declaration scoped to a control
///
/// The declaration is the first element carrying the facet name attribute
/// inside the control's parent.
pub fn find_declaration(doc: &Document, control: NodeId, names: &AttributeNames) -> Option<NodeId> {
    let scope = doc.parent(control)?;
    doc.first_with_attr(scope, &names.name)
}

/// Builds filter state from a set of active controls
///
/// Controls without a facet declaration are logged and skipped. Values are
/// appended in control order; duplicates are kept.
pub fn extract_filter_state(
    doc: &Document,
    controls: &[NodeId],
    names: &AttributeNames,
) -> FilterState {
    let mut state = FilterState::new();

    for &control in controls {
        let Some(declaration) = find_declaration(doc, control, names) else {
            tracing::warn!(
                "Filter name declaration missing for control <{}>, skipping",
                doc.tag_name(control).unwrap_or("?")
            );
            continue;
        };

        let name = doc.attr(declaration, &names.name).unwrap_or_default();
        let value = doc.attr(declaration, &names.value).unwrap_or_default();
        let all = doc.has_attr(control, &names.and_marker);

        state.push(facet_key(name, all), value);
    }

    state
}

/// Reads the JSON data blob of a listing item
///
/// The blob is taken from the item itself or its first descendant carrying
/// the data attribute. Missing or malformed blobs yield empty data, which
/// no active filter matches.
pub fn parse_item_data(doc: &Document, item: NodeId, names: &AttributeNames) -> ItemData {
    let carrier = if doc.has_attr(item, &names.data) {
        Some(item)
    } else {
        doc.first_with_attr(item, &names.data)
    };
    let Some(raw) = carrier.and_then(|node| doc.attr(node, &names.data)) else {
        return ItemData::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(data)) => data,
        Ok(_) => {
            tracing::warn!("Item data is not a JSON object: {}", raw);
            ItemData::new()
        }
        Err(e) => {
            tracing::warn!("Could not parse item data {}: {}", raw, e);
            ItemData::new()
        }
    }
}
