//! Local matching of item data against filter state

use crate::attributes::{FilterState, ItemData};
use serde_json::Value;

/// Whether an item satisfies every active facet of the state
///
/// For each facet key with at least one wanted value, the item's value
/// under the same key must be an array holding a string equal to one of
/// the wanted values. Keys with no wanted values place no constraint.
/// An item lacking the key, or holding a non-array under it, fails.
///
/// AND-marked keys are matched by their suffixed name like any other key.
pub fn item_matches(data: &ItemData, state: &FilterState) -> bool {
    state
        .iter()
        .filter(|(_, wanted)| !wanted.is_empty())
        .all(|(key, wanted)| facet_matches(data.get(key), wanted))
}

fn facet_matches(value: Option<&Value>, wanted: &[String]) -> bool {
    let Some(Value::Array(present)) = value else {
        return false;
    };

    present
        .iter()
        .filter_map(Value::as_str)
        .any(|item_value| wanted.iter().any(|w| w == item_value))
}
