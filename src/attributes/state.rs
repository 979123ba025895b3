use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Suffix appended to a facet name whose control carries the AND marker
pub const AND_SUFFIX: &str = "__and";

/// Key under which a facet's values are tracked
///
/// An AND facet is a distinct key from its OR counterpart.
pub fn facet_key(name: &str, all: bool) -> String {
    if all {
        format!("{name}{AND_SUFFIX}")
    } else {
        name.to_string()
    }
}

/// Splits a facet key back into its name and AND flag
pub fn split_facet_key(key: &str) -> (&str, bool) {
    match key.strip_suffix(AND_SUFFIX) {
        Some(name) => (name, true),
        None => (key, false),
    }
}

/// Selected values per facet key
///
/// Derived from the checked controls every time it is needed; persisted
/// only as a cache of the last selection. Serializes as a plain JSON
/// object of string arrays whose keys keep the order in which their first
/// control appears in the document. Equality ignores key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(IndexMap<String, Vec<String>>);

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no filter is active
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of facet keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Appends a value to a facet key's sequence
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses persisted state; a stored `null` is treated as no state
    pub fn from_json(raw: &str) -> Result<Option<Self>, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl FromIterator<(String, String)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut state = Self::new();
        for (key, value) in iter {
            state.push(key, value);
        }
        state
    }
}
