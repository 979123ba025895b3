//! Field path resolution within JSON records

use serde_json::Value;

/// Resolves a dotted/bracketed field path within a record
///
/// Supports `a.b.0.c`, `a[0].c` and `a["b c"]`. Numeric segments index
/// arrays; object keys are matched literally. Absent paths, malformed
/// paths and the empty path resolve to `None`.
///
/// # Example
///
/// ```
/// use pagebuster::template::resolve_path;
/// use serde_json::json;
///
/// let record = json!({"author": {"names": ["Ada", "Grace"]}});
/// assert_eq!(resolve_path(&record, "author.names[1]"), Some(&json!("Grace")));
/// assert_eq!(resolve_path(&record, "author.age"), None);
/// ```
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = split_path(path)?;
    if segments.is_empty() {
        return None;
    }

    let mut current = record;
    for segment in &segments {
        current = match current {
            Value::Object(map) => map.get(segment.as_str())?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn split_path(path: &str) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => flush(&mut current, &mut segments),
            '[' => {
                flush(&mut current, &mut segments);
                let quote = match chars.peek() {
                    Some(&q @ ('"' | '\'')) => {
                        chars.next();
                        Some(q)
                    }
                    _ => None,
                };
                let mut segment = String::new();
                loop {
                    match (chars.next()?, quote) {
                        (c, Some(q)) if c == q => {
                            if chars.next()? != ']' {
                                return None;
                            }
                            break;
                        }
                        (']', None) => break,
                        (c, _) => segment.push(c),
                    }
                }
                segments.push(segment.trim().to_string());
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut segments);
    Some(segments)
}

fn flush(current: &mut String, segments: &mut Vec<String>) {
    if !current.is_empty() {
        segments.push(std::mem::take(current));
    }
}

/// Text form of a resolved value
///
/// Strings are used verbatim, `null` becomes empty, other scalars use their
/// JSON form and arrays/objects are serialized as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
