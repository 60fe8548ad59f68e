use serde_json::Value;

/// Whether a path segment addresses an array slot (`^\d+$`).
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Append a segment to a dotted path; the empty path is the root.
pub fn join_path(base: &str, segment: impl std::fmt::Display) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}.{segment}")
    }
}

/// Resolve a dotted path against the document.
///
/// Index segments require an array at that point and key segments require an object;
/// a missing node, out-of-range index or shape mismatch yields `None`. The empty path
/// resolves to the root.
pub fn get<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(document);
    }

    let mut current = document;
    for segment in path.split('.') {
        current = if is_index_segment(segment) {
            let index: usize = segment.parse().ok()?;
            current.as_array()?.get(index)?
        } else {
            current.as_object()?.get(segment)?
        };
    }
    Some(current)
}

/// Mutable counterpart of [`get`], with the same addressing rules.
pub fn get_mut<'a>(document: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    if path.is_empty() {
        return Some(document);
    }

    let mut current = document;
    for segment in path.split('.') {
        current = if is_index_segment(segment) {
            let index: usize = segment.parse().ok()?;
            current.as_array_mut()?.get_mut(index)?
        } else {
            current.as_object_mut()?.get_mut(segment)?
        };
    }
    Some(current)
}

/// Deep copy of a subtree. The copy shares no structure with the source.
pub fn clone_value(value: &Value) -> Value {
    value.clone()
}
