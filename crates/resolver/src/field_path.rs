use crate::rows::RowSnapshot;
use crate::strategy::{ResolveContext, ResolveStrategy, Resolution};
use core_types::Location;
use document::{get, is_index_segment};
use html::traverse::descendants;

/// Infers the location from the dotted names of the row's form fields.
///
/// Any field inside a zone element carries that element's index somewhere in its own name.
/// Candidates are tried shortest name first (document order breaks ties); within a name the
/// innermost index segment that selects a polymorphic element wins. The last segment is never
/// considered, since it names the field itself.
pub struct FieldPathStrategy;

impl FieldPathStrategy {
    /// Distinct non-empty field names under the row, shortest first.
    pub fn candidate_names<'a>(row: &RowSnapshot<'a>, cx: &ResolveContext<'_>) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        for node in descendants(row.row) {
            let Some(name) = node.attr(&cx.selectors.field_attribute) else {
                continue;
            };
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        // Stable: equal lengths keep document order.
        names.sort_by_key(|name| name.len());
        names
    }

    /// Innermost zone element addressed by a single field name.
    pub fn locate_in_name(name: &str, cx: &ResolveContext<'_>) -> Option<Location> {
        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() < 2 {
            return None;
        }

        for position in (0..segments.len() - 1).rev() {
            let segment = segments[position];
            if !is_index_segment(segment) {
                continue;
            }
            // The document root has no path, so it can never be the zone.
            if position == 0 {
                continue;
            }
            let Ok(index) = segment.parse::<usize>() else {
                continue;
            };
            let element_path = segments[..=position].join(".");
            let is_element =
                get(cx.document, &element_path).is_some_and(|v| cx.schema.is_polymorphic_element(v));
            if is_element {
                return Some(Location::new(segments[..position].join("."), index));
            }
        }
        None
    }
}

impl ResolveStrategy for FieldPathStrategy {
    fn name(&self) -> &'static str {
        "field-path"
    }

    fn resolve(&self, row: &RowSnapshot<'_>, cx: &ResolveContext<'_>) -> Resolution {
        Self::candidate_names(row, cx)
            .into_iter()
            .find_map(|name| Self::locate_in_name(name, cx))
            .map_or(Resolution::Miss, Resolution::Resolved)
    }
}
