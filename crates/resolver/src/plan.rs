use crate::anchor::{Anchor, find_anchor};
use crate::rows::rendered_rows;
use crate::strategy::{LocationResolver, ResolveContext};
use core_types::Location;
use html::{Id, Node};

/// One control a pass should install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedControl {
    pub row: Id,
    pub location: Location,
    pub anchor: Anchor,
}

/// Decide, for one tree snapshot and one document snapshot, which rows get a control.
///
/// A row qualifies only when the resolver finds a location and the anchor locator agrees the
/// row looks like a dynamic-zone item. Output follows document order.
pub fn plan_pass(
    root: &Node,
    cx: &ResolveContext<'_>,
    resolver: &LocationResolver,
) -> Vec<PlannedControl> {
    rendered_rows(root, cx.selectors)
        .iter()
        .filter_map(|row| {
            let location = resolver.resolve(row, cx).into_location()?;
            let Some(anchor) = find_anchor(row.row, cx.selectors) else {
                log::trace!(
                    target: "dz.resolve",
                    "row {:?} resolved to {location} but has no anchor",
                    row.row.id()
                );
                return None;
            };
            Some(PlannedControl {
                row: row.row.id(),
                location,
                anchor,
            })
        })
        .collect()
}
