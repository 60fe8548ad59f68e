use crate::selectors::Selectors;
use html::traverse::{descendants, elements_named, first_element_named};
use html::{Id, Node};

/// Where an injected control goes, plus the styling it borrows from its neighbour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    /// Parent of the anchor action; the control becomes its child.
    pub parent: Id,
    /// The control is inserted immediately before this action.
    pub before: Id,
    /// `class` of the anchor action.
    pub class: Option<String>,
    /// `class` of the anchor's first `span`, reused for the control's label.
    pub label_class: Option<String>,
}

/// Locate the action control a new control should precede.
///
/// Dynamic-zone rows expose delete, drag and a more-actions menu in their header; plain
/// repeatable rows lack the menu. Rows with fewer than `min_actions` header actions are
/// ineligible whatever the resolver concluded.
///
/// The header is the first `header_tag` element of the row that does not belong to a nested
/// row, so a row without a header of its own never borrows one from its children.
pub fn find_anchor(row: &Node, selectors: &Selectors) -> Option<Anchor> {
    let header = own_header(row, selectors)?;
    let actions: Vec<&Node> = elements_named(header, &selectors.action_tag).collect();
    if actions.len() < selectors.min_actions.max(selectors.anchor_position + 1) {
        return None;
    }
    let anchor = actions[selectors.anchor_position];
    let parent = parent_within(header, anchor.id())?;

    let class = anchor.attr("class").filter(|c| !c.is_empty()).map(str::to_string);
    let label_class = first_element_named(anchor, "span")
        .and_then(|span| span.attr("class"))
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Some(Anchor {
        parent,
        before: anchor.id(),
        class,
        label_class,
    })
}

fn own_header<'a>(row: &'a Node, selectors: &Selectors) -> Option<&'a Node> {
    let mut stack: Vec<&Node> = row.children().iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.is_element_named(&selectors.header_tag) {
            return Some(node);
        }
        if node.is_element_named(&selectors.row_tag) {
            continue;
        }
        stack.extend(node.children().iter().rev());
    }
    None
}

fn parent_within(root: &Node, child: Id) -> Option<Id> {
    if root.children().iter().any(|c| c.id() == child) {
        return Some(root.id());
    }
    descendants(root)
        .find(|n| n.children().iter().any(|c| c.id() == child))
        .map(Node::id)
}
