use crate::{Id, Node};

pub fn assign_node_ids(root: &mut Node) {
    fn walk(node: &mut Node, next: &mut u32) {
        // only assign if currently unset
        if node.id() == Id::INVALID {
            node.set_id(Id(*next));
            *next = next.wrapping_add(1);
        }
        if let Some(children) = node.children_mut() {
            for c in children {
                walk(c, next);
            }
        }
    }

    let mut next = 1;
    walk(root, &mut next);
}

/// Pre-order iterator over the strict descendants of a node (document order).
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

pub fn descendants(node: &Node) -> Descendants<'_> {
    Descendants {
        stack: node.children().iter().rev().collect(),
    }
}

/// First descendant element with the given tag, in document order.
pub fn first_element_named<'a>(node: &'a Node, tag: &str) -> Option<&'a Node> {
    descendants(node).find(|n| n.is_element_named(tag))
}

/// All descendant elements with the given tag, in document order.
pub fn elements_named<'a>(node: &'a Node, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
    descendants(node).filter(move |n| n.is_element_named(tag))
}

/// Concatenated text of every descendant text node, without separators.
pub fn text_content(node: &Node) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text { text, .. } => out.push_str(text),
        Node::Element { children, .. } | Node::Document { children, .. } => {
            for c in children {
                collect_text(c, out);
            }
        }
        Node::Comment { .. } => {}
    }
}

/// Walk every element together with its parent. The callback sees the root's children with
/// the root as parent; the root itself is not visited.
pub fn walk_with_parent<'a>(root: &'a Node, f: &mut impl FnMut(&'a Node, &'a Node)) {
    for child in root.children() {
        f(child, root);
        walk_with_parent(child, f);
    }
}
