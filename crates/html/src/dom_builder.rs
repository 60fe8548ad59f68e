use crate::traverse::assign_node_ids;
use crate::types::{Id, Node, Token};
use std::sync::Arc;

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Build a numbered tree from a token stream.
///
/// End tags close the nearest open element with the same name and everything opened after
/// it; unmatched end tags are ignored. There are no implied end tags, so fixtures close
/// `li`/`p` explicitly. Ids are assigned in pre-order starting at 1 (the document).
pub fn build_dom(tokens: &[Token]) -> Node {
    let mut open: Vec<Node> = vec![Node::Document {
        id: Id::INVALID,
        doctype: None,
        children: Vec::new(),
    }];

    for token in tokens {
        match token {
            Token::Doctype(doctype) => {
                if let Node::Document { doctype: dt, .. } = &mut open[0] {
                    *dt = Some(doctype.clone());
                }
            }
            Token::Comment(text) => append(
                &mut open,
                Node::Comment {
                    id: Id::INVALID,
                    text: text.clone(),
                },
            ),
            Token::Text(text) => {
                if !text.is_empty() {
                    append(
                        &mut open,
                        Node::Text {
                            id: Id::INVALID,
                            text: text.clone(),
                        },
                    );
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let element = Node::Element {
                    id: Id::INVALID,
                    name: Arc::from(name.as_str()),
                    attributes: attributes
                        .iter()
                        .map(|(k, v)| (Arc::from(k.as_str()), v.clone()))
                        .collect(),
                    children: Vec::new(),
                };
                if *self_closing || is_void_element(name) {
                    append(&mut open, element);
                } else {
                    open.push(element);
                }
            }
            Token::EndTag(name) => {
                let Some(depth) = open.iter().rposition(|n| n.is_element_named(name)) else {
                    continue;
                };
                while open.len() > depth {
                    close_top(&mut open);
                }
            }
        }
    }

    while open.len() > 1 {
        close_top(&mut open);
    }
    let mut root = open.pop().unwrap_or(Node::Document {
        id: Id::INVALID,
        doctype: None,
        children: Vec::new(),
    });
    assign_node_ids(&mut root);
    root
}

fn append(open: &mut [Node], node: Node) {
    if let Some(children) = open.last_mut().and_then(Node::children_mut) {
        children.push(node);
    }
}

fn close_top(open: &mut Vec<Node>) {
    // The document sits at index 0 and is never closed here.
    if open.len() < 2 {
        return;
    }
    if let Some(node) = open.pop() {
        append(open, node);
    }
}
