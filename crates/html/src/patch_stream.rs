//! Patch streams that materialize a numbered tree into a live store.
//!
//! Nodes are keyed by their `Id` (`PatchKey == Id`). Output is pre-order: each node is
//! created, then attached, then its children follow.

use crate::dom_patch::{DomPatch, PatchKey};
use crate::types::{Id, Node};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomDiffError {
    #[error("node carries an unassigned id")]
    InvalidKey(Id),
    #[error("patch stream root must be a document node")]
    InvalidRoot,
}

/// Full reset stream: `Clear` followed by the creation of `next`.
pub fn diff_from_empty(next: &Node) -> Result<Vec<DomPatch>, DomDiffError> {
    if !matches!(next, Node::Document { .. }) {
        return Err(DomDiffError::InvalidRoot);
    }
    let mut patches = vec![DomPatch::Clear];
    emit_create_subtree(next, None, None, &mut patches)?;
    Ok(patches)
}

/// Stream that creates `node` and attaches it under `parent`, before `before` when given.
pub fn insert_subtree(
    node: &Node,
    parent: PatchKey,
    before: Option<PatchKey>,
) -> Result<Vec<DomPatch>, DomDiffError> {
    let mut patches = Vec::new();
    emit_create_subtree(node, Some(parent), before, &mut patches)?;
    Ok(patches)
}

fn emit_create_node(node: &Node, key: PatchKey, patches: &mut Vec<DomPatch>) {
    let patch = match node {
        Node::Document { doctype, .. } => DomPatch::CreateDocument {
            key,
            doctype: doctype.clone(),
        },
        Node::Element {
            name, attributes, ..
        } => DomPatch::CreateElement {
            key,
            name: Arc::clone(name),
            attributes: attributes.clone(),
        },
        Node::Text { text, .. } => DomPatch::CreateText {
            key,
            text: text.clone(),
        },
        Node::Comment { text, .. } => DomPatch::CreateComment {
            key,
            text: text.clone(),
        },
    };
    patches.push(patch);
}

fn emit_create_subtree(
    node: &Node,
    parent: Option<PatchKey>,
    before: Option<PatchKey>,
    patches: &mut Vec<DomPatch>,
) -> Result<(), DomDiffError> {
    let key = patch_key(node.id())?;
    emit_create_node(node, key, patches);
    match (parent, before) {
        (Some(parent), Some(before)) => patches.push(DomPatch::InsertBefore {
            parent,
            child: key,
            before,
        }),
        (Some(parent), None) => patches.push(DomPatch::AppendChild { parent, child: key }),
        (None, _) => {}
    }
    for child in node.children() {
        emit_create_subtree(child, Some(key), None, patches)?;
    }
    Ok(())
}

fn patch_key(id: Id) -> Result<PatchKey, DomDiffError> {
    if id == Id::INVALID {
        return Err(DomDiffError::InvalidKey(id));
    }
    Ok(PatchKey::from_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_dom, tokenize};

    #[test]
    fn reset_stream_is_preorder_create_then_attach() {
        let dom = build_dom(&tokenize("<ol><li>a</li></ol>"));
        let patches = diff_from_empty(&dom).expect("stream");
        assert_eq!(patches[0], DomPatch::Clear);
        assert!(matches!(patches[1], DomPatch::CreateDocument { key: PatchKey(1), .. }));
        assert!(matches!(patches[2], DomPatch::CreateElement { key: PatchKey(2), .. }));
        assert_eq!(
            patches[3],
            DomPatch::AppendChild {
                parent: PatchKey(1),
                child: PatchKey(2)
            }
        );
        assert_eq!(patches.len(), 8);
    }

    #[test]
    fn rejects_non_document_roots_and_unnumbered_nodes() {
        let text = Node::Text {
            id: Id(3),
            text: "x".to_string(),
        };
        assert_eq!(diff_from_empty(&text), Err(DomDiffError::InvalidRoot));
        let unnumbered = Node::Text {
            id: Id::INVALID,
            text: "x".to_string(),
        };
        assert_eq!(
            insert_subtree(&unnumbered, PatchKey(1), None),
            Err(DomDiffError::InvalidKey(Id::INVALID))
        );
    }

    #[test]
    fn inserted_subtree_attaches_before_sibling() {
        let dom = build_dom(&tokenize("<li>x</li>"));
        let li = &dom.children()[0];
        let patches = insert_subtree(li, PatchKey(40), Some(PatchKey(41))).expect("stream");
        assert_eq!(
            patches[1],
            DomPatch::InsertBefore {
                parent: PatchKey(40),
                child: PatchKey::from_id(li.id()),
                before: PatchKey(41)
            }
        );
    }
}
