//! Structural mutation protocol for the live rendered tree.
//!
//! The host's rendering layer describes every change to the edit view as an ordered batch of
//! patches; the injector applies its own control insertions and removals through the same
//! operations.
//!
//! Invariants:
//! - Patches are applied in order.
//! - References must point to live keys at the time they are used (except the `key` of a
//!   create operation, which must be fresh).
//! - A reset batch starts with `DomPatch::Clear`; a mid-batch `Clear` is a protocol violation.
//! - Element names are canonical ASCII-lowercase; attribute lookups ignore ASCII case.
//! - `PatchKey::INVALID` never appears in a batch.
//! - Operations must not create cycles; a node has at most one parent.

use crate::types::Id;
use std::sync::Arc;

/// Opaque key for stable node identity within the live tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchKey(pub u32);

impl PatchKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: PatchKey = PatchKey(0);

    pub fn from_id(id: Id) -> Self {
        PatchKey(id.0)
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomPatch {
    /// Drop every node; only valid as the first patch of a batch.
    Clear,
    CreateDocument {
        key: PatchKey,
        doctype: Option<String>,
    },
    CreateElement {
        key: PatchKey,
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Option<String>)>,
    },
    CreateText {
        key: PatchKey,
        text: String,
    },
    CreateComment {
        key: PatchKey,
        text: String,
    },
    AppendChild {
        parent: PatchKey,
        child: PatchKey,
    },
    InsertBefore {
        parent: PatchKey,
        child: PatchKey,
        before: PatchKey,
    },
    /// Detach a node and drop its whole subtree. Keys in the subtree stay retired.
    RemoveNode {
        key: PatchKey,
    },
    /// Replace all attributes on an element node.
    SetAttributes {
        key: PatchKey,
        attributes: Vec<(Arc<str>, Option<String>)>,
    },
    SetText {
        key: PatchKey,
        text: String,
    },
}
