//! Live mirror of the host's rendered edit view.
//!
//! The host describes every change as a `DomPatch` batch; the injector applies its own
//! insertions and removals through the same operations. While observed, the store records
//! child-list changes to connected nodes, which is what drives reconciliation.

use core_types::DomVersion;
use html::{DomDiffError, DomPatch, Id, Node, PatchKey};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomPatchError {
    #[error("patch key {0:?} is reserved")]
    InvalidKey(PatchKey),
    #[error("patch key {0:?} was already allocated")]
    DuplicateKey(PatchKey),
    #[error("patch key {0:?} is not live")]
    MissingKey(PatchKey),
    #[error("node {0:?} has the wrong kind for this patch")]
    WrongNodeKind(PatchKey),
    #[error("node {0:?} cannot take this parent relation")]
    InvalidParent(PatchKey),
    #[error("{before:?} is not a child of {parent:?}")]
    InvalidSibling { parent: PatchKey, before: PatchKey },
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: PatchKey, child: PatchKey },
    #[error("clear is only valid as the first patch of a batch")]
    MidBatchClear,
    #[error("no document root")]
    MissingRoot,
    #[error("no free keys left for injected nodes")]
    KeySpaceExhausted,
    #[error(transparent)]
    Stream(#[from] DomDiffError),
}

/// One observed child-list change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationRecord {
    ChildAdded { parent: PatchKey, child: PatchKey },
    ChildRemoved { parent: PatchKey, child: PatchKey },
    Cleared,
}

pub struct DomStore {
    version: DomVersion,
    arena: DomArena,
    root: Option<PatchKey>,
    observing: bool,
    records: Vec<MutationRecord>,
    next_owned_key: u32,
}

impl DomStore {
    pub fn new() -> Self {
        Self {
            version: DomVersion::INITIAL,
            arena: DomArena::new(),
            root: None,
            observing: false,
            records: Vec::new(),
            next_owned_key: u32::MAX,
        }
    }

    pub fn version(&self) -> DomVersion {
        self.version
    }

    pub fn root(&self) -> Option<PatchKey> {
        self.root
    }

    /// Start recording structural changes.
    pub fn observe(&mut self) {
        self.observing = true;
    }

    /// Stop recording and drop anything not yet taken.
    pub fn disconnect(&mut self) {
        self.observing = false;
        self.records.clear();
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    /// Apply one batch in order. Patches before a failing one stay applied.
    pub fn apply(&mut self, patches: &[DomPatch]) -> Result<(), DomPatchError> {
        for (i, patch) in patches.iter().enumerate() {
            if i > 0 && matches!(patch, DomPatch::Clear) {
                return Err(DomPatchError::MidBatchClear);
            }
            self.apply_one(patch)?;
        }
        self.version = self.version.next();
        Ok(())
    }

    /// Fresh key for a node the injector creates. Keys count down from the top of the key
    /// space, skipping any the host already used.
    pub fn allocate_key(&mut self) -> Result<PatchKey, DomPatchError> {
        loop {
            if self.next_owned_key == PatchKey::INVALID.0 {
                return Err(DomPatchError::KeySpaceExhausted);
            }
            let key = PatchKey(self.next_owned_key);
            self.next_owned_key -= 1;
            if !self.arena.allocated.contains(&key) {
                return Ok(key);
            }
        }
    }

    pub fn contains(&self, key: PatchKey) -> bool {
        self.arena.live.contains_key(&key)
    }

    pub fn parent(&self, key: PatchKey) -> Option<PatchKey> {
        self.arena.record(key).and_then(|r| r.parent)
    }

    pub fn children(&self, key: PatchKey) -> &[PatchKey] {
        self.arena
            .record(key)
            .map(|r| r.children.as_slice())
            .unwrap_or_default()
    }

    pub fn attribute(&self, key: PatchKey, name: &str) -> Option<&str> {
        match &self.arena.record(key)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_deref().unwrap_or("")),
            _ => None,
        }
    }

    /// Connected elements carrying `name`, in document order.
    pub fn elements_with_attribute(&self, name: &str) -> Vec<PatchKey> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if self.attribute(key, name).is_some() {
                out.push(key);
            }
            stack.extend(self.children(key).iter().rev().copied());
        }
        out
    }

    /// `key` itself or its nearest ancestor carrying `name`.
    pub fn closest_with_attribute(&self, key: PatchKey, name: &str) -> Option<PatchKey> {
        let mut current = self.contains(key).then_some(key);
        while let Some(k) = current {
            if self.attribute(k, name).is_some() {
                return Some(k);
            }
            current = self.parent(k);
        }
        None
    }

    /// Whether `key` is reachable from the document root.
    pub fn is_connected(&self, key: PatchKey) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let mut current = self.contains(key).then_some(key);
        while let Some(k) = current {
            if k == root {
                return true;
            }
            current = self.parent(k);
        }
        false
    }

    /// Immutable snapshot of the connected tree. Node ids equal patch keys.
    pub fn materialize(&self) -> Result<Node, DomPatchError> {
        let root = self.root.ok_or(DomPatchError::MissingRoot)?;
        self.arena.materialize(root)
    }

    /// Host keys stay retired once used. Keys handed out by `allocate_key` are never
    /// handed out again, so they are only tracked while live.
    fn create(&mut self, key: PatchKey, kind: NodeKind) -> Result<(), DomPatchError> {
        ensure_key(key)?;
        let retire = key.0 <= self.next_owned_key;
        self.arena.insert_node(key, kind, retire)
    }

    #[cfg(test)]
    pub(crate) fn arena_footprint(&self) -> (usize, usize, usize) {
        (
            self.arena.nodes.len(),
            self.arena.allocated.len(),
            self.arena.live.len(),
        )
    }

    fn record(&mut self, record: MutationRecord) {
        if self.observing {
            self.records.push(record);
        }
    }

    fn apply_one(&mut self, patch: &DomPatch) -> Result<(), DomPatchError> {
        match patch {
            DomPatch::Clear => {
                if self.root.is_some() {
                    self.record(MutationRecord::Cleared);
                }
                self.arena = DomArena::new();
                self.root = None;
            }
            DomPatch::CreateDocument { key, doctype } => {
                self.create(
                    *key,
                    NodeKind::Document {
                        doctype: doctype.clone(),
                    },
                )?;
                self.root = Some(*key);
            }
            DomPatch::CreateElement {
                key,
                name,
                attributes,
            } => {
                self.create(
                    *key,
                    NodeKind::Element {
                        name: Arc::clone(name),
                        attributes: attributes.clone(),
                    },
                )?;
            }
            DomPatch::CreateText { key, text } => {
                self.create(*key, NodeKind::Text { text: text.clone() })?;
            }
            DomPatch::CreateComment { key, text } => {
                self.create(*key, NodeKind::Comment { text: text.clone() })?;
            }
            DomPatch::AppendChild { parent, child } => {
                self.arena.append_child(*parent, *child)?;
                if self.is_connected(*parent) {
                    self.record(MutationRecord::ChildAdded {
                        parent: *parent,
                        child: *child,
                    });
                }
            }
            DomPatch::InsertBefore {
                parent,
                child,
                before,
            } => {
                self.arena.insert_before(*parent, *child, *before)?;
                if self.is_connected(*parent) {
                    self.record(MutationRecord::ChildAdded {
                        parent: *parent,
                        child: *child,
                    });
                }
            }
            DomPatch::RemoveNode { key } => {
                let parent = self.parent(*key);
                let was_connected = parent.is_some_and(|p| self.is_connected(p));
                if self.root == Some(*key) {
                    self.root = None;
                }
                self.arena.remove_subtree(*key)?;
                if let Some(parent) = parent
                    && was_connected
                {
                    self.record(MutationRecord::ChildRemoved {
                        parent,
                        child: *key,
                    });
                }
            }
            DomPatch::SetAttributes { key, attributes } => {
                self.arena.set_attributes(*key, attributes)?;
            }
            DomPatch::SetText { key, text } => {
                self.arena.set_text(*key, text)?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl Default for DomStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_key(key: PatchKey) -> Result<(), DomPatchError> {
    if key == PatchKey::INVALID {
        return Err(DomPatchError::InvalidKey(key));
    }
    Ok(())
}

struct DomArena {
    nodes: Vec<NodeRecord>,
    /// Slots in `nodes` whose record was removed.
    free: Vec<usize>,
    live: HashMap<PatchKey, usize>,
    allocated: HashSet<PatchKey>,
}

impl DomArena {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            live: HashMap::new(),
            allocated: HashSet::new(),
        }
    }

    fn index(&self, key: PatchKey) -> Result<usize, DomPatchError> {
        ensure_key(key)?;
        self.live
            .get(&key)
            .copied()
            .ok_or(DomPatchError::MissingKey(key))
    }

    fn record(&self, key: PatchKey) -> Option<&NodeRecord> {
        self.live.get(&key).map(|&i| &self.nodes[i])
    }

    fn insert_node(
        &mut self,
        key: PatchKey,
        kind: NodeKind,
        retire: bool,
    ) -> Result<(), DomPatchError> {
        if self.live.contains_key(&key) || self.allocated.contains(&key) {
            return Err(DomPatchError::DuplicateKey(key));
        }
        if retire {
            self.allocated.insert(key);
        }
        let record = NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.nodes[index] = record;
                index
            }
            None => {
                self.nodes.push(record);
                self.nodes.len() - 1
            }
        };
        self.live.insert(key, index);
        Ok(())
    }

    /// Shared checks for attaching `child` under `parent`; returns both indices.
    fn check_attach(
        &self,
        parent: PatchKey,
        child: PatchKey,
    ) -> Result<(usize, usize), DomPatchError> {
        let parent_index = self.index(parent)?;
        let child_index = self.index(child)?;
        if parent == child || self.is_descendant(child, parent) {
            return Err(DomPatchError::CycleDetected { parent, child });
        }
        if !self.nodes[parent_index].allows_children() {
            return Err(DomPatchError::InvalidParent(parent));
        }
        if self.nodes[child_index].parent.is_some() {
            return Err(DomPatchError::InvalidParent(child));
        }
        Ok((parent_index, child_index))
    }

    fn append_child(&mut self, parent: PatchKey, child: PatchKey) -> Result<(), DomPatchError> {
        let (parent_index, child_index) = self.check_attach(parent, child)?;
        self.nodes[parent_index].children.push(child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: PatchKey,
        child: PatchKey,
        before: PatchKey,
    ) -> Result<(), DomPatchError> {
        let (parent_index, child_index) = self.check_attach(parent, child)?;
        let before_index = self.index(before)?;
        if self.nodes[before_index].parent != Some(parent) {
            return Err(DomPatchError::InvalidSibling { parent, before });
        }
        let siblings = &mut self.nodes[parent_index].children;
        let pos = siblings
            .iter()
            .position(|k| *k == before)
            .ok_or(DomPatchError::InvalidSibling { parent, before })?;
        siblings.insert(pos, child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    fn remove_subtree(&mut self, key: PatchKey) -> Result<(), DomPatchError> {
        let index = self.index(key)?;
        if let Some(parent) = self.nodes[index].parent.take()
            && let Some(&parent_index) = self.live.get(&parent)
        {
            self.nodes[parent_index].children.retain(|k| *k != key);
        }
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(i) = self.live.remove(&current) {
                stack.extend(self.nodes[i].children.drain(..));
                self.nodes[i].parent = None;
                self.free.push(i);
            }
        }
        Ok(())
    }

    fn set_attributes(
        &mut self,
        key: PatchKey,
        attributes: &[(Arc<str>, Option<String>)],
    ) -> Result<(), DomPatchError> {
        let index = self.index(key)?;
        match &mut self.nodes[index].kind {
            NodeKind::Element {
                attributes: attrs, ..
            } => {
                attrs.clear();
                attrs.extend(attributes.iter().cloned());
                Ok(())
            }
            _ => Err(DomPatchError::WrongNodeKind(key)),
        }
    }

    fn set_text(&mut self, key: PatchKey, text: &str) -> Result<(), DomPatchError> {
        let index = self.index(key)?;
        match &mut self.nodes[index].kind {
            NodeKind::Text { text: existing } => {
                existing.clear();
                existing.push_str(text);
                Ok(())
            }
            _ => Err(DomPatchError::WrongNodeKind(key)),
        }
    }

    fn is_descendant(&self, ancestor: PatchKey, maybe_descendant: PatchKey) -> bool {
        let Some(record) = self.record(ancestor) else {
            return false;
        };
        let mut stack: Vec<PatchKey> = record.children.clone();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            if let Some(r) = self.record(current) {
                stack.extend(r.children.iter().copied());
            }
        }
        false
    }

    fn materialize(&self, key: PatchKey) -> Result<Node, DomPatchError> {
        let index = self.index(key)?;
        let record = &self.nodes[index];
        let children = record
            .children
            .iter()
            .map(|child| self.materialize(*child))
            .collect::<Result<Vec<_>, _>>()?;
        let id = Id(key.0);
        let node = match &record.kind {
            NodeKind::Document { doctype } => Node::Document {
                id,
                doctype: doctype.clone(),
                children,
            },
            NodeKind::Element { name, attributes } => Node::Element {
                id,
                name: Arc::clone(name),
                attributes: attributes.clone(),
                children,
            },
            NodeKind::Text { text } => Node::Text {
                id,
                text: text.clone(),
            },
            NodeKind::Comment { text } => Node::Comment {
                id,
                text: text.clone(),
            },
        };
        Ok(node)
    }
}

struct NodeRecord {
    kind: NodeKind,
    parent: Option<PatchKey>,
    children: Vec<PatchKey>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Document { .. } | NodeKind::Element { .. }
        )
    }
}

enum NodeKind {
    Document {
        doctype: Option<String>,
    },
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Option<String>)>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::dom_snapshot::{DomSnapshot, DomSnapshotOptions};
    use html::{diff_from_empty, parse_fragment};

    fn store_from(markup: &str) -> DomStore {
        let mut store = DomStore::new();
        let patches = diff_from_empty(&parse_fragment(markup)).expect("stream");
        store.apply(&patches).expect("apply");
        store
    }

    fn render(store: &DomStore) -> String {
        let node = store.materialize().expect("root");
        DomSnapshot::new(&node, DomSnapshotOptions::default()).render()
    }

    fn key_of(store: &DomStore, attr: &str) -> PatchKey {
        store.elements_with_attribute(attr)[0]
    }

    #[test]
    fn materialize_round_trips_the_parsed_tree() {
        let markup = r#"<ol><li id="a">one</li><li id="b">two</li></ol>"#;
        let store = store_from(markup);
        assert_eq!(store.materialize().expect("root"), parse_fragment(markup));
        assert_eq!(store.version(), DomVersion(1));
    }

    #[test]
    fn records_only_while_observing() {
        let mut store = store_from(r#"<ol id="list"></ol>"#);
        let list = key_of(&store, "id");
        store
            .apply(&[
                DomPatch::CreateElement {
                    key: PatchKey(100),
                    name: Arc::from("li"),
                    attributes: Vec::new(),
                },
                DomPatch::AppendChild {
                    parent: list,
                    child: PatchKey(100),
                },
            ])
            .expect("apply");
        assert!(store.take_records().is_empty());

        store.observe();
        store
            .apply(&[DomPatch::RemoveNode { key: PatchKey(100) }])
            .expect("apply");
        assert_eq!(
            store.take_records(),
            vec![MutationRecord::ChildRemoved {
                parent: list,
                child: PatchKey(100)
            }]
        );
        assert!(store.take_records().is_empty());
    }

    #[test]
    fn detached_subtrees_are_not_observed_until_attached() {
        let mut store = store_from(r#"<ol id="list"></ol>"#);
        let list = key_of(&store, "id");
        store.observe();
        store
            .apply(&[
                DomPatch::CreateElement {
                    key: PatchKey(100),
                    name: Arc::from("li"),
                    attributes: Vec::new(),
                },
                DomPatch::CreateText {
                    key: PatchKey(101),
                    text: "x".to_string(),
                },
                DomPatch::AppendChild {
                    parent: PatchKey(100),
                    child: PatchKey(101),
                },
                DomPatch::AppendChild {
                    parent: list,
                    child: PatchKey(100),
                },
            ])
            .expect("apply");
        assert_eq!(
            store.take_records(),
            vec![MutationRecord::ChildAdded {
                parent: list,
                child: PatchKey(100)
            }]
        );
    }

    #[test]
    fn disconnect_discards_pending_records() {
        let mut store = store_from("<p>x</p>");
        store.observe();
        store.apply(&[DomPatch::Clear]).expect("apply");
        store.disconnect();
        assert!(store.take_records().is_empty());
        assert_eq!(store.materialize(), Err(DomPatchError::MissingRoot));
    }

    #[test]
    fn owned_keys_count_down_and_skip_host_keys() {
        let mut store = DomStore::new();
        store
            .apply(&[DomPatch::CreateDocument {
                key: PatchKey(u32::MAX - 1),
                doctype: None,
            }])
            .expect("apply");
        assert_eq!(store.allocate_key(), Ok(PatchKey(u32::MAX)));
        assert_eq!(store.allocate_key(), Ok(PatchKey(u32::MAX - 2)));
    }

    #[test]
    fn rejects_protocol_violations() {
        let mut store = store_from(r#"<ol id="list"><li id="row">x</li></ol>"#);
        let list = key_of(&store, "id");
        let row = store.children(list)[0];
        let text = store.children(row)[0];

        assert_eq!(
            store.apply(&[DomPatch::RemoveNode { key: PatchKey(999) }]),
            Err(DomPatchError::MissingKey(PatchKey(999)))
        );
        assert_eq!(
            store.apply(&[DomPatch::AppendChild {
                parent: row,
                child: list
            }]),
            Err(DomPatchError::CycleDetected {
                parent: row,
                child: list
            })
        );
        assert_eq!(
            store.apply(&[DomPatch::SetText {
                key: list,
                text: String::new()
            }]),
            Err(DomPatchError::WrongNodeKind(list))
        );
        assert_eq!(
            store.apply(&[
                DomPatch::SetText {
                    key: text,
                    text: "y".to_string()
                },
                DomPatch::Clear
            ]),
            Err(DomPatchError::MidBatchClear)
        );
        assert_eq!(
            store.apply(&[DomPatch::CreateText {
                key: row,
                text: String::new()
            }]),
            Err(DomPatchError::DuplicateKey(row))
        );
    }

    #[test]
    fn removed_subtrees_retire_all_keys() {
        let mut store = store_from(r#"<ol id="list"><li><b>x</b></li></ol>"#);
        let list = key_of(&store, "id");
        let row = store.children(list)[0];
        let bold = store.children(row)[0];
        store
            .apply(&[DomPatch::RemoveNode { key: row }])
            .expect("apply");
        assert!(!store.contains(row));
        assert!(!store.contains(bold));
        assert_eq!(render(&store), "#document\n  <ol id=\"list\">");
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut store = store_from(r#"<ol id="list"></ol>"#);
        let list = key_of(&store, "id");
        let before = store.arena_footprint();
        for _ in 0..50 {
            let key = store.allocate_key().expect("key");
            store
                .apply(&[
                    DomPatch::CreateElement {
                        key,
                        name: Arc::from("li"),
                        attributes: Vec::new(),
                    },
                    DomPatch::AppendChild {
                        parent: list,
                        child: key,
                    },
                ])
                .expect("insert");
            store
                .apply(&[DomPatch::RemoveNode { key }])
                .expect("remove");
        }
        let (slots, retired, live) = store.arena_footprint();
        assert_eq!(live, before.2);
        assert_eq!(retired, before.1);
        assert_eq!(slots, before.0 + 1);
    }

    #[test]
    fn removed_host_keys_stay_retired() {
        let mut store = store_from(r#"<ol id="list"><li>x</li></ol>"#);
        let list = key_of(&store, "id");
        let row = store.children(list)[0];
        store
            .apply(&[DomPatch::RemoveNode { key: row }])
            .expect("remove");
        assert_eq!(
            store.apply(&[DomPatch::CreateElement {
                key: row,
                name: Arc::from("li"),
                attributes: Vec::new(),
            }]),
            Err(DomPatchError::DuplicateKey(row))
        );
    }

    #[test]
    fn closest_walks_up_to_the_marked_ancestor() {
        let store = store_from(r#"<div><button data-mark="true"><span>go</span></button></div>"#);
        let button = key_of(&store, "data-mark");
        let span = store.children(button)[0];
        let text = store.children(span)[0];
        assert_eq!(store.closest_with_attribute(text, "data-mark"), Some(button));
        let div = store.parent(button).expect("parent");
        assert_eq!(store.closest_with_attribute(div, "data-mark"), None);
        assert!(store.is_connected(text));
    }
}
