use crate::dom_store::{DomPatchError, DomStore};
use html::{DomPatch, Id, Node, PatchKey, insert_subtree};
use resolver::Anchor;
use std::sync::Arc;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const COPY_ICON_PATH: &str = "M27 4H11a1 1 0 0 0-1 1v5H5a1 1 0 0 0-1 1v16a1 1 0 0 0 1 1h16a1 1 0 0 0 1-1v-5h5a1 1 0 0 0 1-1V5a1 1 0 0 0-1-1m-1 16h-4v-9a1 1 0 0 0-1-1h-9V6h14z";

type Attributes = Vec<(Arc<str>, Option<String>)>;

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (Arc::from(*k), Some((*v).to_string())))
        .collect()
}

fn element(
    store: &mut DomStore,
    name: &str,
    attributes: Attributes,
    children: Vec<Node>,
) -> Result<Node, DomPatchError> {
    Ok(Node::Element {
        id: Id(store.allocate_key()?.0),
        name: Arc::from(name),
        attributes,
        children,
    })
}

/// A built control: its root key plus the patches that insert it before the anchor.
#[derive(Debug)]
pub struct ControlPatches {
    pub key: PatchKey,
    pub patches: Vec<DomPatch>,
}

/// Build the duplicate control for one anchor.
///
/// The control mimics the anchor: same button class, and its label span reuses the class of
/// the anchor's own first span. Every node gets an injector-owned key.
pub fn build_control(
    store: &mut DomStore,
    anchor: &Anchor,
    marker_attribute: &str,
    label: &str,
) -> Result<ControlPatches, DomPatchError> {
    let path = element(store, "path", attrs(&[("d", COPY_ICON_PATH)]), Vec::new())?;
    let icon = element(
        store,
        "svg",
        attrs(&[
            ("xmlns", SVG_NAMESPACE),
            ("viewBox", "0 0 32 32"),
            ("width", "16"),
            ("height", "16"),
            ("fill", "currentColor"),
            ("aria-hidden", "true"),
            ("focusable", "false"),
        ]),
        vec![path],
    )?;

    let text = Node::Text {
        id: Id(store.allocate_key()?.0),
        text: label.to_string(),
    };
    let label_attrs = match &anchor.label_class {
        Some(class) => attrs(&[("class", class.as_str())]),
        None => Vec::new(),
    };
    let span = element(store, "span", label_attrs, vec![text])?;

    let mut button_attrs = attrs(&[("type", "button")]);
    if let Some(class) = &anchor.class {
        button_attrs.extend(attrs(&[("class", class.as_str())]));
    }
    button_attrs.extend(attrs(&[
        (marker_attribute, "true"),
        ("aria-label", label),
        ("title", label),
        ("data-state", "closed"),
    ]));
    let button = element(store, "button", button_attrs, vec![icon, span])?;

    let key = PatchKey::from_id(button.id());
    let patches = insert_subtree(
        &button,
        PatchKey::from_id(anchor.parent),
        Some(PatchKey::from_id(anchor.before)),
    )?;
    Ok(ControlPatches { key, patches })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(class: Option<&str>, label_class: Option<&str>) -> Anchor {
        Anchor {
            parent: Id(10),
            before: Id(11),
            class: class.map(str::to_string),
            label_class: label_class.map(str::to_string),
        }
    }

    fn created_names(patches: &[DomPatch]) -> Vec<String> {
        patches
            .iter()
            .filter_map(|p| match p {
                DomPatch::CreateElement { name, .. } => Some(name.to_string()),
                DomPatch::CreateText { text, .. } => Some(format!("#{text}")),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn control_is_button_with_icon_and_label() {
        let mut store = DomStore::new();
        let control = build_control(
            &mut store,
            &anchor(Some("cm-action"), Some("vh")),
            "data-dup",
            "Duplicate component",
        )
        .expect("control");

        assert_eq!(
            created_names(&control.patches),
            vec!["button", "svg", "path", "span", "#Duplicate component"]
        );
        assert_eq!(
            control.patches[1],
            DomPatch::InsertBefore {
                parent: PatchKey(10),
                child: control.key,
                before: PatchKey(11),
            }
        );
        let DomPatch::CreateElement { attributes, .. } = &control.patches[0] else {
            panic!("button first");
        };
        let names: Vec<&str> = attributes.iter().map(|(k, _)| &**k).collect();
        assert_eq!(
            names,
            vec!["type", "class", "data-dup", "aria-label", "title", "data-state"]
        );
    }

    #[test]
    fn control_keys_come_from_the_top_of_the_key_space() {
        let mut store = DomStore::new();
        let control = build_control(&mut store, &anchor(None, None), "m", "x").expect("control");
        assert!(control.key.0 > u32::MAX - 8);
        let DomPatch::CreateElement { attributes, .. } = &control.patches[0] else {
            panic!("button first");
        };
        assert!(attributes.iter().all(|(k, _)| &**k != "class"));
    }

    #[test]
    fn icon_keeps_the_svg_attribute_case() {
        let mut store = DomStore::new();
        let control = build_control(&mut store, &anchor(None, None), "m", "x").expect("control");
        let icon = control
            .patches
            .iter()
            .find_map(|p| match p {
                DomPatch::CreateElement {
                    name, attributes, ..
                } if &**name == "svg" => Some(attributes),
                _ => None,
            })
            .expect("svg created");
        assert!(icon.contains(&(Arc::from("viewBox"), Some("0 0 32 32".to_string()))));
    }
}
