use serde::Deserialize;

/// Structural conventions of the host's rendered edit view.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Selectors {
    /// Ordered list that hosts repeatable rows (`ol`).
    pub list_tag: String,
    /// A rendered row is a `row_tag` element whose parent is a `list_tag` element.
    pub row_tag: String,
    /// Attribute carrying a field's dotted document path.
    pub field_attribute: String,
    /// First descendant with this tag is the row's header region.
    pub header_tag: String,
    /// Action controls inside the header.
    pub action_tag: String,
    /// Fewer header actions than this marks a plain repeatable row.
    pub min_actions: usize,
    /// Zero-based action the new control is inserted before.
    pub anchor_position: usize,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            list_tag: "ol".to_string(),
            row_tag: "li".to_string(),
            field_attribute: "name".to_string(),
            header_tag: "h3".to_string(),
            action_tag: "button".to_string(),
            min_actions: 3,
            anchor_position: 1,
        }
    }
}
