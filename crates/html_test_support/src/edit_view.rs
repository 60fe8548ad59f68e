//! Markup builders mirroring the content manager's edit view.
//!
//! Dynamic-zone rows render a header with three actions (delete, drag, more); plain
//! repeatable rows render two. Field inputs carry their dotted document path in `name`.

use crate::escape_markup;

pub const ACTION_CLASS: &str = "cm-action";
pub const ACTION_LABEL_CLASS: &str = "cm-visually-hidden";

fn action(label: &str) -> String {
    format!(
        r#"<button type="button" class="{ACTION_CLASS}"><span class="{ACTION_LABEL_CLASS}">{label}</span></button>"#
    )
}

fn row(title: &str, actions: &[&str], fields: &[&str], body: &str) -> String {
    let mut out = String::from("<li><div class=\"row-card\"><h3 class=\"row-header\">");
    out.push_str(&format!("<span class=\"row-title\">{}</span>", escape_markup(title)));
    out.push_str("<span class=\"row-actions\">");
    for label in actions {
        out.push_str(&action(label));
    }
    out.push_str("</span></h3><div class=\"row-body\">");
    for field in fields {
        out.push_str(&format!(
            r#"<label>{0}<input type="text" name="{0}"></label>"#,
            escape_markup(field)
        ));
    }
    out.push_str(body);
    out.push_str("</div></div></li>");
    out
}

/// A dynamic-zone row: delete, drag and more-actions in the header.
pub fn zone_row(title: &str, fields: &[&str], body: &str) -> String {
    row(title, &["Delete", "Drag", "More actions"], fields, body)
}

/// A plain repeatable-component row: delete and drag only.
pub fn repeatable_row(title: &str, fields: &[&str], body: &str) -> String {
    row(title, &["Delete", "Drag"], fields, body)
}

pub fn list(rows: &[String]) -> String {
    let mut out = String::from("<ol>");
    for r in rows {
        out.push_str(r);
    }
    out.push_str("</ol>");
    out
}

/// Wrap fragments in the surrounding edit-view chrome.
pub fn edit_view(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body><main class=\"edit-view\"><form>{body}</form>\
         <aside class=\"right-links\"></aside></main></body></html>"
    )
}
