use crate::Node;
use std::fmt::{self, Write};

/// Deterministic indented serialization of a tree, for test comparisons.
///
/// One line per node: `#document`, `<name attr="value">`, `"text"` or `<!-- comment -->`.
/// Attribute order is preserved. Whitespace-only text nodes can be dropped by options.
#[derive(Clone, Copy, Debug)]
pub struct DomSnapshotOptions {
    pub ignore_ids: bool,
    pub skip_blank_text: bool,
}

impl Default for DomSnapshotOptions {
    fn default() -> Self {
        Self {
            ignore_ids: true,
            skip_blank_text: true,
        }
    }
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(root: &Node, options: DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(root, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

const INDENT_STEP: usize = 2;

fn walk_snapshot(node: &Node, options: &DomSnapshotOptions, depth: usize, out: &mut Vec<String>) {
    if options.skip_blank_text
        && let Node::Text { text, .. } = node
        && text.trim().is_empty()
    {
        return;
    }
    let mut line = " ".repeat(depth * INDENT_STEP);
    write_node_line(&mut line, node, options);
    out.push(line);
    for child in node.children() {
        walk_snapshot(child, options, depth + 1, out);
    }
}

fn write_node_line(out: &mut String, node: &Node, options: &DomSnapshotOptions) {
    match node {
        Node::Document { doctype, .. } => {
            out.push_str("#document");
            if let Some(dt) = doctype {
                let _ = write!(out, " doctype=\"{}\"", escape(dt));
            }
        }
        Node::Element {
            name, attributes, ..
        } => {
            out.push('<');
            out.push_str(name);
            for (attr, value) in attributes {
                out.push(' ');
                out.push_str(attr);
                if let Some(value) = value {
                    let _ = write!(out, "=\"{}\"", escape(value));
                }
            }
            out.push('>');
        }
        Node::Text { text, .. } => {
            let _ = write!(out, "\"{}\"", escape(text));
        }
        Node::Comment { text, .. } => {
            let _ = write!(out, "<!-- {} -->", escape(text));
        }
    }
    if !options.ignore_ids {
        let _ = write!(out, " #{}", node.id().0);
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
