use crate::selectors::Selectors;
use html::Node;
use html::traverse::walk_with_parent;

/// One rendered row and its place among its sibling rows.
#[derive(Clone, Copy, Debug)]
pub struct RowSnapshot<'a> {
    pub row: &'a Node,
    /// Index among the `row_tag` children of the enclosing list.
    pub position: usize,
    pub sibling_count: usize,
}

/// Every `list_tag > row_tag` element in document order.
pub fn rendered_rows<'a>(root: &'a Node, selectors: &Selectors) -> Vec<RowSnapshot<'a>> {
    let mut rows = Vec::new();
    walk_with_parent(root, &mut |node, parent| {
        if !node.is_element_named(&selectors.row_tag)
            || !parent.is_element_named(&selectors.list_tag)
        {
            return;
        }
        let siblings = parent
            .children()
            .iter()
            .filter(|c| c.is_element_named(&selectors.row_tag));
        let mut sibling_count = 0;
        let mut position = None;
        for sibling in siblings {
            if std::ptr::eq(sibling, node) {
                position = Some(sibling_count);
            }
            sibling_count += 1;
        }
        if let Some(position) = position {
            rows.push(RowSnapshot {
                row: node,
                position,
                sibling_count,
            });
        }
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::parse_fragment;

    #[test]
    fn rows_are_list_items_directly_under_ordered_lists() {
        let dom = parse_fragment(
            "<ol><li>a<ol><li>a.0</li></ol></li><p>x</p><li>b</li></ol>\
             <ul><li>not a row</li></ul><div><li>orphan</li></div>",
        );
        let rows = rendered_rows(&dom, &Selectors::default());
        let summary: Vec<_> = rows
            .iter()
            .map(|r| (html::traverse::text_content(r.row), r.position, r.sibling_count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("aa.0".to_string(), 0, 2),
                ("a.0".to_string(), 0, 1),
                ("b".to_string(), 1, 2),
            ]
        );
    }
}
