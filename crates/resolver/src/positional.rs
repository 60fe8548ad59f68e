use crate::rows::RowSnapshot;
use crate::strategy::{ResolveContext, ResolveStrategy, Resolution};
use core_types::Location;
use document::get;
use html::traverse::text_content;

/// Fallback for rows without addressable fields: match the row's position and its list's
/// length against every zone, then break ties by the variant display name shown in the row.
pub struct PositionalStrategy;

impl PositionalStrategy {
    /// Zones as long as the row's list whose element at the row's position is polymorphic.
    pub fn candidate_zones(row: &RowSnapshot<'_>, cx: &ResolveContext<'_>) -> Vec<String> {
        cx.schema
            .enumerate_zones(cx.document)
            .into_iter()
            .filter(|zone| {
                let Some(items) = get(cx.document, zone).and_then(|v| v.as_array()) else {
                    return false;
                };
                items.len() == row.sibling_count
                    && items
                        .get(row.position)
                        .is_some_and(|item| cx.schema.is_polymorphic_element(item))
            })
            .collect()
    }

    fn disambiguate(
        row: &RowSnapshot<'_>,
        cx: &ResolveContext<'_>,
        candidates: Vec<String>,
    ) -> Option<String> {
        let components = cx.components?;
        let text = text_content(row.row).to_lowercase();
        let mut survivors = candidates.into_iter().filter(|zone| {
            let element_path = format!("{zone}.{}", row.position);
            get(cx.document, &element_path)
                .and_then(|element| cx.schema.variant(element))
                .and_then(|uid| components.display_name(uid))
                .is_some_and(|name| text.contains(&name.to_lowercase()))
        });
        let first = survivors.next()?;
        survivors.next().is_none().then_some(first)
    }
}

impl ResolveStrategy for PositionalStrategy {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn resolve(&self, row: &RowSnapshot<'_>, cx: &ResolveContext<'_>) -> Resolution {
        let mut candidates = Self::candidate_zones(row, cx);
        let zone = if candidates.len() == 1 {
            candidates.pop()
        } else {
            log::trace!(
                target: "dz.resolve",
                "row {:?}: {} positional candidates, trying display names",
                row.row.id(),
                candidates.len()
            );
            Self::disambiguate(row, cx, candidates)
        };
        zone.map_or(Resolution::Miss, |zone| {
            Resolution::Resolved(Location::new(zone, row.position))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentRegistry;
    use crate::rows::rendered_rows;
    use crate::selectors::Selectors;
    use document::Schema;
    use html::parse_fragment;
    use serde_json::{Value, json};

    fn resolve_rows(markup: &str, doc: &Value, components: Option<&ComponentRegistry>) -> Vec<Resolution> {
        let dom = parse_fragment(markup);
        let selectors = Selectors::default();
        let schema = Schema::default();
        let cx = ResolveContext {
            document: doc,
            schema: &schema,
            selectors: &selectors,
            components,
        };
        rendered_rows(&dom, &selectors)
            .iter()
            .map(|row| PositionalStrategy.resolve(row, &cx))
            .collect()
    }

    #[test]
    fn unique_length_match_resolves_by_position() {
        let doc = json!({
            "sections": [{ "__component": "a" }, { "__component": "b" }],
            "footer": [{ "__component": "c" }]
        });
        let res = resolve_rows("<ol><li></li><li></li></ol>", &doc, None);
        assert_eq!(
            res,
            vec![
                Resolution::Resolved(Location::new("sections", 0)),
                Resolution::Resolved(Location::new("sections", 1)),
            ]
        );
    }

    #[test]
    fn display_name_breaks_ties_case_insensitively() {
        let doc = json!({
            "sections": [{ "__component": "shared.hero" }],
            "footer": [{ "__component": "shared.quote" }]
        });
        let registry: ComponentRegistry =
            [("shared.hero", "Hero"), ("shared.quote", "Quote")].into_iter().collect();
        let res = resolve_rows("<ol><li><h3>QUOTE</h3></li></ol>", &doc, Some(&registry));
        assert_eq!(res, vec![Resolution::Resolved(Location::new("footer", 0))]);
    }

    #[test]
    fn ambiguity_is_a_miss_not_a_guess() {
        let doc = json!({
            "sections": [{ "__component": "shared.hero" }],
            "footer": [{ "__component": "shared.hero" }]
        });
        let registry: ComponentRegistry = [("shared.hero", "Hero")].into_iter().collect();
        let res = resolve_rows("<ol><li>Hero</li></ol>", &doc, Some(&registry));
        assert_eq!(res, vec![Resolution::Miss]);
    }

    #[test]
    fn ties_without_registry_miss() {
        let doc = json!({
            "sections": [{ "__component": "shared.hero" }],
            "footer": [{ "__component": "shared.quote" }]
        });
        let res = resolve_rows("<ol><li>Quote</li></ol>", &doc, None);
        assert_eq!(res, vec![Resolution::Miss]);
    }

    #[test]
    fn no_length_match_misses() {
        let doc = json!({ "sections": [{ "__component": "a" }] });
        let res = resolve_rows("<ol><li></li><li></li><li></li></ol>", &doc, None);
        assert!(res.iter().all(|r| *r == Resolution::Miss));
    }

    #[test]
    fn display_name_filter_also_applies_to_zero_candidates() {
        let doc = json!({ "sections": [{ "__component": "shared.hero" }] });
        let registry: ComponentRegistry = [("shared.hero", "Hero")].into_iter().collect();
        let res = resolve_rows("<ol><li>Hero</li><li>Hero</li></ol>", &doc, Some(&registry));
        assert!(res.iter().all(|r| *r == Resolution::Miss));
    }
}
