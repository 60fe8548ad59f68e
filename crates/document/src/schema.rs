use crate::path::join_path;
use serde::Deserialize;
use serde_json::{Map, Value};

const DEFAULT_DISCRIMINATOR: &str = "__component";
const DEFAULT_IDENTITY_FIELDS: [&str; 3] = ["id", "documentId", "__temp_key__"];

/// Field conventions of the host's document shape.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Schema {
    /// String field that marks an object as a polymorphic list element (its variant tag).
    pub discriminator: String,
    /// Fields that carry persistent or client-side identity; stripped from duplicates.
    pub identity_fields: Vec<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            identity_fields: DEFAULT_IDENTITY_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl Schema {
    /// An object whose discriminator field is a string.
    pub fn is_polymorphic_element(&self, value: &Value) -> bool {
        self.variant(value).is_some()
    }

    /// The variant tag of a polymorphic element.
    pub fn variant<'a>(&self, value: &'a Value) -> Option<&'a str> {
        value.as_object()?.get(&self.discriminator)?.as_str()
    }

    /// Every non-root array whose elements are all polymorphic, in pre-order.
    ///
    /// A zone is reported before the zones nested inside its own elements. The root is never
    /// reported even when it is an array, since it has no addressable path.
    pub fn enumerate_zones(&self, document: &Value) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_zones(document, "", &mut out);
        out
    }

    fn collect_zones(&self, value: &Value, path: &str, out: &mut Vec<String>) {
        match value {
            Value::Array(items) => {
                if !path.is_empty()
                    && !items.is_empty()
                    && items.iter().all(|item| self.is_polymorphic_element(item))
                {
                    out.push(path.to_string());
                }
                for (index, item) in items.iter().enumerate() {
                    self.collect_zones(item, &join_path(path, index), out);
                }
            }
            Value::Object(fields) => {
                for (key, nested) in fields {
                    self.collect_zones(nested, &join_path(path, key), out);
                }
            }
            _ => {}
        }
    }

    /// Recursively drop identity fields from every object, keeping everything else and
    /// array order intact.
    pub fn sanitize(&self, value: Value) -> Value {
        match value {
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.sanitize(item)).collect())
            }
            Value::Object(fields) => {
                let mut next = Map::with_capacity(fields.len());
                for (key, nested) in fields {
                    if self.identity_fields.iter().any(|f| *f == key) {
                        continue;
                    }
                    next.insert(key, self.sanitize(nested));
                }
                Value::Object(next)
            }
            scalar => scalar,
        }
    }

    /// Independent, identity-free copy of an element, ready to be inserted as a new one.
    pub fn duplicate(&self, element: &Value) -> Value {
        self.sanitize(crate::clone_value(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn polymorphic_element_needs_string_discriminator() {
        let schema = Schema::default();
        assert!(schema.is_polymorphic_element(&json!({ "__component": "a.b" })));
        assert!(!schema.is_polymorphic_element(&json!({ "__component": 3 })));
        assert!(!schema.is_polymorphic_element(&json!({ "title": "x" })));
        assert!(!schema.is_polymorphic_element(&json!([{ "__component": "a" }])));
        assert!(!schema.is_polymorphic_element(&Value::Null));
        assert!(!schema.is_polymorphic_element(&json!("__component")));
    }

    #[test]
    fn enumerates_top_level_and_nested_zones() {
        let schema = Schema::default();
        let doc = json!({
            "title": "page",
            "sections": [
                { "__component": "layout.row", "columns": [
                    { "__component": "layout.col", "text": "a" },
                    { "__component": "layout.col", "text": "b" }
                ]},
                { "__component": "shared.quote", "body": "q" }
            ],
            "tags": [{ "name": "plain" }],
            "empty": [],
            "mixed": [{ "__component": "a" }, { "name": "b" }],
            "meta": { "blocks": [{ "__component": "seo.meta" }] }
        });
        assert_eq!(
            schema.enumerate_zones(&doc),
            vec!["sections", "sections.0.columns", "meta.blocks"]
        );
    }

    #[test]
    fn root_array_is_not_a_zone() {
        let schema = Schema::default();
        let doc = json!([{ "__component": "a", "inner": [{ "__component": "b" }] }]);
        assert_eq!(schema.enumerate_zones(&doc), vec!["0.inner"]);
    }

    #[test]
    fn sanitize_strips_identity_fields_at_every_level() {
        let schema = Schema::default();
        let element = json!({
            "id": 7,
            "documentId": "abc",
            "__temp_key__": "a0",
            "__component": "shared.slider",
            "title": "X",
            "slides": [
                { "id": 1, "caption": "one", "media": { "id": 5, "url": "/u" } },
                { "__temp_key__": "b1", "caption": "two" }
            ]
        });
        assert_eq!(
            schema.duplicate(&element),
            json!({
                "__component": "shared.slider",
                "title": "X",
                "slides": [
                    { "caption": "one", "media": { "url": "/u" } },
                    { "caption": "two" }
                ]
            })
        );
    }

    #[test]
    fn custom_schema_deserializes_with_defaults() {
        let schema: Schema =
            serde_json::from_value(json!({ "discriminator": "kind" })).expect("schema");
        assert_eq!(schema.discriminator, "kind");
        assert_eq!(schema.identity_fields, Schema::default().identity_fields);
        assert!(serde_json::from_value::<Schema>(json!({ "bogus": 1 })).is_err());
    }
}
