use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Host component schemas keyed by variant uid, as the content manager exposes them:
/// `{ "<uid>": { "info": { "displayName": "..." } } }`. Other schema fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentSchema>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentSchema {
    pub info: ComponentInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentInfo {
    pub display_name: Option<String>,
}

// Anything malformed under a uid reads as "no display name"; the registry itself still loads.
impl<'de> Deserialize<'de> for ComponentSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let display_name = value
            .get("info")
            .and_then(|info| info.get("displayName"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Self {
            info: ComponentInfo { display_name },
        })
    }
}

impl ComponentRegistry {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn insert(&mut self, uid: impl Into<String>, display_name: impl Into<String>) {
        self.components.insert(
            uid.into(),
            ComponentSchema {
                info: ComponentInfo {
                    display_name: Some(display_name.into()),
                },
            },
        );
    }

    pub fn display_name(&self, uid: &str) -> Option<&str> {
        self.components.get(uid)?.info.display_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<U: Into<String>, N: Into<String>> FromIterator<(U, N)> for ComponentRegistry {
    fn from_iter<I: IntoIterator<Item = (U, N)>>(iter: I) -> Self {
        let mut registry = ComponentRegistry::default();
        for (uid, name) in iter {
            registry.insert(uid, name);
        }
        registry
    }
}
