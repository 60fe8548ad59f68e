use document::Schema;
use resolver::Selectors;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_MARKER_ATTRIBUTE: &str = "data-dz-component-duplicator-action";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed injector config: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("marker attribute must not be empty")]
    EmptyMarker,
    #[error("discriminator must not be empty")]
    EmptyDiscriminator,
    #[error("anchor position {anchor_position} is out of range for {min_actions} required actions")]
    AnchorOutOfRange {
        anchor_position: usize,
        min_actions: usize,
    },
}

/// A localizable string: host lookup id plus the text used when the host has none.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MessageDescriptor {
    pub id: String,
    pub default_message: String,
}

impl MessageDescriptor {
    fn new(id: &str, default_message: &str) -> Self {
        Self {
            id: id.to_string(),
            default_message: default_message.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Messages {
    pub duplicate_label: MessageDescriptor,
    pub duplicate_error: MessageDescriptor,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            duplicate_label: MessageDescriptor::new(
                "strapi-dz-component-duplicator.action.duplicate",
                "Duplicate component",
            ),
            duplicate_error: MessageDescriptor::new(
                "strapi-dz-component-duplicator.error.duplicate",
                "Could not duplicate this component.",
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct InjectorConfig {
    /// Attribute that marks injected controls. Teardown finds controls by this alone.
    pub marker_attribute: String,
    pub selectors: Selectors,
    pub schema: Schema,
    pub messages: Messages,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
            selectors: Selectors::default(),
            schema: Schema::default(),
            messages: Messages::default(),
        }
    }
}

impl InjectorConfig {
    /// Parse a host-supplied plugin config. Missing fields take their defaults.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let config = Self::deserialize(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker_attribute.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        if self.schema.discriminator.is_empty() {
            return Err(ConfigError::EmptyDiscriminator);
        }
        let Selectors {
            anchor_position,
            min_actions,
            ..
        } = self.selectors;
        if anchor_position >= min_actions {
            return Err(ConfigError::AnchorOutOfRange {
                anchor_position,
                min_actions,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_yields_defaults() {
        let config = InjectorConfig::from_json(&json!({})).expect("config");
        assert_eq!(config, InjectorConfig::default());
        assert_eq!(config.selectors.min_actions, 3);
        assert_eq!(config.selectors.anchor_position, 1);
        assert_eq!(
            config.messages.duplicate_label.default_message,
            "Duplicate component"
        );
    }

    #[test]
    fn nested_overrides_keep_sibling_defaults() {
        let config = InjectorConfig::from_json(&json!({
            "markerAttribute": "data-dup",
            "schema": { "discriminator": "kind" },
            "messages": { "duplicateLabel": { "id": "x.dup", "defaultMessage": "Copy" } }
        }))
        .expect("config");
        assert_eq!(config.marker_attribute, "data-dup");
        assert_eq!(config.schema.discriminator, "kind");
        assert_eq!(config.schema.identity_fields, Schema::default().identity_fields);
        assert_eq!(config.messages.duplicate_label.id, "x.dup");
        assert_eq!(config.messages.duplicate_error, Messages::default().duplicate_error);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(matches!(
            InjectorConfig::from_json(&json!({ "marker": "x" })),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            InjectorConfig::from_json(&json!({ "markerAttribute": "" })),
            Err(ConfigError::EmptyMarker)
        ));
        assert!(matches!(
            InjectorConfig::from_json(&json!({ "schema": { "discriminator": "" } })),
            Err(ConfigError::EmptyDiscriminator)
        ));
    }
}
