use core_types::NotificationKind;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("could not insert into {zone_path}: {message}")]
    InsertFailed { zone_path: String, message: String },
    /// The host exposes no insertion operation for this view.
    #[error("element insertion is not available")]
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// What the content-editing host lends to a mounted injector.
pub trait ContentHost {
    /// Insert `value` into the zone at `zone_path` so that it ends up at `at`.
    fn insert_element(&mut self, zone_path: &str, value: Value, at: usize)
    -> Result<(), HostError>;

    /// Show a message to the user.
    fn notify(&mut self, notification: Notification);

    /// Localized string for `id`, falling back to `default_message`.
    fn format_message(&self, _id: &str, default_message: &str) -> String {
        default_message.to_string()
    }
}

/// A host that keeps the document itself and records what it was asked to do.
///
/// Insertion edits the held document in place, the way the content manager's form state does.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub document: Value,
    pub inserted: Vec<(String, Value, usize)>,
    pub notifications: Vec<Notification>,
    /// When set, every insertion fails with this message.
    pub fail_with: Option<String>,
}

impl RecordingHost {
    pub fn new(document: Value) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }
}

impl ContentHost for RecordingHost {
    fn insert_element(
        &mut self,
        zone_path: &str,
        value: Value,
        at: usize,
    ) -> Result<(), HostError> {
        if let Some(message) = &self.fail_with {
            return Err(HostError::InsertFailed {
                zone_path: zone_path.to_string(),
                message: message.clone(),
            });
        }
        let zone = document::get_mut(&mut self.document, zone_path)
            .and_then(Value::as_array_mut)
            .ok_or_else(|| HostError::InsertFailed {
                zone_path: zone_path.to_string(),
                message: "no such zone".to_string(),
            })?;
        if at > zone.len() {
            return Err(HostError::InsertFailed {
                zone_path: zone_path.to_string(),
                message: format!("index {at} is past the end"),
            });
        }
        zone.insert(at, value.clone());
        self.inserted.push((zone_path.to_string(), value, at));
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
