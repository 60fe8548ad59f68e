use crate::config::Messages;
use crate::host::{ContentHost, HostError, Notification};
use core_types::{Location, NotificationKind};
use document::{Schema, Value, get};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DuplicateOutcome {
    /// The copy was handed to the host at `at`.
    Inserted { location: Location, at: usize },
    /// The captured location no longer holds a zone element; nothing happened.
    Stale,
    /// The host refused the insertion; the user was told.
    Failed(HostError),
}

/// Duplicate the element at `location` into the slot right after it.
///
/// `document` must be the host's current values, not the snapshot the control was built
/// from: the location is re-validated against it before anything is copied.
pub fn duplicate_element<H: ContentHost>(
    host: &mut H,
    document: Option<&Value>,
    location: &Location,
    schema: &Schema,
    messages: &Messages,
) -> DuplicateOutcome {
    let element = document
        .and_then(|doc| get(doc, &location.element_path()))
        .filter(|element| schema.is_polymorphic_element(element));
    let Some(element) = element else {
        log::debug!(target: "dz.duplicate", "location {location} is stale, ignoring activation");
        return DuplicateOutcome::Stale;
    };

    let copy = schema.duplicate(element);
    let at = location.index + 1;
    match host.insert_element(&location.zone_path, copy, at) {
        Ok(()) => {
            log::debug!(target: "dz.duplicate", "duplicated {location} into slot {at}");
            DuplicateOutcome::Inserted {
                location: location.clone(),
                at,
            }
        }
        Err(HostError::Unsupported) => {
            log::debug!(target: "dz.duplicate", "host cannot insert elements");
            DuplicateOutcome::Failed(HostError::Unsupported)
        }
        Err(err) => {
            log::warn!(target: "dz.duplicate", "duplicating {location} failed: {err}");
            let descriptor = &messages.duplicate_error;
            let message = host.format_message(&descriptor.id, &descriptor.default_message);
            host.notify(Notification {
                kind: NotificationKind::Danger,
                message,
            });
            DuplicateOutcome::Failed(err)
        }
    }
}
