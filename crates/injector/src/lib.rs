//! Duplicate controls for dynamic-zone rows of a live content-manager edit view.
//!
//! The host streams `HostEvent`s into an [`InjectorRuntime`]. Structural changes and value
//! changes trigger a reconciliation pass that removes every injected control and rebuilds
//! one per eligible row; activating a control asks the host to insert an identity-free
//! copy of that row's element right after it.

mod config;
mod control;
mod dom_store;
mod duplicate;
mod host;
mod reconciler;
mod runtime;

pub use crate::config::{
    ConfigError, DEFAULT_MARKER_ATTRIBUTE, InjectorConfig, MessageDescriptor, Messages,
};
pub use crate::control::{ControlPatches, build_control};
pub use crate::dom_store::{DomPatchError, DomStore, MutationRecord};
pub use crate::duplicate::{DuplicateOutcome, duplicate_element};
pub use crate::host::{ContentHost, HostError, Notification, RecordingHost};
pub use crate::reconciler::{PassInput, PassReport, Reconciler, ReconcilerState};
pub use crate::runtime::InjectorRuntime;

pub use bus::{Bus, HostEvent};
