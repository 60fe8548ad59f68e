//! Read-only access into the edited document and detection of its dynamic zones.
//!
//! The document is the host's current form values: nested objects and arrays of JSON
//! values. Paths are dotted strings where an all-digit segment selects an array index and
//! any other segment selects an object key (`blocks.0.items.2.title`).

mod path;
mod schema;

pub use crate::path::{clone_value, get, get_mut, is_index_segment, join_path};
pub use crate::schema::Schema;

pub use serde_json::{Map, Value};
