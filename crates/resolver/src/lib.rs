//! Location resolution over an immutable snapshot of the rendered edit view.
//!
//! Everything here is pure: a pass hands in one tree snapshot and one document snapshot and
//! gets back which rows are dynamic-zone items, where they live in the document, and where a
//! control would be anchored. Nothing mutates the tree.

mod anchor;
mod field_path;
mod plan;
mod positional;
mod registry;
mod rows;
mod selectors;
mod strategy;

pub use crate::anchor::{Anchor, find_anchor};
pub use crate::field_path::FieldPathStrategy;
pub use crate::plan::{PlannedControl, plan_pass};
pub use crate::positional::PositionalStrategy;
pub use crate::registry::{ComponentInfo, ComponentRegistry, ComponentSchema};
pub use crate::rows::{RowSnapshot, rendered_rows};
pub use crate::selectors::Selectors;
pub use crate::strategy::{LocationResolver, ResolveContext, ResolveStrategy, Resolution};
