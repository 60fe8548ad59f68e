//! Rendered-tree model for the content-manager edit view.
//!
//! The host's rendering layer is foreign: this crate only mirrors its shape (elements,
//! attributes, text) and the patch protocol used to mutate it. Markup fixtures go through
//! `tokenize` + `build_dom` and are replayed into a live store via `diff_from_empty`.

#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
pub mod traverse;

mod dom_builder;
mod dom_patch;
mod entities;
mod patch_stream;
mod tokenizer;
mod types;

pub use crate::dom_builder::build_dom;
pub use crate::dom_patch::{DomPatch, PatchKey};
pub use crate::patch_stream::{DomDiffError, diff_from_empty, insert_subtree};
pub use crate::tokenizer::tokenize;
pub use crate::types::{Id, Node, NodeId, Token};

/// Tokenize and build in one step.
pub fn parse_fragment(markup: &str) -> Node {
    build_dom(&tokenize(markup))
}
