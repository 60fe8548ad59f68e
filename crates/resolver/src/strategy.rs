use crate::field_path::FieldPathStrategy;
use crate::positional::PositionalStrategy;
use crate::registry::ComponentRegistry;
use crate::rows::RowSnapshot;
use crate::selectors::Selectors;
use core_types::Location;
use document::{Schema, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Location),
    /// Nothing found, or more than one candidate survived. Never a guess.
    Miss,
}

impl Resolution {
    pub fn into_location(self) -> Option<Location> {
        match self {
            Resolution::Resolved(location) => Some(location),
            Resolution::Miss => None,
        }
    }
}

/// Inputs shared by every strategy during one pass.
#[derive(Clone, Copy, Debug)]
pub struct ResolveContext<'a> {
    pub document: &'a Value,
    pub schema: &'a Schema,
    pub selectors: &'a Selectors,
    /// Variant display names; `None` when the host has not provided them.
    pub components: Option<&'a ComponentRegistry>,
}

pub trait ResolveStrategy {
    fn name(&self) -> &'static str;

    fn resolve(&self, row: &RowSnapshot<'_>, cx: &ResolveContext<'_>) -> Resolution;
}

/// Ordered fallback chain; the first strategy that resolves wins.
pub struct LocationResolver {
    chain: Vec<Box<dyn ResolveStrategy>>,
}

impl LocationResolver {
    pub fn new() -> Self {
        Self::with_chain(vec![
            Box::new(FieldPathStrategy),
            Box::new(PositionalStrategy),
        ])
    }

    pub fn with_chain(chain: Vec<Box<dyn ResolveStrategy>>) -> Self {
        Self { chain }
    }

    pub fn resolve(&self, row: &RowSnapshot<'_>, cx: &ResolveContext<'_>) -> Resolution {
        for strategy in &self.chain {
            if let Resolution::Resolved(location) = strategy.resolve(row, cx) {
                log::trace!(
                    target: "dz.resolve",
                    "row {:?} resolved to {location} by {}",
                    row.row.id(),
                    strategy.name()
                );
                return Resolution::Resolved(location);
            }
        }
        log::trace!(target: "dz.resolve", "row {:?} unresolved", row.row.id());
        Resolution::Miss
    }
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new()
    }
}
