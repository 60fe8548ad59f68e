use std::fmt;

/// One element of a dynamic zone at the time it was resolved.
///
/// Locations are never stored across passes; the index is only meaningful
/// until the zone is reordered or shrunk.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub zone_path: String,
    pub index: usize,
}

impl Location {
    pub fn new(zone_path: impl Into<String>, index: usize) -> Self {
        Self {
            zone_path: zone_path.into(),
            index,
        }
    }

    /// Dotted path of the element itself (`zone_path.index`).
    pub fn element_path(&self) -> String {
        if self.zone_path.is_empty() {
            return self.index.to_string();
        }
        format!("{}.{}", self.zone_path, self.index)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.zone_path, self.index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomVersion(pub u64);

impl DomVersion {
    pub const INITIAL: DomVersion = DomVersion(0);

    pub fn next(self) -> Self {
        DomVersion(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Danger,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_path_joins_zone_and_index() {
        assert_eq!(Location::new("sections", 2).element_path(), "sections.2");
        assert_eq!(
            Location::new("blocks.0.items", 1).element_path(),
            "blocks.0.items.1"
        );
        assert_eq!(Location::new("", 4).element_path(), "4");
    }

    #[test]
    fn version_advances_by_one() {
        assert_eq!(DomVersion::INITIAL.next(), DomVersion(1));
    }
}
