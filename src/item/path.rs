use std::fmt;

// =============================================================================

// ItemPath

/// The names of an item's ancestors followed by its own name, root-most
/// first. Never empty. Carries no identifiers, so items with equally named
/// ancestor chains resolve to the same place.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ItemPath(Vec<String>);

// -----------------------------------------------------------------------------

// ItemPath - Standard Traits

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

// -----------------------------------------------------------------------------

// ItemPath - Create

impl ItemPath {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    #[must_use]
    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());

        Self(segments)
    }

    /// The same location with the last segment swapped for `name`.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        match self.parent() {
            Some(parent) => parent.join(name),
            _ => Self::new(name),
        }
    }
}

// -----------------------------------------------------------------------------

// ItemPath - Methods

impl ItemPath {
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}
