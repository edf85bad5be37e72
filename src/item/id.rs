use std::{
    convert::Infallible,
    fmt,
    str::FromStr,
};

use uuid::Uuid;

// =============================================================================

// ItemId

/// Opaque key naming an item independently of where it currently sits in the
/// tree. Generated ids are UUIDs; ids handed in from outside are taken as-is,
/// so an empty id can exist and is rejected on lookup.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ItemId(String);

// -----------------------------------------------------------------------------

// ItemId - Standard Traits

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(String::from(value))
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

// -----------------------------------------------------------------------------

// ItemId - Methods

impl ItemId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================

// Identified

pub trait Identified {
    fn id(&self) -> &ItemId;
}
