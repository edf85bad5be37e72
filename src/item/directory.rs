use std::collections::HashMap;

use super::{
    child::Child,
    id::{
        Identified,
        ItemId,
    },
    named::Named,
};

// =============================================================================

// Directory

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Directory {
    id: ItemId,
    parent: Option<ItemId>,
    name: String,
    children: HashMap<String, ItemId>,
}

// -----------------------------------------------------------------------------

// Directory - Library Traits

impl Child for Directory {
    fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }
}

impl Identified for Directory {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

impl Named for Directory {
    fn name(&self) -> &str {
        &self.name
    }
}

// -----------------------------------------------------------------------------

// Directory - Create

impl Directory {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<ItemId>) -> Self {
        Self::with_id(ItemId::generate(), name, parent)
    }

    #[must_use]
    pub fn with_id(id: ItemId, name: impl Into<String>, parent: Option<ItemId>) -> Self {
        Self {
            id,
            parent,
            name: name.into(),
            children: HashMap::default(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, name: impl Into<String>, id: ItemId) -> Self {
        self.children.insert(name.into(), id);
        self
    }
}

// -----------------------------------------------------------------------------

// Directory - Children

impl Directory {
    /// Children as last recorded on this value. Descriptive only; the
    /// registry and physical storage are authoritative.
    #[must_use]
    pub const fn children(&self) -> &HashMap<String, ItemId> {
        &self.children
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&ItemId> {
        self.children.get(name)
    }
}
