use super::{
    directory::Directory,
    Item,
};

// =============================================================================

// DirectoryListing

/// A directory together with its immediate children as found in physical
/// storage, ordered by name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirectoryListing {
    directory: Directory,
    items: Vec<Item>,
}

impl DirectoryListing {
    #[must_use]
    pub const fn new(directory: Directory, items: Vec<Item>) -> Self {
        Self { directory, items }
    }

    #[must_use]
    pub const fn directory(&self) -> &Directory {
        &self.directory
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
