pub mod child;
pub mod content;
pub mod directory;
pub mod file;
pub mod id;
pub mod listing;
pub mod located;
pub mod named;
pub mod path;

use self::{
    child::Child,
    directory::Directory,
    file::File,
    id::{
        Identified,
        ItemId,
    },
    named::Named,
};

// =============================================================================

// Item

/// A node of the logical tree. The set of kinds is closed: every call site
/// that needs kind-specific behaviour matches on both variants.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Item {
    Directory(Directory),
    File(File),
}

// -----------------------------------------------------------------------------

// Item - Standard Traits

impl From<Directory> for Item {
    fn from(dir: Directory) -> Self {
        Self::Directory(dir)
    }
}

impl From<File> for Item {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

// -----------------------------------------------------------------------------

// Item - Library Traits

impl Child for Item {
    fn parent(&self) -> Option<&ItemId> {
        match self {
            Self::Directory(dir) => dir.parent(),
            Self::File(file) => file.parent(),
        }
    }
}

impl Identified for Item {
    fn id(&self) -> &ItemId {
        match self {
            Self::Directory(dir) => dir.id(),
            Self::File(file) => file.id(),
        }
    }
}

impl Named for Item {
    fn name(&self) -> &str {
        match self {
            Self::Directory(dir) => dir.name(),
            Self::File(file) => file.name(),
        }
    }
}

// -----------------------------------------------------------------------------

// Item - Methods

impl Item {
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Directory(_) => ItemKind::Directory,
            Self::File(_) => ItemKind::File,
        }
    }

    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    #[must_use]
    pub const fn as_directory(&self) -> Option<&Directory> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    #[must_use]
    pub const fn as_file(&self) -> Option<&File> {
        match self {
            Self::Directory(_) => None,
            Self::File(file) => Some(file),
        }
    }
}

// =============================================================================

// ItemKind

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ItemKind {
    Directory,
    File,
}
