use std::time::SystemTime;

use super::{
    child::Child,
    id::{
        Identified,
        ItemId,
    },
    named::Named,
};

// =============================================================================

// File

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct File {
    id: ItemId,
    parent: Option<ItemId>,
    name: String,
    modified: SystemTime,
}

// -----------------------------------------------------------------------------

// File - Library Traits

impl Child for File {
    fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }
}

impl Identified for File {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

impl Named for File {
    fn name(&self) -> &str {
        &self.name
    }
}

// -----------------------------------------------------------------------------

// File - Create

impl File {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<ItemId>, modified: SystemTime) -> Self {
        Self::with_id(ItemId::generate(), name, parent, modified)
    }

    #[must_use]
    pub fn with_id(
        id: ItemId,
        name: impl Into<String>,
        parent: Option<ItemId>,
        modified: SystemTime,
    ) -> Self {
        Self {
            id,
            parent,
            name: name.into(),
            modified,
        }
    }
}

// -----------------------------------------------------------------------------

// File - Methods

impl File {
    #[must_use]
    pub const fn modified(&self) -> SystemTime {
        self.modified
    }

    /// A replacement for this file with the same id and parent. Absent values
    /// keep the current ones.
    #[must_use]
    pub fn replace(&self, name: Option<String>, modified: Option<SystemTime>) -> Self {
        Self {
            id: self.id.clone(),
            parent: self.parent.clone(),
            name: name.unwrap_or_else(|| self.name.clone()),
            modified: modified.unwrap_or(self.modified),
        }
    }
}

#[cfg(test)]
mod replace_tests {
    use std::time::{
        Duration,
        SystemTime,
    };

    use super::{
        Child,
        File,
        Identified,
        ItemId,
        Named,
    };

    #[test]
    fn replace_nothing() {
        let file = File::new("charlie", Some(ItemId::from("alpha")), SystemTime::UNIX_EPOCH);

        assert_eq!(file.replace(None, None), file);
    }

    #[test]
    fn replace_name_keeps_identity() {
        let file = File::new("charlie", Some(ItemId::from("alpha")), SystemTime::UNIX_EPOCH);
        let renamed = file.replace(Some(String::from("delta")), None);

        assert_eq!(renamed.name(), "delta");
        assert_eq!(renamed.id(), file.id());
        assert_eq!(renamed.parent(), file.parent());
        assert_eq!(renamed.modified(), file.modified());
    }

    #[test]
    fn replace_modified() {
        let later = SystemTime::UNIX_EPOCH + Duration::from_secs(60);
        let file = File::new("charlie", None, SystemTime::UNIX_EPOCH);

        assert_eq!(file.replace(None, Some(later)).modified(), later);
    }
}
