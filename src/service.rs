pub mod directory;
pub mod file;

use tracing::warn;

pub use self::{
    directory::DirectoryService,
    file::{
        FileService,
        FileUpdate,
    },
};
use crate::{
    error::ServiceError,
    item::{
        directory::Directory,
        id::ItemId,
        named::Named,
        Item,
    },
    registry::Registry,
};

// =============================================================================

// Parent Resolution

/// Looks up the directory a new item is created in. `None` places the item
/// directly under the storage root.
async fn parent_directory<R>(
    registry: &R,
    parent: Option<&ItemId>,
) -> Result<Option<Directory>, ServiceError>
where
    R: Registry + ?Sized,
{
    let Some(id) = parent else {
        return Ok(None);
    };

    match registry.get(id).await? {
        Item::Directory(dir) => Ok(Some(dir)),
        Item::File(file) => {
            warn!(%id, name = file.name(), "rejected file as parent");

            Err(ServiceError::NotADirectory {
                id: id.clone(),
                name: String::from(file.name()),
            })
        }
    }
}

// =============================================================================

// Testing

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        io,
        sync::{
            Arc,
            Mutex,
        },
    };

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::{
        DirectoryService,
        FileService,
    };
    use crate::{
        error::StorageError,
        item::{
            content::FileContent,
            directory::Directory,
            file::File,
            id::ItemId,
            listing::DirectoryListing,
            path::ItemPath,
            Item,
        },
        registry::{
            ItemRegistry,
            Registry,
        },
        storage::{
            LocalStorage,
            Storage,
        },
    };

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub(crate) enum Op {
        CreateDirectory,
        CreateFile,
        DeleteItem,
        Listing,
        FileContent,
        UpdateFile,
        UpdateFileContent,
    }

    /// Local storage that records every call and can be told to fail one
    /// kind of operation.
    #[derive(Debug)]
    pub(crate) struct ScriptedStorage {
        inner: LocalStorage,
        registry: ItemRegistry,
        fail_on: Option<Op>,
        evict_on: Mutex<Option<(Op, ItemId)>>,
        calls: Mutex<Vec<Op>>,
    }

    impl ScriptedStorage {
        pub(crate) fn calls(&self) -> Vec<Op> {
            self.calls.lock().unwrap().clone()
        }

        /// Unregisters `id` the next time `op` reaches storage, as a
        /// concurrent delete would.
        pub(crate) fn evict_on(&self, op: Op, id: ItemId) {
            *self.evict_on.lock().unwrap() = Some((op, id));
        }

        async fn record(&self, op: Op) -> Result<(), StorageError> {
            self.calls.lock().unwrap().push(op);

            let evict = {
                let mut evict_on = self.evict_on.lock().unwrap();

                match evict_on.take() {
                    Some((on, id)) if on == op => Some(id),
                    other => {
                        *evict_on = other;
                        None
                    }
                }
            };

            if let Some(id) = evict {
                self.registry.unregister(&id).await.unwrap();
            }

            match self.fail_on {
                Some(fail) if fail == op => Err(StorageError::io(
                    self.inner.root(),
                    io::Error::new(io::ErrorKind::Other, "injected failure"),
                )),
                _ => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Storage for ScriptedStorage {
        async fn create_directory(
            &self,
            directory: &Directory,
            path: &ItemPath,
        ) -> Result<(), StorageError> {
            self.record(Op::CreateDirectory).await?;
            self.inner.create_directory(directory, path).await
        }

        async fn create_file(
            &self,
            file: &File,
            path: &ItemPath,
            content: &FileContent,
        ) -> Result<(), StorageError> {
            self.record(Op::CreateFile).await?;
            self.inner.create_file(file, path, content).await
        }

        async fn delete_item(&self, item: &Item, path: &ItemPath) -> Result<(), StorageError> {
            self.record(Op::DeleteItem).await?;
            self.inner.delete_item(item, path).await
        }

        async fn listing(
            &self,
            directory: &Directory,
            path: &ItemPath,
        ) -> Result<DirectoryListing, StorageError> {
            self.record(Op::Listing).await?;
            self.inner.listing(directory, path).await
        }

        async fn file_content(
            &self,
            file: &File,
            path: &ItemPath,
        ) -> Result<FileContent, StorageError> {
            self.record(Op::FileContent).await?;
            self.inner.file_content(file, path).await
        }

        async fn update_file(
            &self,
            file: &File,
            from: &ItemPath,
            to: &ItemPath,
        ) -> Result<(), StorageError> {
            self.record(Op::UpdateFile).await?;
            self.inner.update_file(file, from, to).await
        }

        async fn update_file_content(
            &self,
            file: &File,
            path: &ItemPath,
            content: &FileContent,
        ) -> Result<(), StorageError> {
            self.record(Op::UpdateFileContent).await?;
            self.inner.update_file_content(file, path, content).await
        }
    }

    pub(crate) struct Harness {
        pub(crate) root: TempDir,
        pub(crate) registry: Arc<ItemRegistry>,
        pub(crate) storage: Arc<ScriptedStorage>,
    }

    impl Harness {
        pub(crate) fn new() -> Self {
            Self::failing_on(None)
        }

        pub(crate) fn failing_on(fail_on: Option<Op>) -> Self {
            let root = tempfile::tempdir().unwrap();
            let inner = LocalStorage::open(root.path()).unwrap();
            let registry = ItemRegistry::new();

            Self {
                root,
                registry: Arc::new(registry.clone()),
                storage: Arc::new(ScriptedStorage {
                    inner,
                    registry,
                    fail_on,
                    evict_on: Mutex::default(),
                    calls: Mutex::default(),
                }),
            }
        }

        pub(crate) fn directories(&self) -> DirectoryService<ItemRegistry, ScriptedStorage> {
            DirectoryService::new(self.registry.clone(), self.storage.clone())
        }

        pub(crate) fn files(&self) -> FileService<ItemRegistry, ScriptedStorage> {
            FileService::new(self.registry.clone(), self.storage.clone())
        }
    }
}
