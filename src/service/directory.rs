use std::sync::Arc;

use tracing::{
    info,
    warn,
};

use super::parent_directory;
use crate::{
    error::ServiceError,
    item::{
        directory::Directory,
        id::{
            Identified,
            ItemId,
        },
        listing::DirectoryListing,
        located::Located,
        named::Named,
        Item,
    },
    registry::Registry,
    storage::Storage,
};

// =============================================================================

// DirectoryService

/// Directory creation, item deletion and listing. Physical storage is always
/// mutated before the registry, and the registry is left alone when storage
/// fails. Nothing is rolled back when a later step fails.
#[derive(Debug)]
pub struct DirectoryService<R, S>
where
    R: Registry,
    S: Storage,
{
    registry: Arc<R>,
    storage: Arc<S>,
}

// -----------------------------------------------------------------------------

// DirectoryService - Standard Traits

impl<R, S> Clone for DirectoryService<R, S>
where
    R: Registry,
    S: Storage,
{
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            storage: self.storage.clone(),
        }
    }
}

// -----------------------------------------------------------------------------

// DirectoryService - Create

impl<R, S> DirectoryService<R, S>
where
    R: Registry,
    S: Storage,
{
    #[must_use]
    pub const fn new(registry: Arc<R>, storage: Arc<S>) -> Self {
        Self { registry, storage }
    }
}

// -----------------------------------------------------------------------------

// DirectoryService - Use Cases

impl<R, S> DirectoryService<R, S>
where
    R: Registry,
    S: Storage,
{
    pub async fn create_directory(
        &self,
        name: impl Into<String> + Send,
        parent: Option<&ItemId>,
    ) -> Result<Directory, ServiceError> {
        let parent = parent_directory(self.registry.as_ref(), parent).await?;
        let directory = Directory::new(name, parent.map(|parent| parent.id().clone()));
        let path = directory.path(self.registry.as_ref()).await?;

        self.storage.create_directory(&directory, &path).await?;
        self.registry.register(directory.clone().into()).await?;

        info!(id = %directory.id(), %path, "directory created");

        Ok(directory)
    }

    /// Removes the item and, for a directory, everything physically beneath
    /// it. Only the item's own registry entry is removed.
    pub async fn delete_item(&self, id: &ItemId) -> Result<Item, ServiceError> {
        let item = self.registry.get(id).await?;
        let path = item.path(self.registry.as_ref()).await?;

        self.storage.delete_item(&item, &path).await?;
        self.registry.unregister(id).await?;

        info!(%id, %path, kind = ?item.kind(), "item deleted");

        Ok(item)
    }

    /// Lists the directory as it is in physical storage.
    pub async fn list_directory(&self, id: &ItemId) -> Result<DirectoryListing, ServiceError> {
        match self.registry.get(id).await? {
            Item::Directory(dir) => {
                let path = dir.path(self.registry.as_ref()).await?;

                Ok(self.storage.listing(&dir, &path).await?)
            }
            Item::File(file) => {
                warn!(%id, name = file.name(), "rejected listing of file");

                Err(ServiceError::NotADirectory {
                    id: id.clone(),
                    name: String::from(file.name()),
                })
            }
        }
    }
}
