use std::sync::Arc;

use tracing::info;

use crate::{
    config::Config,
    error::{
        ServiceError,
        StorageError,
    },
    item::Item,
    registry::{
        ItemRegistry,
        Registry,
    },
    service::{
        DirectoryService,
        FileService,
    },
    storage::LocalStorage,
};

// =============================================================================

// FileSystem

/// An [`ItemRegistry`] and a [`LocalStorage`] with both services wired onto
/// them.
#[derive(Debug)]
pub struct FileSystem {
    registry: Arc<ItemRegistry>,
    storage: Arc<LocalStorage>,
}

// -----------------------------------------------------------------------------

// FileSystem - Create

impl FileSystem {
    #[must_use]
    pub fn new(registry: ItemRegistry, storage: LocalStorage) -> Self {
        Self {
            registry: Arc::new(registry),
            storage: Arc::new(storage),
        }
    }

    /// Opens the configured storage root with an empty registry.
    pub fn open(config: &Config) -> Result<Self, StorageError> {
        let storage = LocalStorage::from_config(&config.storage)?;
        let registry = ItemRegistry::from_config(&config.registry);

        info!(
            root = %storage.root().display(),
            policy = ?registry.policy(),
            "opened file system"
        );

        Ok(Self::new(registry, storage))
    }
}

// -----------------------------------------------------------------------------

// FileSystem - Methods

impl FileSystem {
    #[must_use]
    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    #[must_use]
    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    #[must_use]
    pub fn directories(&self) -> DirectoryService<ItemRegistry, LocalStorage> {
        DirectoryService::new(self.registry.clone(), self.storage.clone())
    }

    #[must_use]
    pub fn files(&self) -> FileService<ItemRegistry, LocalStorage> {
        FileService::new(self.registry.clone(), self.storage.clone())
    }

    /// Registers everything currently beneath the storage root under fresh
    /// ids and returns the registered items, parents before children. Meant
    /// for a registry that is still empty: items registered earlier are not
    /// matched up with what the scan finds.
    pub async fn rebuild(&self) -> Result<Vec<Item>, ServiceError> {
        let items = self.storage.scan().await?;

        for item in &items {
            self.registry.register(item.clone()).await?;
        }

        info!(count = items.len(), "rebuilt registry from storage");

        Ok(items)
    }
}
