pub mod local;

use async_trait::async_trait;

pub use self::local::LocalStorage;
use crate::{
    error::StorageError,
    item::{
        content::FileContent,
        directory::Directory,
        file::File,
        listing::DirectoryListing,
        path::ItemPath,
        Item,
    },
};

// =============================================================================

// Storage

/// The physical side of the tree. Every operation receives the item together
/// with its resolved [`ItemPath`]; all segments before the last must already
/// exist or the operation fails before anything is mutated.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_directory(
        &self,
        directory: &Directory,
        path: &ItemPath,
    ) -> Result<(), StorageError>;

    /// Creates the file even when `content` is empty.
    async fn create_file(
        &self,
        file: &File,
        path: &ItemPath,
        content: &FileContent,
    ) -> Result<(), StorageError>;

    /// Directories are removed with everything beneath them.
    async fn delete_item(&self, item: &Item, path: &ItemPath) -> Result<(), StorageError>;

    async fn listing(
        &self,
        directory: &Directory,
        path: &ItemPath,
    ) -> Result<DirectoryListing, StorageError>;

    async fn file_content(&self, file: &File, path: &ItemPath) -> Result<FileContent, StorageError>;

    /// Moves the file stored at `from` to `to` if they differ and applies the
    /// attributes of `file`.
    async fn update_file(
        &self,
        file: &File,
        from: &ItemPath,
        to: &ItemPath,
    ) -> Result<(), StorageError>;

    /// Overwrites the bytes of the file at `path`. Writing the same bytes
    /// again leaves the same observable state.
    async fn update_file_content(
        &self,
        file: &File,
        path: &ItemPath,
        content: &FileContent,
    ) -> Result<(), StorageError>;
}
