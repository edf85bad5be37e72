use std::{
    sync::Arc,
    time::SystemTime,
};

use tracing::{
    debug,
    info,
    warn,
};

use super::parent_directory;
use crate::{
    error::ServiceError,
    item::{
        content::FileContent,
        file::File,
        id::{
            Identified,
            ItemId,
        },
        located::Located,
        named::Named,
        Item,
    },
    registry::Registry,
    storage::Storage,
};

// =============================================================================

// FileUpdate

/// The changes to apply to a file. Absent values are left as they are.
#[derive(Clone, Debug, Default)]
pub struct FileUpdate {
    name: Option<String>,
    modified: Option<SystemTime>,
    content: Option<FileContent>,
}

impl FileUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_modified(self, modified: SystemTime) -> Self {
        Self {
            modified: Some(modified),
            ..self
        }
    }

    #[must_use]
    pub fn with_content(self, content: impl Into<FileContent>) -> Self {
        Self {
            content: Some(content.into()),
            ..self
        }
    }
}

// =============================================================================

// FileService

/// File creation, reading and update. As with directories, storage is
/// mutated first and the registry only once storage has succeeded.
#[derive(Debug)]
pub struct FileService<R, S>
where
    R: Registry,
    S: Storage,
{
    registry: Arc<R>,
    storage: Arc<S>,
}

// -----------------------------------------------------------------------------

// FileService - Standard Traits

impl<R, S> Clone for FileService<R, S>
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

// FileService - Create

impl<R, S> FileService<R, S>
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

// FileService - Use Cases

impl<R, S> FileService<R, S>
where
    R: Registry,
    S: Storage,
{
    /// Creates the file with `content`. Without `modified` the file is
    /// stamped with the current time.
    pub async fn create_file(
        &self,
        name: impl Into<String> + Send,
        parent: Option<&ItemId>,
        content: FileContent,
        modified: Option<SystemTime>,
    ) -> Result<File, ServiceError> {
        let parent = parent_directory(self.registry.as_ref(), parent).await?;
        let file = File::new(
            name,
            parent.map(|parent| parent.id().clone()),
            modified.unwrap_or_else(SystemTime::now),
        );
        let path = file.path(self.registry.as_ref()).await?;

        self.storage.create_file(&file, &path, &content).await?;
        self.registry.register(file.clone().into()).await?;

        info!(id = %file.id(), %path, bytes = content.len(), "file created");

        Ok(file)
    }

    pub async fn file_content(&self, id: &ItemId) -> Result<FileContent, ServiceError> {
        let file = self.file(id).await?;
        let path = file.path(self.registry.as_ref()).await?;
        let content = self.storage.file_content(&file, &path).await?;

        debug!(%id, %path, bytes = content.len(), "file content read");

        Ok(content)
    }

    /// Applies `update` to the file. Attributes are written first, then the
    /// content if one is given, then the registry entry is replaced. A failed
    /// content write leaves a rename already applied on disk. If the file is
    /// unregistered while the update runs, the final step fails with
    /// `NotFound` after storage has already been changed.
    pub async fn update_file(&self, id: &ItemId, update: FileUpdate) -> Result<File, ServiceError> {
        let current = self.file(id).await?;
        let updated = current.replace(update.name, update.modified);
        let from = current.path(self.registry.as_ref()).await?;
        let to = from.with_name(updated.name());

        self.storage.update_file(&updated, &from, &to).await?;

        if let Some(content) = &update.content {
            self.storage.update_file_content(&updated, &to, content).await?;
        }

        self.registry.replace(updated.clone().into()).await?;

        info!(%id, %from, %to, content = update.content.is_some(), "file updated");

        Ok(updated)
    }
}

// -----------------------------------------------------------------------------

// FileService - Helpers

impl<R, S> FileService<R, S>
where
    R: Registry,
    S: Storage,
{
    async fn file(&self, id: &ItemId) -> Result<File, ServiceError> {
        match self.registry.get(id).await? {
            Item::File(file) => Ok(file),
            Item::Directory(dir) => {
                warn!(%id, name = dir.name(), "rejected directory as file");

                Err(ServiceError::NotAFile {
                    id: id.clone(),
                    name: String::from(dir.name()),
                })
            }
        }
    }
}



#[cfg(test)]
mod update_tests {
    use std::{
        fs,
        time::{
            Duration,
            SystemTime,
        },
    };

    use super::FileUpdate;
    use crate::{
        error::ErrorKind,
        item::{
            content::FileContent,
            id::Identified,
            named::Named,
            Item,
        },
        registry::Registry,
        service::testing::{
            Harness,
            Op,
        },
    };

    fn epoch(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[tokio::test]
    async fn update_nothing() {
        let harness = Harness::new();
        let files = harness.files();
        let charlie = files
            .create_file("charlie", None, FileContent::from(vec![4u8]), Some(epoch(10)))
            .await
            .unwrap();
        let updated = files
            .update_file(charlie.id(), FileUpdate::new())
            .await
            .unwrap();

        assert_eq!(updated, charlie);
        assert_eq!(fs::read(harness.root.path().join("charlie")).unwrap(), [4u8]);
        assert_eq!(harness.storage.calls(), [Op::CreateFile, Op::UpdateFile]);
    }

    #[tokio::test]
    async fn update_name_and_modified() {
        let harness = Harness::new();
        let files = harness.files();
        let charlie = files
            .create_file("charlie", None, FileContent::from(vec![4u8]), Some(epoch(10)))
            .await
            .unwrap();
        let updated = files
            .update_file(
                charlie.id(),
                FileUpdate::new().with_name("delta").with_modified(epoch(20)),
            )
            .await
            .unwrap();
        let host = harness.root.path().join("delta");

        assert_eq!(updated.id(), charlie.id());
        assert_eq!(updated.name(), "delta");
        assert!(!harness.root.path().join("charlie").exists());
        assert_eq!(fs::read(&host).unwrap(), [4u8]);
        assert_eq!(fs::metadata(&host).unwrap().modified().unwrap(), epoch(20));
        assert_eq!(
            harness.registry.get(charlie.id()).await.unwrap(),
            Item::from(updated)
        );
    }

    #[tokio::test]
    async fn update_content_only() {
        let harness = Harness::new();
        let files = harness.files();
        let charlie = files
            .create_file(
                "charlie",
                None,
                FileContent::from(vec![4u8, 8, 15, 16, 23, 42]),
                Some(epoch(10)),
            )
            .await
            .unwrap();
        let updated = files
            .update_file(charlie.id(), FileUpdate::new().with_content(vec![1u8, 3]))
            .await
            .unwrap();

        assert_eq!(updated, charlie);
        assert_eq!(fs::read(harness.root.path().join("charlie")).unwrap(), [1u8, 3]);
        assert_eq!(
            harness.storage.calls(),
            [Op::CreateFile, Op::UpdateFile, Op::UpdateFileContent]
        );
    }

    #[tokio::test]
    async fn update_onto_existing_name() {
        let harness = Harness::new();
        let files = harness.files();
        let charlie = files
            .create_file("charlie", None, FileContent::default(), None)
            .await
            .unwrap();

        fs::write(harness.root.path().join("delta"), b"delta").unwrap();

        let err = files
            .update_file(charlie.id(), FileUpdate::new().with_name("delta"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(
            harness.registry.get(charlie.id()).await.unwrap().name(),
            "charlie"
        );
    }

    #[tokio::test]
    async fn update_content_failure() {
        let harness = Harness::failing_on(Some(Op::UpdateFileContent));
        let files = harness.files();
        let charlie = files
            .create_file("charlie", None, FileContent::from(vec![4u8]), None)
            .await
            .unwrap();
        let err = files
            .update_file(
                charlie.id(),
                FileUpdate::new().with_name("delta").with_content(vec![1u8]),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::IoFailure);
        // the rename already happened on disk but the registry is unchanged
        assert_eq!(fs::read(harness.root.path().join("delta")).unwrap(), [4u8]);
        assert_eq!(
            harness.registry.get(charlie.id()).await.unwrap(),
            Item::from(charlie)
        );
    }

    #[tokio::test]
    async fn update_after_concurrent_delete() {
        let harness = Harness::new();
        let files = harness.files();
        let charlie = files
            .create_file("charlie", None, FileContent::from(vec![4u8]), None)
            .await
            .unwrap();

        harness
            .storage
            .evict_on(Op::UpdateFile, charlie.id().clone());

        let err = files
            .update_file(charlie.id(), FileUpdate::new().with_name("delta"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        // storage was already changed when the registry step failed
        assert!(harness.root.path().join("delta").is_file());
        assert!(!harness.root.path().join("charlie").exists());
        assert!(!harness.registry.contains(charlie.id()).await);
    }

    #[tokio::test]
    async fn update_directory() {
        let harness = Harness::new();
        let alpha = harness
            .directories()
            .create_directory("alpha", None)
            .await
            .unwrap();
        let err = harness
            .files()
            .update_file(alpha.id(), FileUpdate::new().with_name("delta"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotAFile);
        assert!(harness.root.path().join("alpha").is_dir());
    }
}
