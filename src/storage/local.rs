//! [`Storage`] over a directory of the host filesystem.
//!
//! Every item path is resolved segment by segment beneath a fixed root.
//! Names are checked before anything touches the disk, and symbolic links
//! are neither followed nor reported, so no operation can escape the root.
//! The filesystem calls themselves run on the blocking thread pool.

use std::{
    fs::{
        self,
        Metadata,
        OpenOptions,
    },
    io::{
        self,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
    time::SystemTime,
};

use async_trait::async_trait;
use tokio::task;
use tracing::{
    debug,
    info,
    warn,
};

use super::Storage;
use crate::{
    config::StorageConfig,
    error::StorageError,
    item::{
        content::FileContent,
        directory::Directory,
        file::File,
        id::{
            Identified,
            ItemId,
        },
        listing::DirectoryListing,
        named::Named,
        path::ItemPath,
        Item,
        ItemKind,
    },
};

// =============================================================================

// LocalStorage

#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
}

// -----------------------------------------------------------------------------

// LocalStorage - Create

impl LocalStorage {
    /// Opens storage rooted at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        match stat(&root)? {
            Some(meta) if meta.is_dir() => {
                info!(root = %root.display(), "opened local storage");

                Ok(Self { root })
            }
            Some(_) => Err(StorageError::InvalidRoot { path: root }),
            None => Err(StorageError::PathNotFound { path: root }),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::open(&config.root)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

// -----------------------------------------------------------------------------

// LocalStorage - Library Traits

#[async_trait]
impl Storage for LocalStorage {
    async fn create_directory(
        &self,
        directory: &Directory,
        path: &ItemPath,
    ) -> Result<(), StorageError> {
        let (directory, path) = (directory.clone(), path.clone());

        self.unblock(move |storage| storage.make_directory(&directory, &path))
            .await
    }

    async fn create_file(
        &self,
        file: &File,
        path: &ItemPath,
        content: &FileContent,
    ) -> Result<(), StorageError> {
        let (file, path, content) = (file.clone(), path.clone(), content.clone());

        self.unblock(move |storage| storage.make_file(&file, &path, &content))
            .await
    }

    async fn delete_item(&self, item: &Item, path: &ItemPath) -> Result<(), StorageError> {
        let (item, path) = (item.clone(), path.clone());

        self.unblock(move |storage| storage.remove_item(&item, &path))
            .await
    }

    async fn listing(
        &self,
        directory: &Directory,
        path: &ItemPath,
    ) -> Result<DirectoryListing, StorageError> {
        let (directory, path) = (directory.clone(), path.clone());

        self.unblock(move |storage| storage.read_listing(directory, &path))
            .await
    }

    async fn file_content(&self, file: &File, path: &ItemPath) -> Result<FileContent, StorageError> {
        let (file, path) = (file.clone(), path.clone());

        self.unblock(move |storage| storage.read_content(&file, &path))
            .await
    }

    async fn update_file(
        &self,
        file: &File,
        from: &ItemPath,
        to: &ItemPath,
    ) -> Result<(), StorageError> {
        let (file, from, to) = (file.clone(), from.clone(), to.clone());

        self.unblock(move |storage| storage.move_file(&file, &from, &to))
            .await
    }

    async fn update_file_content(
        &self,
        file: &File,
        path: &ItemPath,
        content: &FileContent,
    ) -> Result<(), StorageError> {
        let (file, path, content) = (file.clone(), path.clone(), content.clone());

        self.unblock(move |storage| storage.write_content(&file, &path, &content))
            .await
    }
}

// -----------------------------------------------------------------------------

// LocalStorage - Blocking

impl LocalStorage {
    /// Runs `op` against a handle onto this storage on the blocking thread
    /// pool, keeping filesystem calls off the async executor.
    async fn unblock<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Self) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let storage = self.clone();

        task::spawn_blocking(move || op(&storage))
            .await
            .map_err(|err| StorageError::io(&self.root, err.into()))?
    }

    fn make_directory(&self, directory: &Directory, path: &ItemPath) -> Result<(), StorageError> {
        let target = self.resolve_parent(path)?;

        fs::create_dir(&target).map_err(|err| creation_error(&target, err))?;

        info!(id = %directory.id(), path = %target.display(), "created directory");

        Ok(())
    }

    fn make_file(
        &self,
        file: &File,
        path: &ItemPath,
        content: &FileContent,
    ) -> Result<(), StorageError> {
        let target = self.resolve_parent(path)?;

        let mut handle = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|err| creation_error(&target, err))?;

        handle
            .write_all(content.bytes())
            .and_then(|()| handle.set_modified(file.modified()))
            .map_err(|err| StorageError::io(&target, err))?;

        info!(
            id = %file.id(),
            path = %target.display(),
            bytes = content.len(),
            "created file"
        );

        Ok(())
    }

    fn remove_item(&self, item: &Item, path: &ItemPath) -> Result<(), StorageError> {
        let target = self.resolve(path)?;

        match item.kind() {
            ItemKind::Directory => remove_tree(&target)?,
            ItemKind::File => fs::remove_file(&target).map_err(|err| StorageError::io(&target, err))?,
        }

        info!(id = %item.id(), path = %target.display(), "deleted item");

        Ok(())
    }

    fn read_listing(
        &self,
        directory: Directory,
        path: &ItemPath,
    ) -> Result<DirectoryListing, StorageError> {
        let target = self.resolve(path)?;
        let mut items = Vec::new();

        for (name, meta) in read_entries(&target)? {
            let parent = Some(directory.id().clone());

            if meta.is_dir() {
                items.push(Item::from(Directory::new(name, parent)));
            } else {
                let modified = modified(&target.join(&name), &meta)?;

                items.push(Item::from(File::new(name, parent, modified)));
            }
        }

        items.sort_by(|a, b| a.name().cmp(b.name()));

        debug!(
            id = %directory.id(),
            path = %target.display(),
            count = items.len(),
            "listed directory"
        );

        Ok(DirectoryListing::new(directory, items))
    }

    fn read_content(&self, file: &File, path: &ItemPath) -> Result<FileContent, StorageError> {
        let target = self.resolve(path)?;
        let bytes = fs::read(&target).map_err(|err| StorageError::io(&target, err))?;

        debug!(id = %file.id(), path = %target.display(), bytes = bytes.len(), "read file");

        Ok(FileContent::new(bytes))
    }

    fn move_file(&self, file: &File, from: &ItemPath, to: &ItemPath) -> Result<(), StorageError> {
        let source = self.resolve(from)?;
        let target = if from == to {
            source
        } else {
            let target = self.resolve_parent(to)?;

            if stat(&target)?.is_some() {
                return Err(StorageError::AlreadyExists { path: target });
            }

            fs::rename(&source, &target).map_err(|err| StorageError::io(&source, err))?;

            info!(
                id = %file.id(),
                from = %source.display(),
                to = %target.display(),
                "renamed file"
            );

            target
        };

        touch(&target, file.modified())
    }

    fn write_content(
        &self,
        file: &File,
        path: &ItemPath,
        content: &FileContent,
    ) -> Result<(), StorageError> {
        let target = self.resolve(path)?;

        fs::write(&target, content.bytes()).map_err(|err| StorageError::io(&target, err))?;
        touch(&target, file.modified())?;

        info!(
            id = %file.id(),
            path = %target.display(),
            bytes = content.len(),
            "wrote file content"
        );

        Ok(())
    }
}

// -----------------------------------------------------------------------------

// LocalStorage - Resolve

impl LocalStorage {
    /// Host path for `path` where every segment but the last must exist as a
    /// directory. The last segment is not checked.
    fn resolve_parent(&self, path: &ItemPath) -> Result<PathBuf, StorageError> {
        path.segments().iter().try_for_each(|name| check_name(name))?;

        let (name, parents) = path
            .segments()
            .split_last()
            .ok_or_else(|| StorageError::InvalidName {
                name: String::new(),
            })?;

        let mut host = self.root.clone();

        for parent in parents {
            host.push(parent);

            match stat(&host)? {
                Some(meta) if meta.is_dir() => {}
                _ => return Err(StorageError::PathNotFound { path: host }),
            }
        }

        host.push(name);

        debug!(path = %path, host = %host.display(), "resolved path");

        Ok(host)
    }

    /// Host path for `path` where every segment including the last must exist.
    /// A symbolic link counts as missing.
    fn resolve(&self, path: &ItemPath) -> Result<PathBuf, StorageError> {
        let host = self.resolve_parent(path)?;

        match stat(&host)? {
            Some(meta) if !meta.file_type().is_symlink() => Ok(host),
            Some(_) => {
                warn!(path = %path, host = %host.display(), "refused symbolic link");

                Err(StorageError::PathNotFound { path: host })
            }
            None => Err(StorageError::PathNotFound { path: host }),
        }
    }
}

// -----------------------------------------------------------------------------

// LocalStorage - Scan

impl LocalStorage {
    /// Everything beneath the root as items with fresh ids, parents before
    /// their children and siblings ordered by name. Directories record their
    /// children. Symbolic links and entries whose names are not valid UTF-8
    /// are skipped.
    pub async fn scan(&self) -> Result<Vec<Item>, StorageError> {
        self.unblock(|storage| {
            let mut items = Vec::new();

            scan_dir(&storage.root, None, &mut items)?;

            info!(root = %storage.root.display(), count = items.len(), "scanned local storage");

            Ok(items)
        })
        .await
    }
}

fn scan_dir(
    host: &Path,
    parent: Option<&ItemId>,
    items: &mut Vec<Item>,
) -> Result<Vec<(String, ItemId)>, StorageError> {
    let mut entries = read_entries(host)?;
    let mut scanned = Vec::with_capacity(entries.len());

    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (name, meta) in entries {
        let id = ItemId::generate();
        let path = host.join(&name);

        if meta.is_dir() {
            // reserve the slot so the directory precedes its descendants
            let index = items.len();
            let children = scan_dir(&path, Some(&id), items)?;
            let dir = children.into_iter().fold(
                Directory::with_id(id.clone(), name.clone(), parent.cloned()),
                |dir, (child, child_id)| dir.with_child(child, child_id),
            );

            items.insert(index, dir.into());
        } else {
            let modified = modified(&path, &meta)?;

            items.push(File::with_id(id.clone(), name.clone(), parent.cloned(), modified).into());
        }

        scanned.push((name, id));
    }

    Ok(scanned)
}

// -----------------------------------------------------------------------------

// Helpers

fn check_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(&['/', '\\', '\0'][..]);

    if invalid {
        return Err(StorageError::InvalidName {
            name: String::from(name),
        });
    }

    Ok(())
}

fn stat(path: &Path) -> Result<Option<Metadata>, StorageError> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::io(path, err)),
    }
}

fn creation_error(path: &Path, err: io::Error) -> StorageError {
    match err.kind() {
        io::ErrorKind::AlreadyExists => StorageError::AlreadyExists {
            path: path.to_path_buf(),
        },
        _ => StorageError::io(path, err),
    }
}

fn modified(path: &Path, meta: &Metadata) -> Result<SystemTime, StorageError> {
    meta.modified().map_err(|err| StorageError::io(path, err))
}

fn touch(path: &Path, modified: SystemTime) -> Result<(), StorageError> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .and_then(|handle| handle.set_modified(modified))
        .map_err(|err| StorageError::io(path, err))
}

/// Immediate entries of `host` with their (non-followed) metadata. Symbolic
/// links are left out.
fn read_entries(host: &Path) -> Result<Vec<(String, Metadata)>, StorageError> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(host).map_err(|err| StorageError::io(host, err))? {
        let entry = entry.map_err(|err| StorageError::io(host, err))?;
        let path = entry.path();

        match entry.file_name().into_string() {
            Ok(name) => {
                let meta = fs::symlink_metadata(&path).map_err(|err| StorageError::io(&path, err))?;

                if meta.file_type().is_symlink() {
                    warn!(%name, host = %host.display(), "skipped symbolic link");
                } else {
                    entries.push((name, meta));
                }
            }
            Err(name) => warn!(?name, host = %host.display(), "skipped entry with non utf-8 name"),
        }
    }

    Ok(entries)
}

/// Removes `host` and everything beneath it, children before their parent.
/// The first failure aborts the traversal.
fn remove_tree(host: &Path) -> Result<(), StorageError> {
    for entry in fs::read_dir(host).map_err(|err| StorageError::io(host, err))? {
        let entry = entry.map_err(|err| StorageError::io(host, err))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|err| StorageError::io(&path, err))?;

        if file_type.is_dir() {
            remove_tree(&path)?;
        } else {
            fs::remove_file(&path).map_err(|err| StorageError::io(&path, err))?;
        }
    }

    fs::remove_dir(host).map_err(|err| StorageError::io(host, err))
}



#[cfg(test)]
mod delete_tests {
    use std::{
        fs,
        time::SystemTime,
    };

    use super::{
        LocalStorage,
        Storage,
    };
    use crate::{
        error::{
            ErrorKind,
            StorageError,
        },
        item::{
            directory::Directory,
            file::File,
            path::ItemPath,
            Item,
        },
    };

    #[tokio::test]
    async fn delete_directory_with_descendants() {
        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(root.path()).unwrap();

        fs::create_dir_all(root.path().join("alpha/bravo/charlie")).unwrap();
        fs::write(root.path().join("alpha/bravo/sample.txt"), b"sample").unwrap();
        fs::write(root.path().join("alpha/bravo/charlie/deep.txt"), b"deep").unwrap();

        let bravo = Item::from(Directory::new("bravo", None));

        storage
            .delete_item(&bravo, &ItemPath::new("alpha").join("bravo"))
            .await
            .unwrap();

        assert!(!root.path().join("alpha/bravo").exists());
        assert!(root.path().join("alpha").is_dir());
    }

    #[tokio::test]
    async fn delete_file() {
        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(root.path()).unwrap();

        fs::create_dir(root.path().join("alpha")).unwrap();
        fs::write(root.path().join("alpha/sample"), b"sample").unwrap();

        let sample = Item::from(File::new("sample", None, SystemTime::now()));

        storage
            .delete_item(&sample, &ItemPath::new("alpha").join("sample"))
            .await
            .unwrap();

        assert!(!root.path().join("alpha/sample").exists());
        assert!(root.path().join("alpha").is_dir());
    }

    #[tokio::test]
    async fn delete_missing() {
        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(root.path()).unwrap();
        let alpha = Item::from(Directory::new("alpha", None));

        assert!(matches!(
            storage.delete_item(&alpha, &ItemPath::new("alpha")).await,
            Err(StorageError::PathNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_with_missing_parent() {
        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(root.path()).unwrap();
        let sample = Item::from(File::new("sample.txt", None, SystemTime::now()));

        assert!(matches!(
            storage
                .delete_item(&sample, &ItemPath::new("alpha").join("sample.txt"))
                .await,
            Err(StorageError::PathNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_directory_replaced_by_file() {
        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(root.path()).unwrap();

        fs::create_dir(root.path().join("alpha")).unwrap();
        fs::write(root.path().join("alpha/bravo"), b"bravo").unwrap();

        let bravo = Item::from(Directory::new("bravo", None));
        let err = storage
            .delete_item(&bravo, &ItemPath::new("alpha").join("bravo"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(root.path().join("alpha").is_dir());
        assert_eq!(fs::read(root.path().join("alpha/bravo")).unwrap(), b"bravo");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn delete_aborts_on_descendant_failure() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(root.path()).unwrap();
        let locked = root.path().join("alpha/bravo/charlie");

        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("delta"), b"delta").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // privileged users ignore directory permissions
        if fs::write(locked.join("canary"), b"").is_ok() {
            fs::remove_file(locked.join("canary")).unwrap();
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let bravo = Item::from(Directory::new("bravo", None));
        let result = storage
            .delete_item(&bravo, &ItemPath::new("alpha").join("bravo"))
            .await;

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(result.unwrap_err().kind(), ErrorKind::IoFailure);
        assert!(root.path().join("alpha/bravo").is_dir());
        assert!(locked.join("delta").is_file());
    }
}
