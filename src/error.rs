use std::{
    io,
    path::PathBuf,
};

use miette::Diagnostic;
use thiserror::Error;

use crate::item::id::ItemId;

// =============================================================================

// ErrorKind

/// The coarse failure taxonomy every error in the crate maps onto. Callers
/// that only need to branch on *what* went wrong (a transport adapter turning
/// failures into protocol status codes, for example) match on this rather
/// than on the concrete error enums.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidArgument,
    NotADirectory,
    NotAFile,
    IoFailure,
}

// =============================================================================

// Registry Errors

#[derive(Debug, Diagnostic, Error)]
pub enum RegistryError {
    #[diagnostic(code(registry::get), help("check the item has been registered"))]
    #[error("item with id '{id}' is not registered")]
    NotFound { id: ItemId },
    #[diagnostic(code(registry::get), help("supply a non-empty item id"))]
    #[error("item id is empty")]
    InvalidId,
    #[diagnostic(
        code(registry::register),
        help("the registry is strict, unregister the existing item first")
    )]
    #[error("item with id '{id}' is already registered")]
    AlreadyRegistered { id: ItemId },
    #[diagnostic(code(registry::path), help("check the parent links of the item"))]
    #[error("parent chain of item revisits id '{id}'")]
    Cycle { id: ItemId },
}

impl RegistryError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyRegistered { .. } => ErrorKind::AlreadyExists,
            Self::InvalidId | Self::Cycle { .. } => ErrorKind::InvalidArgument,
        }
    }
}

// =============================================================================

// Storage Errors

#[derive(Debug, Diagnostic, Error)]
pub enum StorageError {
    #[diagnostic(code(storage::resolve), help("create the missing parent first"))]
    #[error("path '{}' does not exist", path.display())]
    PathNotFound { path: PathBuf },
    #[diagnostic(code(storage::create), help("choose another name or delete the existing item"))]
    #[error("path '{}' already exists", path.display())]
    AlreadyExists { path: PathBuf },
    #[diagnostic(code(storage::resolve), help("names must be single, non-empty path segments"))]
    #[error("'{name}' is not a valid item name")]
    InvalidName { name: String },
    #[diagnostic(code(storage::open), help("the storage root must be an existing directory"))]
    #[error("storage root '{}' is not a directory", path.display())]
    InvalidRoot { path: PathBuf },
    #[diagnostic(code(storage::io))]
    #[error("i/o failure at '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PathNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InvalidName { .. } | Self::InvalidRoot { .. } => ErrorKind::InvalidArgument,
            Self::Io { .. } => ErrorKind::IoFailure,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================

// Service Errors

#[derive(Debug, Diagnostic, Error)]
pub enum ServiceError {
    #[diagnostic(transparent)]
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[diagnostic(transparent)]
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[diagnostic(code(service::kind), help("the operation requires a directory"))]
    #[error("item '{name}' ({id}) is not a directory")]
    NotADirectory { id: ItemId, name: String },
    #[diagnostic(code(service::kind), help("the operation requires a file"))]
    #[error("item '{name}' ({id}) is not a file")]
    NotAFile { id: ItemId, name: String },
}

impl ServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Registry(err) => err.kind(),
            Self::Storage(err) => err.kind(),
            Self::NotADirectory { .. } => ErrorKind::NotADirectory,
            Self::NotAFile { .. } => ErrorKind::NotAFile,
        }
    }
}

// =============================================================================

// Config Errors

#[derive(Debug, Diagnostic, Error)]
pub enum ConfigError {
    #[diagnostic(code(config::read), help("check the configuration file exists and is readable"))]
    #[error("unable to read configuration from '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[diagnostic(code(config::parse), help("check the configuration is valid toml"))]
    #[error("unable to parse configuration")]
    Parse(#[from] toml::de::Error),
}
