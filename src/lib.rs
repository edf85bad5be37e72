#![deny(
    future_incompatible,
    missing_copy_implementations,
    missing_debug_implementations,
    nonstandard_style,
    unsafe_code,
    unused,
    warnings
)]
#![deny(
    rust_2018_compatibility,
    rust_2018_idioms
)]
#![deny(
    rust_2021_compatibility,
    rust_2021_incompatible_closure_captures,
    rust_2021_incompatible_or_patterns,
    rust_2021_prefixes_incompatible_syntax,
    rust_2021_prelude_collisions
)]
#![deny(
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic
)]
#![allow( // TODO
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    missing_docs,
    rustdoc::all
)]

mod config;
mod error;
mod file_system;
mod item;
mod registry;
mod service;
mod storage;

pub use config::{
    Config,
    RegistryConfig,
    StorageConfig,
};
pub use error::{
    ConfigError,
    ErrorKind,
    RegistryError,
    ServiceError,
    StorageError,
};
pub use file_system::FileSystem;
pub use item::{
    child::{
        Child,
        Root,
    },
    content::FileContent,
    directory::Directory,
    file::File,
    id::{
        Identified,
        ItemId,
    },
    listing::DirectoryListing,
    located::Located,
    named::Named,
    path::ItemPath,
    Item,
    ItemKind,
};
pub use registry::{
    ItemRegistry,
    RegistrationPolicy,
    Registry,
};
pub use service::{
    DirectoryService,
    FileService,
    FileUpdate,
};
pub use storage::{
    LocalStorage,
    Storage,
};
