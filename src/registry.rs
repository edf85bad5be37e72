pub mod policy;

use std::{
    collections::HashMap,
    sync::Arc,
};

use async_lock::RwLock;
use async_trait::async_trait;
use futures::FutureExt;
use tracing::debug;

pub use self::policy::RegistrationPolicy;
use crate::{
    config::RegistryConfig,
    error::RegistryError,
    item::{
        id::{
            Identified,
            ItemId,
        },
        named::Named,
        Item,
    },
};

// =============================================================================

// Registry

/// The logical view of the tree: every known item keyed by its id. Each
/// operation touches a single key and is atomic with respect to the others.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn get(&self, id: &ItemId) -> Result<Item, RegistryError>;

    async fn register(&self, item: Item) -> Result<(), RegistryError>;

    async fn unregister(&self, id: &ItemId) -> Result<Item, RegistryError>;

    /// Swaps the entry for an id that is already registered, whatever the
    /// registration policy, and returns the previous item.
    async fn replace(&self, item: Item) -> Result<Item, RegistryError>;

    async fn contains(&self, id: &ItemId) -> bool;

    async fn len(&self) -> usize;
}

// =============================================================================

// ItemRegistry

/// In-memory [`Registry`]. Cloning yields another handle onto the same map.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: Arc<RwLock<HashMap<ItemId, Item>>>,
    policy: RegistrationPolicy,
}

// -----------------------------------------------------------------------------

// ItemRegistry - Standard Traits

impl Clone for ItemRegistry {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            policy: self.policy,
        }
    }
}

// -----------------------------------------------------------------------------

// ItemRegistry - Library Traits

#[async_trait]
impl Registry for ItemRegistry {
    async fn get(&self, id: &ItemId) -> Result<Item, RegistryError> {
        if id.is_empty() {
            return Err(RegistryError::InvalidId);
        }

        self.items
            .read()
            .map(|items| items.get(id).cloned())
            .await
            .ok_or_else(|| RegistryError::NotFound { id: id.clone() })
    }

    async fn register(&self, item: Item) -> Result<(), RegistryError> {
        let id = item.id().clone();
        let name = String::from(item.name());
        let policy = self.policy;

        self.items
            .write()
            .map(|mut items| match policy {
                RegistrationPolicy::Strict if items.contains_key(&id) => {
                    Err(RegistryError::AlreadyRegistered { id: id.clone() })
                }
                _ => {
                    items.insert(id.clone(), item);
                    Ok(())
                }
            })
            .await?;

        debug!(%id, %name, "registered item");

        Ok(())
    }

    async fn unregister(&self, id: &ItemId) -> Result<Item, RegistryError> {
        let item = self
            .items
            .write()
            .map(|mut items| items.remove(id))
            .await
            .ok_or_else(|| RegistryError::NotFound { id: id.clone() })?;

        debug!(%id, name = item.name(), "unregistered item");

        Ok(item)
    }

    async fn replace(&self, item: Item) -> Result<Item, RegistryError> {
        let id = item.id().clone();
        let name = String::from(item.name());

        let previous = self
            .items
            .write()
            .map(|mut items| {
                items
                    .get_mut(&id)
                    .map(|current| std::mem::replace(current, item))
            })
            .await
            .ok_or_else(|| RegistryError::NotFound { id: id.clone() })?;

        debug!(%id, %name, previous = previous.name(), "replaced item");

        Ok(previous)
    }

    async fn contains(&self, id: &ItemId) -> bool {
        self.items.read().map(|items| items.contains_key(id)).await
    }

    async fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).await
    }
}

// -----------------------------------------------------------------------------

// ItemRegistry - Create

impl ItemRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(policy: RegistrationPolicy) -> Self {
        Self {
            items: Arc::default(),
            policy,
        }
    }

    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::with_policy(config.policy)
    }

    /// A registry pre-seeded with `items`. Later items replace earlier ones
    /// with the same id, whatever the policy.
    #[must_use]
    pub fn from_items(policy: RegistrationPolicy, items: impl IntoIterator<Item = Item>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id().clone(), item))
            .collect::<HashMap<_, _>>();

        Self {
            items: Arc::new(RwLock::new(items)),
            policy,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
