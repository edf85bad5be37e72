use std::collections::HashSet;

use async_trait::async_trait;

use super::{
    child::Child,
    id::Identified,
    named::Named,
    path::ItemPath,
};
use crate::{
    error::RegistryError,
    registry::Registry,
};

// Located

#[async_trait]
pub trait Located {
    /// Walks the parent chain through `registry` and returns the names from
    /// the root-most ancestor down to this item. The item itself does not
    /// need to be registered, only its ancestors.
    async fn path<R>(&self, registry: &R) -> Result<ItemPath, RegistryError>
    where
        R: Registry + ?Sized;
}

// Located - Blanket Implementation

#[async_trait]
impl<N> Located for N
where
    N: Child + Identified + Named + Sync,
{
    async fn path<R>(&self, registry: &R) -> Result<ItemPath, RegistryError>
    where
        R: Registry + ?Sized,
    {
        let mut names = vec![String::from(self.name())];
        let mut visited = HashSet::from([self.id().clone()]);
        let mut next = self.parent().cloned();

        while let Some(id) = next {
            if !visited.insert(id.clone()) {
                return Err(RegistryError::Cycle { id });
            }

            let parent = registry.get(&id).await?;

            names.push(String::from(parent.name()));
            next = parent.parent().cloned();
        }

        let mut names = names.into_iter().rev();
        let root = ItemPath::new(names.next().unwrap_or_default());

        Ok(names.fold(root, |path, name| path.join(name)))
    }
}
