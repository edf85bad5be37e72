use super::id::ItemId;

// Child

pub trait Child {
    fn parent(&self) -> Option<&ItemId>;
}

// Root

pub trait Root {
    fn is_root(&self) -> bool;
}

// Root - Blanket Implementation

impl<C> Root for C
where
    C: Child,
{
    fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}
