//! Ownership context: the identity token used to decide whether a node may
//! be mutated in place or must be copied first.

use std::sync::Arc;

/// A unique, opaque identity. Two tags are equal iff they are the same
/// allocation — `Arc::ptr_eq`, not structural equality, is the only
/// comparison that matters here.
#[derive(Clone, Debug)]
pub(crate) struct OwnerTag(Arc<()>);

impl OwnerTag {
    /// Mint a fresh identity, distinct from every tag minted before it.
    pub(crate) fn fresh() -> Self {
        OwnerTag(Arc::new(()))
    }

    /// True iff `self` and `other` are the same identity.
    pub(crate) fn matches(&self, other: &OwnerTag) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for OwnerTag {
    fn default() -> Self {
        Self::fresh()
    }
}
